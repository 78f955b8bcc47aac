use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ball::{BALL_MAX, BallColour, DrawBalls, MAIN_BALL_COUNT};

/// Slots in a frequency table: ball numbers `0..=BALL_MAX`.
///
/// Slot 0 never receives real data; it is kept so a ball number indexes
/// its own slot.
pub const FREQUENCY_SLOTS: usize = BALL_MAX as usize + 1;

/// One ball number with its occurrence count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallFrequency {
    pub ball: u8,
    pub frequency: u32,
}

impl BallFrequency {
    pub fn colour(&self) -> BallColour {
        BallColour::for_number(self.ball)
    }
}

/// Occurrence counts of every ball number across the six main-ball columns
/// and the bonus-ball column of a set of draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; FREQUENCY_SLOTS],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; FREQUENCY_SLOTS],
        }
    }
}

/// Column selector over the seven ball-bearing columns of a draw.
#[derive(Debug, Clone, Copy)]
enum BallColumn {
    Main(usize),
    Bonus,
}

impl BallColumn {
    const ALL: [Self; MAIN_BALL_COUNT + 1] = [
        Self::Main(0),
        Self::Main(1),
        Self::Main(2),
        Self::Main(3),
        Self::Main(4),
        Self::Main(5),
        Self::Bonus,
    ];

    fn value(self, balls: &DrawBalls) -> u8 {
        match self {
            Self::Main(index) => balls.main[index],
            Self::Bonus => balls.bonus,
        }
    }
}

impl FrequencyTable {
    /// Count every ball of every draw yielded by `draws`.
    ///
    /// Each column is tallied on its own and then folded into the shared
    /// counts, so the result does not depend on the order of `draws`.
    pub fn aggregate<'a, I>(draws: I) -> Self
    where
        I: IntoIterator<Item = &'a DrawBalls>,
    {
        let draws: Vec<&DrawBalls> = draws.into_iter().collect();
        let mut table = Self::default();

        for column in BallColumn::ALL {
            for (ball, count) in column_counts(&draws, column) {
                table.add(ball, count);
            }
        }

        table
    }

    fn add(&mut self, ball: u8, count: u32) {
        match self.counts.get_mut(ball as usize) {
            Some(slot) => *slot += count,
            None => log::warn!("Ignoring out of range ball {ball} ({count} occurrences)"),
        }
    }

    pub fn frequency(&self, ball: u8) -> u32 {
        self.counts.get(ball as usize).copied().unwrap_or(0)
    }

    /// Sum of all counts. Equals seven times the number of aggregated draws.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// All slots `0..=BALL_MAX` as `(ball, frequency)` pairs, zeros included.
    pub fn entries(&self) -> Vec<BallFrequency> {
        (0..=BALL_MAX)
            .zip(self.counts.iter())
            .map(|(ball, &frequency)| BallFrequency { ball, frequency })
            .collect()
    }

    /// Real balls ranked by frequency descending, ties broken by ascending
    /// ball number. Slot 0 is not a ball and is left out.
    pub fn ranked(&self) -> Vec<BallFrequency> {
        let mut ranked: Vec<BallFrequency> = self
            .entries()
            .into_iter()
            .filter(|entry| entry.ball != 0)
            .collect();
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.ball.cmp(&b.ball)));
        ranked
    }

    /// The top `rows * width` ranked balls split into `rows` rows.
    pub fn most_frequent_rows(&self, rows: usize, width: usize) -> Vec<Vec<BallFrequency>> {
        if width == 0 {
            return vec![Vec::new(); rows];
        }
        let ranked = self.ranked();
        let mut chunks: Vec<Vec<BallFrequency>> = ranked
            .chunks(width)
            .take(rows)
            .map(<[BallFrequency]>::to_vec)
            .collect();
        chunks.resize(rows, Vec::new());
        chunks
    }
}

fn column_counts(draws: &[&DrawBalls], column: BallColumn) -> BTreeMap<u8, u32> {
    let mut counts = BTreeMap::new();
    for balls in draws {
        *counts.entry(column.value(balls)).or_insert(0) += 1;
    }
    counts
}
