use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lowest number a ball can carry.
pub const BALL_MIN: u8 = 1;
/// Highest number a ball can carry.
pub const BALL_MAX: u8 = 52;
/// Number of main balls in one draw (the bonus ball is extra).
pub const MAIN_BALL_COUNT: usize = 6;

/// The seven ball-bearing values of one draw.
///
/// Main balls are kept in column order (`ball1..ball6`), not sorted:
/// the source data is not guaranteed to be distinct or ordered and the
/// aggregator counts columns as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawBalls {
    pub main: [u8; MAIN_BALL_COUNT],
    pub bonus: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BallError {
    #[error("Invalid number of main balls: expected 6, got {0}")]
    InvalidMainBallCount(usize),
    #[error("Main ball {0} is out of range (1-52)")]
    MainBallOutOfRange(u8),
    #[error("Bonus ball {0} is out of range (1-52)")]
    BonusBallOutOfRange(u8),
}

impl DrawBalls {
    pub fn new(main: &[u8], bonus: u8) -> Result<Self, BallError> {
        let main: [u8; MAIN_BALL_COUNT] = main
            .try_into()
            .map_err(|_e| BallError::InvalidMainBallCount(main.len()))?;

        if let Some(&ball) = main.iter().find(|&&b| !is_valid_ball(b)) {
            return Err(BallError::MainBallOutOfRange(ball));
        }
        if !is_valid_ball(bonus) {
            return Err(BallError::BonusBallOutOfRange(bonus));
        }

        Ok(Self { main, bonus })
    }

    /// All seven values, main balls first, bonus ball last.
    pub fn all(&self) -> [u8; MAIN_BALL_COUNT + 1] {
        let mut all = [0u8; MAIN_BALL_COUNT + 1];
        all[..MAIN_BALL_COUNT].copy_from_slice(&self.main);
        all[MAIN_BALL_COUNT] = self.bonus;
        all
    }

    pub fn format_numbers(&self) -> String {
        format!(
            "{:02} {:02} {:02} {:02} {:02} {:02} + {:02}",
            self.main[0],
            self.main[1],
            self.main[2],
            self.main[3],
            self.main[4],
            self.main[5],
            self.bonus
        )
    }
}

impl Display for DrawBalls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_numbers())
    }
}

pub fn is_valid_ball(number: u8) -> bool {
    (BALL_MIN..=BALL_MAX).contains(&number)
}

/// Colour band a ball is painted with on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallColour {
    Red,
    Yellow,
    Green,
    Aqua,
}

impl BallColour {
    pub fn for_number(number: u8) -> Self {
        match number {
            1..=13 => Self::Red,
            14..=27 => Self::Yellow,
            28..=38 => Self::Green,
            _ => Self::Aqua,
        }
    }

    /// CSS colour name.
    pub fn css(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Aqua => "aqua",
        }
    }
}

impl Display for BallColour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.css())
    }
}
