use chrono::NaiveDate;
use lotto_stats::{BallFrequency, DrawBalls, FrequencyTable};
use serde::Serialize;

use crate::models::DrawTable;

/// Inclusive date window. A window whose start is after its end is valid
/// and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("no draws have been collected")]
    NoData,
}

/// Frequency of every ball number over the draws dated within `range`.
pub fn get_frequency(table: &DrawTable, range: DateRange) -> FrequencyTable {
    FrequencyTable::aggregate(
        table
            .iter()
            .filter(|r| range.contains(r.draw_date))
            .map(|r| &r.balls),
    )
}

/// Balls of the most recent draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastDraw {
    pub draw_number: u32,
    pub draw_date: NaiveDate,
    pub balls: DrawBalls,
}

pub fn get_last_draw(table: &DrawTable) -> Result<LastDraw, QueryError> {
    let record = table.last().ok_or(QueryError::NoData)?;
    Ok(LastDraw {
        draw_number: record.draw_number,
        draw_date: record.draw_date,
        balls: record.balls,
    })
}

/// Everything the dashboard shows for one date window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyReport {
    pub range: DateRange,
    pub draws: usize,
    pub frequencies: FrequencyTable,
    pub top_rows: Vec<Vec<BallFrequency>>,
}

impl FrequencyReport {
    pub fn build(table: &DrawTable, range: DateRange, rows: usize, width: usize) -> Self {
        let draws = table.iter().filter(|r| range.contains(r.draw_date)).count();
        let frequencies = get_frequency(table, range);
        let top_rows = frequencies.most_frequent_rows(rows, width);
        Self {
            range,
            draws,
            frequencies,
            top_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DrawRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap_or_else(|| panic!("invalid fixture date {y}-{m}-{d}"))
    }

    fn record(draw_number: u32, draw_date: NaiveDate, main: [u8; 6], bonus: u8) -> DrawRecord {
        DrawRecord::new(draw_number, draw_date, draw_date, DrawBalls { main, bonus })
    }

    fn sample_table() -> anyhow::Result<DrawTable> {
        Ok(DrawTable::from_records([
            record(1500, date(2015, 7, 25), [1, 2, 3, 4, 5, 6], 7),
            record(1501, date(2015, 8, 1), [3, 8, 14, 19, 27, 31], 37),
            record(1502, date(2016, 3, 5), [3, 9, 15, 20, 28, 52], 14),
            record(1503, date(2020, 8, 1), [10, 11, 12, 13, 40, 41], 3),
            record(1504, date(2020, 8, 5), [44, 45, 46, 47, 48, 49], 50),
        ])?)
    }

    #[test]
    fn single_draw_counts_each_ball_once() -> anyhow::Result<()> {
        let table = sample_table()?;
        let day = date(2015, 8, 1);
        let freq = get_frequency(&table, DateRange::new(day, day));

        for ball in [3, 8, 14, 19, 27, 31, 37] {
            assert_eq!(freq.frequency(ball), 1, "ball {ball}");
        }
        assert_eq!(freq.total(), 7);
        assert_eq!(freq.entries().len(), 53);
        Ok(())
    }

    #[test]
    fn bounds_are_inclusive() -> anyhow::Result<()> {
        let table = sample_table()?;
        let freq = get_frequency(&table, DateRange::new(date(2015, 8, 1), date(2020, 8, 1)));

        assert_eq!(freq.total(), 7 * 3);
        // 3 appears as a main ball twice and as a bonus ball once
        assert_eq!(freq.frequency(3), 3);
        assert_eq!(freq.frequency(1), 0);
        assert_eq!(freq.frequency(50), 0);
        Ok(())
    }

    #[test]
    fn empty_window_is_all_zeros() -> anyhow::Result<()> {
        let table = sample_table()?;
        let freq = get_frequency(&table, DateRange::new(date(2010, 1, 1), date(2010, 12, 31)));
        assert!(freq.is_empty());
        assert_eq!(freq.entries().len(), 53);
        assert!(freq.entries().iter().all(|e| e.frequency == 0));
        Ok(())
    }

    #[test]
    fn reversed_window_matches_nothing() -> anyhow::Result<()> {
        let table = sample_table()?;
        let range = DateRange::new(date(2020, 8, 1), date(2015, 8, 1));
        assert!(range.is_empty());
        assert!(get_frequency(&table, range).is_empty());
        Ok(())
    }

    #[test]
    fn last_draw_is_the_highest_draw_number() -> anyhow::Result<()> {
        let last = get_last_draw(&sample_table()?)?;
        assert_eq!(last.draw_number, 1504);
        assert_eq!(last.balls.main, [44, 45, 46, 47, 48, 49]);
        assert_eq!(last.balls.bonus, 50);
        Ok(())
    }

    #[test]
    fn last_draw_of_empty_table_is_no_data() {
        assert_eq!(get_last_draw(&DrawTable::new()), Err(QueryError::NoData));
    }

    #[test]
    fn report_counts_draws_and_ranks() -> anyhow::Result<()> {
        let table = sample_table()?;
        let report =
            FrequencyReport::build(&table, DateRange::new(date(2015, 8, 1), date(2020, 8, 1)), 3, 6);

        assert_eq!(report.draws, 3);
        assert_eq!(report.top_rows.len(), 3);
        assert!(report.top_rows.iter().all(|row| row.len() == 6));
        let first = report.top_rows.first().and_then(|row| row.first()).copied();
        assert_eq!(first, Some(BallFrequency { ball: 3, frequency: 3 }));
        Ok(())
    }
}
