use std::{ops::RangeInclusive, time::Duration};

use crate::{
    api::DrawSource,
    models::{DrawTable, TableError},
};

/// How many consecutive failures a run tolerates before giving up on a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    pub max_consecutive_failures: u32,
    /// Pause before re-requesting after a failure.
    pub retry_delay: Duration,
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 10,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Outcome of one request attempt, reported to [`CollectProgress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Collected,
    Failed { consecutive_failures: u32 },
    Skipped,
}

/// Status sink for a collection run.
pub trait CollectProgress {
    /// Called after every attempt. `completed` counts draws that were either
    /// collected or skipped so far.
    fn on_attempt(&mut self, draw_number: u32, attempt: Attempt, completed: usize, total: usize);

    /// Called once when the run ends successfully.
    fn finish(&mut self, _summary: &CollectSummary) {}
}

/// A progress sink that ignores everything.
#[derive(Debug, Default)]
pub struct NullProgress;

impl CollectProgress for NullProgress {
    fn on_attempt(&mut self, _draw_number: u32, _attempt: Attempt, _completed: usize, _total: usize) {
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectSummary {
    pub collected: usize,
    /// Draws given up on after exhausting the retry budget.
    pub skipped: Vec<u32>,
    pub failed_attempts: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(
        "unable to reach the results source: draw #{draw_number} failed {attempts} consecutive times and nothing was collected (last error: {last_error})"
    )]
    NothingCollected {
        draw_number: u32,
        attempts: u32,
        last_error: String,
    },
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Collect every draw in `range` into `table`.
///
/// Each draw is requested until it succeeds. A failure retries the same draw
/// number; a success resets the failure counter. Once the counter reaches the
/// budget the draw is skipped, unless the table is still empty, in which case
/// the whole run is abandoned.
pub async fn collect_draws<S, P>(
    source: &S,
    range: RangeInclusive<u32>,
    budget: RetryBudget,
    table: &mut DrawTable,
    progress: &mut P,
) -> Result<CollectSummary, CollectError>
where
    S: DrawSource,
    P: CollectProgress,
{
    let total = range.clone().count();
    let mut summary = CollectSummary::default();
    let mut completed = 0usize;
    let mut consecutive_failures = 0u32;

    log::info!(
        "Collecting {total} draws (#{} to #{})",
        range.start(),
        range.end()
    );

    for draw_number in range {
        loop {
            match source.fetch_draw(draw_number).await {
                Ok(record) => {
                    table.push(record)?;
                    consecutive_failures = 0;
                    completed += 1;
                    summary.collected += 1;
                    log::debug!("Collected draw #{draw_number}");
                    progress.on_attempt(draw_number, Attempt::Collected, completed, total);
                    break;
                }
                Err(e) => {
                    consecutive_failures += 1;
                    summary.failed_attempts += 1;
                    log::warn!(
                        "Failed to collect draw #{draw_number} (attempt {consecutive_failures}/{}): {e}",
                        budget.max_consecutive_failures
                    );
                    progress.on_attempt(
                        draw_number,
                        Attempt::Failed {
                            consecutive_failures,
                        },
                        completed,
                        total,
                    );

                    if consecutive_failures >= budget.max_consecutive_failures {
                        if table.is_empty() {
                            return Err(CollectError::NothingCollected {
                                draw_number,
                                attempts: consecutive_failures,
                                last_error: format!("{e:#}"),
                            });
                        }

                        log::warn!(
                            "Skipping draw #{draw_number} after {consecutive_failures} consecutive failures"
                        );
                        consecutive_failures = 0;
                        completed += 1;
                        summary.skipped.push(draw_number);
                        progress.on_attempt(draw_number, Attempt::Skipped, completed, total);
                        break;
                    }

                    if !budget.retry_delay.is_zero() {
                        tokio::time::sleep(budget.retry_delay).await;
                    }
                }
            }
        }
    }

    log::info!(
        "Collected {} draws, skipped {} ({} failed attempts)",
        summary.collected,
        summary.skipped.len(),
        summary.failed_attempts
    );
    if !summary.skipped.is_empty() {
        log::warn!("Draws missing from the table: {:?}", summary.skipped);
    }
    progress.finish(&summary);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap};

    use chrono::NaiveDate;
    use lotto_stats::DrawBalls;

    use super::*;
    use crate::models::DrawRecord;

    /// Fails each draw number a scripted number of times before succeeding.
    /// `u32::MAX` means the draw never succeeds.
    struct ScriptedSource {
        failures: RefCell<HashMap<u32, u32>>,
        requests: RefCell<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(failures: &[(u32, u32)]) -> Self {
            Self {
                failures: RefCell::new(failures.iter().copied().collect()),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    fn record(draw_number: u32) -> DrawRecord {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap_or_else(|| panic!("invalid fixture date"));
        let balls = DrawBalls {
            main: [3, 8, 14, 19, 27, 31],
            bonus: 37,
        };
        DrawRecord::new(draw_number, date, date, balls)
    }

    impl DrawSource for ScriptedSource {
        async fn fetch_draw(&self, draw_number: u32) -> anyhow::Result<DrawRecord> {
            self.requests.borrow_mut().push(draw_number);
            let mut failures = self.failures.borrow_mut();
            match failures.get_mut(&draw_number) {
                Some(remaining) if *remaining > 0 => {
                    if *remaining != u32::MAX {
                        *remaining -= 1;
                    }
                    anyhow::bail!("connection refused")
                }
                _ => Ok(record(draw_number)),
            }
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        attempts: Vec<(u32, Attempt, usize, usize)>,
        finished: bool,
    }

    impl CollectProgress for RecordingProgress {
        fn on_attempt(&mut self, draw_number: u32, attempt: Attempt, completed: usize, total: usize) {
            self.attempts.push((draw_number, attempt, completed, total));
        }

        fn finish(&mut self, _summary: &CollectSummary) {
            self.finished = true;
        }
    }

    fn budget() -> RetryBudget {
        RetryBudget {
            max_consecutive_failures: 10,
            retry_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn collects_every_draw_in_order() -> anyhow::Result<()> {
        let source = ScriptedSource::new(&[]);
        let mut table = DrawTable::new();

        let summary =
            collect_draws(&source, 100..=104, budget(), &mut table, &mut NullProgress).await?;

        assert_eq!(summary.collected, 5);
        assert!(summary.skipped.is_empty());
        let numbers: Vec<u32> = table.iter().map(|r| r.draw_number).collect();
        assert_eq!(numbers, vec![100, 101, 102, 103, 104]);
        Ok(())
    }

    #[tokio::test]
    async fn transient_failure_retries_same_draw() -> anyhow::Result<()> {
        let source = ScriptedSource::new(&[(101, 3)]);
        let mut table = DrawTable::new();

        let summary =
            collect_draws(&source, 100..=102, budget(), &mut table, &mut NullProgress).await?;

        assert_eq!(summary.collected, 3);
        assert_eq!(summary.failed_attempts, 3);
        assert_eq!(
            *source.requests.borrow(),
            vec![100, 101, 101, 101, 101, 102]
        );
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_draw_is_skipped_after_a_success() -> anyhow::Result<()> {
        let source = ScriptedSource::new(&[(101, u32::MAX)]);
        let mut table = DrawTable::new();
        let mut progress = RecordingProgress::default();

        let summary = collect_draws(&source, 100..=102, budget(), &mut table, &mut progress).await?;

        assert_eq!(summary.skipped, vec![101]);
        assert_eq!(summary.collected, 2);
        assert_eq!(summary.failed_attempts, 10);
        assert!(table.contains(100));
        assert!(!table.contains(101));
        assert!(table.contains(102));

        let requests_101 = source.requests.borrow().iter().filter(|&&n| n == 101).count();
        assert_eq!(requests_101, 10);

        assert!(progress.finished);
        assert!(progress.attempts.contains(&(101, Attempt::Skipped, 2, 3)));
        assert_eq!(progress.attempts.last(), Some(&(102, Attempt::Collected, 3, 3)));
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_first_draw_aborts() {
        let source = ScriptedSource::new(&[(100, u32::MAX)]);
        let mut table = DrawTable::new();

        let result = collect_draws(&source, 100..=100, budget(), &mut table, &mut NullProgress).await;

        assert!(matches!(
            result,
            Err(CollectError::NothingCollected {
                draw_number: 100,
                attempts: 10,
                ..
            })
        ));
        assert!(table.is_empty());
        assert_eq!(source.requests.borrow().len(), 10);
    }

    #[tokio::test]
    async fn counter_resets_after_success() -> anyhow::Result<()> {
        // nine failures on each draw never reach a budget of ten
        let source = ScriptedSource::new(&[(100, 9), (101, 9)]);
        let mut table = DrawTable::new();

        let summary =
            collect_draws(&source, 100..=101, budget(), &mut table, &mut NullProgress).await?;

        assert_eq!(summary.collected, 2);
        assert!(summary.skipped.is_empty());
        assert_eq!(summary.failed_attempts, 18);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_draw_in_buffer_is_fatal() -> anyhow::Result<()> {
        let source = ScriptedSource::new(&[]);
        let mut table = DrawTable::from_records([record(100)])?;

        let result = collect_draws(&source, 100..=101, budget(), &mut table, &mut NullProgress).await;

        assert!(matches!(
            result,
            Err(CollectError::Table(TableError::DuplicateDraw(100)))
        ));
        Ok(())
    }
}
