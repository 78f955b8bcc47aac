use std::{collections::HashSet, time::Duration};

use anyhow::Context as _;
use chrono::NaiveDate;
use lotto_client::{
    api::DrawSource,
    datastore::{load_table, save_table},
    models::{DrawRecord, DrawTable},
    service::{
        CollectError, DateRange, NullProgress, RetryBudget, collect_draws, get_frequency,
        get_last_draw,
    },
};
use lotto_stats::DrawBalls;

/// Serves a fixed set of draws; anything else is a failed request.
struct FixedSource {
    available: HashSet<u32>,
}

impl DrawSource for FixedSource {
    async fn fetch_draw(&self, draw_number: u32) -> anyhow::Result<DrawRecord> {
        if !self.available.contains(&draw_number) {
            anyhow::bail!("HTTP 503 for draw #{draw_number}");
        }
        let day = NaiveDate::from_ymd_opt(2016, 1, 1)
            .and_then(|d| d.checked_add_days(chrono::Days::new(u64::from(draw_number % 300))))
            .context("draw date out of range")?;
        // every draw shares ball 3, the rest varies by draw number
        let offset = (draw_number % 40) as u8;
        let balls = DrawBalls::new(
            &[3, 4 + offset, 5 + offset, 6 + offset, 7 + offset, 8 + offset],
            50,
        )?;
        Ok(DrawRecord::new(draw_number, day, day, balls))
    }
}

fn budget() -> RetryBudget {
    RetryBudget {
        max_consecutive_failures: 10,
        retry_delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn collected_table_survives_storage_and_answers_queries() -> anyhow::Result<()> {
    let source = FixedSource {
        available: [100, 102].into_iter().collect(),
    };
    let mut table = DrawTable::new();

    let summary = collect_draws(&source, 100..=102, budget(), &mut table, &mut NullProgress).await?;
    assert_eq!(summary.skipped, vec![101]);
    assert_eq!(table.missing_in(100..=102), vec![101]);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("lotto.csv");
    save_table(&path, &table)?;
    let loaded = load_table(&path)?;
    assert_eq!(loaded, table);

    let everything = DateRange::new(
        NaiveDate::MIN,
        NaiveDate::MAX,
    );
    let freq = get_frequency(&loaded, everything);
    assert_eq!(freq.total(), 14);
    assert_eq!(freq.frequency(3), 2);
    assert_eq!(freq.frequency(50), 2);
    assert_eq!(get_last_draw(&loaded)?.draw_number, 102);
    Ok(())
}

#[tokio::test]
async fn unreachable_source_leaves_nothing_to_save() -> anyhow::Result<()> {
    let source = FixedSource {
        available: HashSet::new(),
    };
    let mut table = DrawTable::new();

    let result = collect_draws(&source, 100..=100, budget(), &mut table, &mut NullProgress).await;
    assert!(matches!(result, Err(CollectError::NothingCollected { .. })));
    assert!(table.is_empty());
    Ok(())
}
