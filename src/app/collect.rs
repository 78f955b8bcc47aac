use anyhow::{Context as _, Result};
use lotto_client::{
    LottoConfig,
    api::{DrawSource, NationalLotteryProvider},
    datastore::save_table,
    models::DrawTable,
    service::{CollectProgress, CollectSummary, collect_draws},
};

use super::progress::TerminalProgress;

/// Collect the configured draw range from the results site and persist it.
///
/// Nothing is written if the run aborts or is interrupted.
pub async fn collect_and_save(config: &LottoConfig) -> Result<()> {
    let source = NationalLotteryProvider::from_config(&config.source)?;
    let mut progress = TerminalProgress::stderr();

    log::info!(
        "Requesting {} draws #{}..=#{}",
        source.game(),
        config.source.start_draw,
        config.source.end_draw
    );

    tokio::select! {
        result = collect_into(&source, config, &mut progress) => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            anyhow::bail!("Interrupted, no draws were saved");
        }
    }

    log::info!("Run again to open the dashboard");
    Ok(())
}

/// Collect from `source` and write the table to the configured data path.
///
/// The file is only written once collection has finished.
pub async fn collect_into<S, P>(
    source: &S,
    config: &LottoConfig,
    progress: &mut P,
) -> Result<CollectSummary>
where
    S: DrawSource,
    P: CollectProgress,
{
    let mut table = DrawTable::new();
    let summary = collect_draws(
        source,
        config.source.start_draw..=config.source.end_draw,
        config.source.retry_budget(),
        &mut table,
        progress,
    )
    .await
    .context("Draw collection failed")?;

    save_table(&config.storage.data_path, &table)?;
    Ok(summary)
}
