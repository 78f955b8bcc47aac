//! The two phases of a run: collect the draw table when it is missing,
//! otherwise serve the dashboard over it.

pub mod collect;
pub mod dashboard;
pub mod progress;

use anyhow::Result;
use lotto_client::LottoConfig;

/// Collect when the data file is absent, serve when it exists.
///
/// Collection ends the process; the dashboard comes up on the next run.
pub async fn run(config: &LottoConfig) -> Result<()> {
    let data_path = &config.storage.data_path;
    if data_path.exists() {
        dashboard::serve(config).await
    } else {
        log::info!(
            "{} not found, collecting draws from {}",
            data_path.display(),
            config.source.url
        );
        collect::collect_and_save(config).await
    }
}
