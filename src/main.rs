use std::path::PathBuf;

use anyhow::Result;
use clap::{Arg, ArgAction, Command, value_parser};
use lotto_client::LottoConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("lotto-dash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Collect lottery draw results and serve a ball frequency dashboard")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (defaults to lotto.toml or $LOTTO_CONFIG)"),
        )
        .arg(
            Arg::new("config-check")
                .long("config-check")
                .action(ArgAction::SetTrue)
                .help("Check configuration and exit"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("Set verbose output level"),
        )
        .get_matches();

    let log_level = match matches.get_count("verbose") {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    lotto_client::setup(Some(log_level));

    let config = LottoConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    if matches.get_flag("config-check") {
        return config_check(&config);
    }

    lotto_dash::app::run(&config).await
}

fn config_check(config: &LottoConfig) -> Result<()> {
    log::info!("Checking configuration...");
    log::info!(
        "Source: {} {} draws #{}..=#{} (timeout {:?}, {} retries)",
        config.source.url,
        config.source.game,
        config.source.start_draw,
        config.source.end_draw,
        config.source.timeout(),
        config.source.max_retries
    );

    let data_path = &config.storage.data_path;
    if data_path.exists() {
        let table = lotto_client::datastore::load_table(data_path)?;
        log::info!("Data file {} holds {} draws", data_path.display(), table.len());
    } else {
        log::info!("Data file {} does not exist yet", data_path.display());
    }

    log::info!(
        "Dashboard: http://{} (default window {}..={})",
        config.dashboard.socket_addr(),
        config.dashboard.default_start,
        config.dashboard.default_end
    );
    log::info!("Configuration check completed successfully");
    Ok(())
}
