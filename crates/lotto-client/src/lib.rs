//! Lottery draw collection, storage and the frequency dashboard server.
//!
//! The crate is split the same way the process runs: `api` talks to the
//! remote results endpoint, `service::collect` drives a collection run,
//! `datastore` persists the draw table, `service::query` answers dashboard
//! queries and `server` exposes them over HTTP.

use std::{path::PathBuf, sync::LazyLock};

pub mod api;
pub mod config;
pub mod datastore;
pub mod models;
pub mod server;
pub mod service;

pub use config::LottoConfig;
pub use models::{DrawRecord, DrawTable};

/// Path of the `.env` file that was loaded, if any.
pub static ENV_GUARD: LazyLock<Result<PathBuf, dotenvy::Error>> = LazyLock::new(dotenvy::dotenv);

/// Load `.env` and initialise logging.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn setup(level: Option<log::LevelFilter>) {
    if let Err(e) = ENV_GUARD.as_ref() {
        // a missing .env is the normal case
        if !e.not_found() {
            eprintln!("Failed to load .env file: {e}");
        }
    }

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level.unwrap_or(log::LevelFilter::Info));
    builder.parse_default_env();
    if let Err(e) = builder.try_init() {
        log::debug!("Logger already initialised: {e}");
    }
}

/// Read and parse an environment variable, `None` if unset or unparsable.
pub fn parse_from_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_e) => {
            log::warn!("Ignoring {key}={raw}: cannot be parsed");
            None
        }
    }
}
