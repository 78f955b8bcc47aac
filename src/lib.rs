//! Lottery draw collector and frequency dashboard.
//!
//! The heavy lifting lives in `lotto-client` (remote source, storage,
//! queries, HTTP server) and `lotto-stats` (ball model, aggregation);
//! this crate wires them into the command line program.

pub mod app;
