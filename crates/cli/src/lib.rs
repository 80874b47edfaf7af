//! `poiqa` library crate.
//!
//! Re-exports the CLI building blocks for integration testing. The binary
//! entrypoint lives in `main.rs`.

pub mod config;
pub mod output;
pub mod run;
