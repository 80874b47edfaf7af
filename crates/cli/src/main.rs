//! `poiqa` -- POI delivery validation CLI.
//!
//! Validates a POI delivery file, draws the QA sample, computes billing,
//! and writes the reports. The exit code carries the KPI decision.
//!
//! # Exit codes
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | `0`  | `ACCEPT`                                  |
//! | `1`  | `REQUIRE_CORRECTION`, or a fatal error    |
//! | `2`  | `REQUIRE_RESURVEY`                        |
//!
//! # Environment variables
//!
//! Every flag can also be set through the environment (or a `.env` file):
//! `POIQA_INPUT`, `POIQA_OUTPUT_DIR`, `POIQA_FORMAT`, `POIQA_SEED`,
//! `POIQA_SAMPLING_RATE`, `POIQA_CLIENT`, `POIQA_PROVIDER`,
//! `POIQA_DELIVERY_DIR`. Log verbosity
//! follows `RUST_LOG` (default `poiqa=info`).

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use poiqa_cli::config::Config;
use poiqa_cli::run;

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poiqa=info,poiqa_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    match run::run(&config) {
        Ok(outcome) => {
            let decision = outcome.decision();
            tracing::info!(%decision, exit_code = decision.exit_code(), "Run complete");
            std::process::exit(decision.exit_code());
        }
        Err(e) => {
            tracing::error!("{e:#}");
            std::process::exit(1);
        }
    }
}
