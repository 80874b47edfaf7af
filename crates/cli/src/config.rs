//! Run configuration from command-line flags, falling back to environment
//! variables (a `.env` file is loaded by `main` before parsing).

use std::path::PathBuf;

use clap::Parser;
use poiqa_core::loader::InputFormat;
use poiqa_core::sampling::DEFAULT_SAMPLING_RATE;

pub const DEFAULT_OUTPUT_DIR: &str = "./reports";
pub const DEFAULT_CLIENT: &str = "NAVER Cloud Corporation";
pub const DEFAULT_PROVIDER: &str = "Farq Technology Establishment";

/// POI data validation engine: validates a delivery, draws the QA sample,
/// and computes billing.
#[derive(Debug, Clone, Parser)]
#[command(name = "poiqa", version, about)]
pub struct Config {
    /// Input data file (JSON or CSV).
    #[arg(short, long, env = "POIQA_INPUT")]
    pub input: PathBuf,

    /// Directory the four report files are written to.
    #[arg(short, long, env = "POIQA_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Input format; detected from the file extension when omitted.
    #[arg(short, long, env = "POIQA_FORMAT", value_parser = parse_format)]
    pub format: Option<InputFormat>,

    /// Seed for a reproducible QA sample.
    #[arg(long, env = "POIQA_SEED")]
    pub seed: Option<u64>,

    /// Share of records drawn for the QA audit, in (0, 1].
    #[arg(long, env = "POIQA_SAMPLING_RATE", default_value_t = DEFAULT_SAMPLING_RATE)]
    pub sampling_rate: f64,

    /// Client named in the report headers.
    #[arg(long, env = "POIQA_CLIENT", default_value = DEFAULT_CLIENT)]
    pub client: String,

    /// Provider named in the report headers.
    #[arg(long, env = "POIQA_PROVIDER", default_value = DEFAULT_PROVIDER)]
    pub provider: String,

    /// Also assemble a delivery package here: record exports, data
    /// dictionary, compliance statement, and a copy of the reports.
    #[arg(long, env = "POIQA_DELIVERY_DIR")]
    pub delivery_dir: Option<PathBuf>,
}

fn parse_format(s: &str) -> Result<InputFormat, String> {
    InputFormat::from_str_value(s).map_err(|e| e.to_string())
}

impl Config {
    /// Explicit format, or the one implied by the input file's extension.
    pub fn input_format(&self) -> InputFormat {
        self.format.unwrap_or_else(|| {
            InputFormat::from_extension(self.input.extension().and_then(|e| e.to_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("poiqa").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults() {
        let config = parse(&["--input", "pois.json"]);
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.sampling_rate, DEFAULT_SAMPLING_RATE);
        assert_eq!(config.seed, None);
        assert_eq!(config.delivery_dir, None);
        assert_eq!(config.input_format(), InputFormat::Json);
    }

    #[test]
    fn delivery_dir_flag() {
        let config = parse(&["-i", "pois.json", "--delivery-dir", "out/package"]);
        assert_eq!(config.delivery_dir, Some(PathBuf::from("out/package")));
    }

    #[test]
    fn format_detected_from_extension() {
        assert_eq!(parse(&["-i", "delivery.CSV"]).input_format(), InputFormat::Csv);
    }

    #[test]
    fn explicit_format_wins() {
        let config = parse(&["-i", "delivery.txt", "--format", "csv", "--seed", "42"]);
        assert_eq!(config.input_format(), InputFormat::Csv);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Config::try_parse_from(["poiqa", "-i", "a.json", "-f", "xlsx"]);
        assert!(result.is_err());
    }
}
