//! Record validation engine.
//!
//! Provides the per-record result type and a pure-logic evaluator that runs
//! the full contractual rule set, all without I/O.

pub mod evaluator;
pub mod rules;

pub use evaluator::validate_poi;
pub use rules::ValidationResult;
