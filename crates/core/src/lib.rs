//! POI quality-assurance engine.
//!
//! Validates point-of-interest records against the contractual rule set,
//! aggregates the findings, draws the QA sample that drives the KPI
//! decision, and computes billing against the pilot budget cap. The
//! [`delivery`] and [`dictionary`] modules render the documents that ship
//! with an accepted batch.
//!
//! Everything here is pure logic over in-memory [`types::Record`] maps.
//! File access, argument parsing, and report writing belong to callers.

pub mod billing;
pub mod csv_export;
pub mod delivery;
pub mod dictionary;
pub mod error;
pub mod field_catalog;
pub mod geo;
pub mod loader;
pub mod report;
pub mod sampling;
pub mod types;
pub mod validation;

pub use error::CoreError;
