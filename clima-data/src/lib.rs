//! Aggregation and composition over daily observations and annual climate
//! indices.
//!
//! This crate turns parsed records into chart-ready series: per-year and
//! per-decade buckets, threshold counts, record years, baseline anomalies,
//! the headline summary and the slope-anchor projection.

pub mod aggregate;
pub mod anomaly;
pub mod projection;
pub mod summary;

pub use aggregate::{DecadeAverage, RecordYear, YearValue};
pub use projection::{project, Projection, ProjectionConfig, ProjectionPoint};
pub use summary::{build_summary, ClimateSummary, SummaryOptions};
