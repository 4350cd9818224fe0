//! Core domain logic for GreenLog.
//! This crate owns the measurement store, its invariants and the aggregations
//! every front end reads.

pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;
pub mod stats;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::document::{Document, StoredRecord, DEFAULT_GREENHOUSE};
pub use model::record::{Readings, ReadingsValidationError, Record, RecordId};
pub use repo::measurement_repo::{MeasurementRepository, RepoError, RepoResult};
pub use report::chart::{ClimographSeries, Co2Series};
pub use report::summary_report::SummaryReport;
pub use report::ALL_GREENHOUSES_LABEL;
pub use service::measurement_service::{MeasurementService, ServiceError};
pub use stats::daily::DayAverage;
pub use stats::summary::{MetricSummary, RangeSummary};
pub use store::{DocumentStore, JsonFileStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
