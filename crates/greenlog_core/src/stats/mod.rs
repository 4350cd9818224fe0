//! Measurement aggregation.
//!
//! # Responsibility
//! - Group records by calendar date and average their readings.
//! - Summarize a range of daily averages for reporting.
//!
//! # Invariants
//! - Daily output is sorted strictly ascending by date.
//! - Aggregation is pure; nothing here touches the store.

pub mod daily;
pub mod summary;
