//! Presentation-ready projections of daily averages.
//!
//! # Responsibility
//! - Build the summary report model and its plain-text rendering.
//! - Project daily averages into the series chart renderers consume.

pub mod chart;
pub mod summary_report;

/// Scope label used when no greenhouse filter applies.
pub const ALL_GREENHOUSES_LABEL: &str = "Todos los Invernaderos";
