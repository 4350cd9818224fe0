//! Repository layer over the document store.
//!
//! # Responsibility
//! - Expose entity-level greenhouse/record operations and aggregation.
//! - Keep serialization and file I/O behind the `DocumentStore` seam.
//!
//! # Invariants
//! - Every successful mutation is persisted before the call returns.
//! - Input rejections are reported as `Ok(false)`, never as errors.

pub mod measurement_repo;
