//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Hold the input checks front ends would otherwise duplicate.

pub mod measurement_service;
