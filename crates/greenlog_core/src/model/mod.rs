//! Domain model for greenhouse measurement logs.
//!
//! # Responsibility
//! - Define the persisted document shape and its wire field names.
//! - Define measurement records, their readings and id generation.
//!
//! # Invariants
//! - A normalized document always holds at least one greenhouse.
//! - Record ids are never reissued within one repository session.

pub mod document;
pub mod record;
