//! Document persistence boundary.
//!
//! # Responsibility
//! - Define the load/save contract the repository depends on.
//! - Keep file format and I/O details out of repository code.
//!
//! # Invariants
//! - `load` never fails; unusable input yields `Document::default()`.
//! - `save` always rewrites the whole document.
//! - Stores hold no cached copy of the document.

use crate::model::document::Document;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;

pub use json_file::JsonFileStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure while writing the document.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize document: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Load/save contract for the whole-store document.
pub trait DocumentStore {
    /// Reads the document, substituting defaults for anything unusable.
    fn load(&self) -> Document;
    /// Persists the full document, replacing prior contents.
    fn save(&self, document: &Document) -> StoreResult<()>;
}
