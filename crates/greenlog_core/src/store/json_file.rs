//! JSON file implementation of `DocumentStore`.
//!
//! # Responsibility
//! - Read the backing file with soft fallback to the default document.
//! - Write the pretty-printed document through a temp file and rename.
//!
//! # Invariants
//! - Loading never creates, repairs, or rewrites the file.
//! - Only a file that is not a JSON object falls back to the default document;
//!   record entries that do not decode are carried through verbatim.
//! - Output is UTF-8 with 2-space indentation and unescaped non-ASCII text.

use super::{DocumentStore, StoreError, StoreResult};
use crate::model::document::Document;
use log::{error, info, warn};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Store backed by a single JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

/// Why `load` fell back to the default document.
#[derive(Debug)]
enum LoadFallback {
    Missing,
    Unreadable(std::io::Error),
    InvalidJson(serde_json::Error),
    NotAnObject,
    InvalidShape(serde_json::Error),
}

impl LoadFallback {
    fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Unreadable(_) => "unreadable",
            Self::InvalidJson(_) => "invalid_json",
            Self::NotAnObject => "not_an_object",
            Self::InvalidShape(_) => "invalid_shape",
        }
    }
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document, LoadFallback> {
        let text = fs::read_to_string(&self.path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => LoadFallback::Missing,
            _ => LoadFallback::Unreadable(err),
        })?;

        let value: Value = serde_json::from_str(&text).map_err(LoadFallback::InvalidJson)?;
        if !value.is_object() {
            return Err(LoadFallback::NotAnObject);
        }

        let document: Document =
            serde_json::from_value(value).map_err(LoadFallback::InvalidShape)?;
        Ok(document.normalized())
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Document {
        let started_at = Instant::now();
        match self.read_document() {
            Ok(document) => {
                info!(
                    "event=store_load module=store status=ok outcome=file greenhouses={} records={} duration_ms={}",
                    document.greenhouses.len(),
                    document.records.len(),
                    started_at.elapsed().as_millis()
                );
                let unreadable = document.unreadable_records();
                if unreadable > 0 {
                    warn!(
                        "event=store_load module=store status=partial unreadable_records={unreadable}"
                    );
                }
                document
            }
            Err(LoadFallback::Missing) => {
                info!("event=store_load module=store status=ok outcome=default reason=missing");
                Document::default()
            }
            Err(reason) => {
                let detail = match &reason {
                    LoadFallback::Unreadable(err) => err.to_string(),
                    LoadFallback::InvalidJson(err) | LoadFallback::InvalidShape(err) => {
                        err.to_string()
                    }
                    LoadFallback::Missing | LoadFallback::NotAnObject => String::new(),
                };
                warn!(
                    "event=store_load module=store status=fallback outcome=default reason={} detail={}",
                    reason.code(),
                    detail
                );
                Document::default()
            }
        }
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let started_at = Instant::now();
        let content = serde_json::to_string_pretty(document)?;

        match write_replacing(&self.path, content.as_bytes()) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok records={} bytes={} duration_ms={}",
                    document.records.len(),
                    content.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(source) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    source
                );
                Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }
}

fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp_path = temp_path_for(path);
    let result = (|| {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
