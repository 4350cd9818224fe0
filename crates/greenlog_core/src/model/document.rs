//! Persisted store document.
//!
//! # Responsibility
//! - Define the single JSON document holding greenhouses and records.
//! - Fill missing or empty sections with their defaults on decode.
//! - Keep record entries that do not decode so they survive the next save.
//!
//! # Invariants
//! - Known keys serialize first (`invernaderos`, `registros`), followed by
//!   any unknown top-level keys in their original order.
//! - Unreadable record entries are written back byte-for-byte in place.

use crate::model::record::Record;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Greenhouse created when the store holds none.
pub const DEFAULT_GREENHOUSE: &str = "Invernadero 1";

/// Whole-store document: ordered greenhouse names plus every record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "invernaderos", default, deserialize_with = "null_as_default")]
    pub greenhouses: Vec<String>,
    #[serde(rename = "registros", default, deserialize_with = "null_as_default")]
    pub records: Vec<StoredRecord>,
    /// Top-level keys this crate does not know about, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            greenhouses: vec![DEFAULT_GREENHOUSE.to_string()],
            records: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Document {
    /// Restores the non-empty greenhouse invariant after decoding.
    pub fn normalized(mut self) -> Self {
        if self.greenhouses.is_empty() {
            self.greenhouses.push(DEFAULT_GREENHOUSE.to_string());
        }
        self
    }

    /// Records that decoded into the typed model, in document order.
    pub fn readable_records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter_map(StoredRecord::as_record)
    }

    pub fn readable_records_mut(&mut self) -> impl Iterator<Item = &mut Record> {
        self.records.iter_mut().filter_map(StoredRecord::as_record_mut)
    }

    /// Number of record entries kept verbatim because they did not decode.
    pub fn unreadable_records(&self) -> usize {
        self.records
            .iter()
            .filter(|entry| entry.as_record().is_none())
            .count()
    }
}

/// One entry of the `registros` list.
///
/// Entries that fail to decode as a [`Record`] (missing field, bad date or
/// time, wrong type) are kept as raw JSON. They are skipped by listings and
/// aggregates but still follow greenhouse cascades and id deletes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredRecord {
    Readable(Record),
    Unreadable(Value),
}

impl StoredRecord {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Readable(record) => Some(record),
            Self::Unreadable(_) => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Self::Readable(record) => Some(record),
            Self::Unreadable(_) => None,
        }
    }

    /// The `id` field, when present as a string.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Readable(record) => Some(record.id.as_str()),
            Self::Unreadable(value) => value.get("id").and_then(Value::as_str),
        }
    }

    /// The `invernadero` field, when present as a string.
    pub fn greenhouse(&self) -> Option<&str> {
        match self {
            Self::Readable(record) => Some(record.greenhouse.as_str()),
            Self::Unreadable(value) => value.get("invernadero").and_then(Value::as_str),
        }
    }

    /// Points the entry at another greenhouse. Unreadable entries are only
    /// touched when they already carry a string `invernadero`.
    pub fn set_greenhouse(&mut self, name: &str) {
        match self {
            Self::Readable(record) => record.greenhouse = name.to_string(),
            Self::Unreadable(Value::Object(map)) => {
                if let Some(slot) = map.get_mut("invernadero").filter(|v| v.is_string()) {
                    *slot = Value::String(name.to_string());
                }
            }
            Self::Unreadable(_) => {}
        }
    }
}

impl From<Record> for StoredRecord {
    fn from(value: Record) -> Self {
        Self::Readable(value)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
