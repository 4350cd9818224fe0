//! Greenhouse and record repository over a document store.
//!
//! # Responsibility
//! - Own the in-memory document for the lifetime of a session.
//! - Provide greenhouse/record CRUD with cascade semantics.
//! - Persist through the store after every successful mutation.
//!
//! # Invariants
//! - Greenhouse names are trimmed, unique and kept in insertion order.
//! - At least one greenhouse always remains.
//! - Rejected or no-op operations never write to the store.
//! - A failed write is returned to the caller; the in-memory change stays.

use crate::model::document::{Document, StoredRecord};
use crate::model::record::{Readings, Record, RecordId, RecordIdGenerator};
use crate::stats::daily::{daily_averages, DayAverage};
use crate::store::{DocumentStore, StoreError};
use chrono::{NaiveDate, NaiveTime};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository failure. Input rejections are not errors; they surface as
/// `Ok(false)` from the mutating operations.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Session-scoped repository holding the authoritative document.
pub struct MeasurementRepository<S: DocumentStore> {
    store: S,
    document: Document,
    ids: RecordIdGenerator,
}

impl<S: DocumentStore> MeasurementRepository<S> {
    /// Loads the document once from `store` and takes ownership of both.
    pub fn open(store: S) -> Self {
        let document = store.load();
        let ids = RecordIdGenerator::seeded(document.records.iter().filter_map(StoredRecord::id));
        Self {
            store,
            document,
            ids,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Greenhouse names in display order.
    pub fn greenhouses(&self) -> &[String] {
        &self.document.greenhouses
    }

    pub fn has_greenhouse(&self, name: &str) -> bool {
        self.document.greenhouses.iter().any(|g| g == name)
    }

    /// Appends a greenhouse after trimming `name`.
    ///
    /// Returns `Ok(false)` without writing when the trimmed name is empty or
    /// already present.
    pub fn add_greenhouse(&mut self, name: &str) -> RepoResult<bool> {
        let name = name.trim();
        if name.is_empty() || self.has_greenhouse(name) {
            debug!("event=greenhouse_add module=repo status=rejected");
            return Ok(false);
        }

        self.document.greenhouses.push(name.to_string());
        self.persist("greenhouse_add")?;
        Ok(true)
    }

    /// Removes a greenhouse together with all of its records.
    ///
    /// Returns `Ok(false)` without writing when `name` is unknown or is the
    /// only greenhouse left.
    pub fn remove_greenhouse(&mut self, name: &str) -> RepoResult<bool> {
        let Some(index) = self.position_of(name) else {
            debug!("event=greenhouse_remove module=repo status=rejected reason=unknown");
            return Ok(false);
        };
        if self.document.greenhouses.len() == 1 {
            debug!("event=greenhouse_remove module=repo status=rejected reason=last_greenhouse");
            return Ok(false);
        }

        self.document.greenhouses.remove(index);
        let before = self.document.records.len();
        self.document
            .records
            .retain(|entry| entry.greenhouse() != Some(name));
        info!(
            "event=greenhouse_remove module=repo status=ok cascaded_records={}",
            before - self.document.records.len()
        );

        self.persist("greenhouse_remove")?;
        Ok(true)
    }

    /// Renames a greenhouse in place and retargets its records.
    ///
    /// Returns `Ok(false)` without writing when the trimmed `new` is empty or
    /// taken, or `old` is unknown.
    pub fn rename_greenhouse(&mut self, old: &str, new: &str) -> RepoResult<bool> {
        let new = new.trim();
        if new.is_empty() || self.has_greenhouse(new) {
            debug!("event=greenhouse_rename module=repo status=rejected reason=invalid_name");
            return Ok(false);
        }
        let Some(index) = self.position_of(old) else {
            debug!("event=greenhouse_rename module=repo status=rejected reason=unknown");
            return Ok(false);
        };

        self.document.greenhouses[index] = new.to_string();
        for entry in self
            .document
            .records
            .iter_mut()
            .filter(|entry| entry.greenhouse() == Some(old))
        {
            entry.set_greenhouse(new);
        }

        self.persist("greenhouse_rename")?;
        Ok(true)
    }

    /// Appends a record with a freshly generated id and returns that id.
    ///
    /// Performs no validation; callers check greenhouse existence and reading
    /// invariants beforehand (see `MeasurementService`).
    pub fn add_record(
        &mut self,
        greenhouse: &str,
        date: NaiveDate,
        time: NaiveTime,
        readings: Readings,
    ) -> RepoResult<RecordId> {
        let id = self.ids.next_id();
        self.document
            .records
            .push(Record::new(id.clone(), greenhouse, date, time, readings).into());

        self.persist("record_add")?;
        Ok(id)
    }

    /// Deletes the record with `id`. Writes only when a record was removed.
    pub fn delete_record(&mut self, id: &str) -> RepoResult<bool> {
        let before = self.document.records.len();
        self.document.records.retain(|entry| entry.id() != Some(id));
        if self.document.records.len() == before {
            debug!("event=record_delete module=repo status=noop reason=unknown_id");
            return Ok(false);
        }

        self.persist("record_delete")?;
        Ok(true)
    }

    /// Overwrites the readings of the first record with `id`.
    ///
    /// Id, greenhouse, date and time are left untouched. Unknown ids are a
    /// silent no-op returning `Ok(false)`.
    pub fn update_record(&mut self, id: &str, readings: Readings) -> RepoResult<bool> {
        let Some(record) = self
            .document
            .readable_records_mut()
            .find(|record| record.id == id)
        else {
            debug!("event=record_update module=repo status=noop reason=unknown_id");
            return Ok(false);
        };

        record.apply_readings(readings);
        self.persist("record_update")?;
        Ok(true)
    }

    pub fn get_record(&self, id: &str) -> Option<&Record> {
        self.document.readable_records().find(|record| record.id == id)
    }

    /// Lists records in document order, optionally filtered by exact greenhouse name.
    ///
    /// An empty filter lists every record. Entries that did not decode are skipped.
    pub fn list_records(&self, greenhouse: Option<&str>) -> Vec<&Record> {
        let greenhouse = greenhouse.filter(|name| !name.is_empty());
        self.document
            .readable_records()
            .filter(|record| greenhouse.map_or(true, |name| record.greenhouse == name))
            .collect()
    }

    /// Per-date averages over the records `list_records(greenhouse)` returns.
    pub fn daily_averages(&self, greenhouse: Option<&str>) -> Vec<DayAverage> {
        daily_averages(self.list_records(greenhouse))
    }

    fn position_of(&self, name: &str) -> Option<usize> {
        self.document.greenhouses.iter().position(|g| g == name)
    }

    fn persist(&self, event: &'static str) -> RepoResult<()> {
        match self.store.save(&self.document) {
            Ok(()) => {
                debug!("event={event} module=repo status=ok");
                Ok(())
            }
            Err(err) => {
                error!("event={event} module=repo status=error error_code=store_save_failed");
                Err(err.into())
            }
        }
    }
}
