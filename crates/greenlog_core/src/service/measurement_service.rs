//! Measurement use-case service.
//!
//! # Responsibility
//! - Apply the checks a caller owes the repository before record writes.
//! - Translate repository no-op outcomes into typed errors for front ends.
//!
//! # Invariants
//! - Records are only created for greenhouses that exist at creation time.
//! - Readings are validated before any repository call.

use crate::model::record::{Readings, ReadingsValidationError, Record, RecordId};
use crate::repo::measurement_repo::{MeasurementRepository, RepoError};
use crate::store::DocumentStore;
use chrono::{NaiveDate, NaiveTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for measurement use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Readings violate a range or ordering invariant.
    InvalidReadings(ReadingsValidationError),
    /// Target greenhouse does not exist.
    UnknownGreenhouse(String),
    /// Target record does not exist.
    RecordNotFound(RecordId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReadings(err) => write!(f, "invalid readings: {err}"),
            Self::UnknownGreenhouse(name) => write!(f, "greenhouse not found: `{name}`"),
            Self::RecordNotFound(id) => write!(f, "record not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidReadings(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReadingsValidationError> for ServiceError {
    fn from(value: ReadingsValidationError) -> Self {
        Self::InvalidReadings(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Validating facade over a borrowed repository.
pub struct MeasurementService<'repo, S: DocumentStore> {
    repo: &'repo mut MeasurementRepository<S>,
}

impl<'repo, S: DocumentStore> MeasurementService<'repo, S> {
    pub fn new(repo: &'repo mut MeasurementRepository<S>) -> Self {
        Self { repo }
    }

    /// Records one observation and returns the stored record.
    ///
    /// # Errors
    /// - `UnknownGreenhouse` when `greenhouse` is not in the greenhouse set.
    /// - `InvalidReadings` when `readings` fail validation.
    /// - `Repo` when the write fails.
    pub fn record_measurement(
        &mut self,
        greenhouse: &str,
        date: NaiveDate,
        time: NaiveTime,
        readings: Readings,
    ) -> Result<Record, ServiceError> {
        if !self.repo.has_greenhouse(greenhouse) {
            return Err(ServiceError::UnknownGreenhouse(greenhouse.to_string()));
        }
        readings.validate()?;

        let id = self.repo.add_record(greenhouse, date, time, readings)?;
        Ok(Record::new(id, greenhouse, date, time, readings))
    }

    /// Replaces the readings of an existing record.
    pub fn correct_measurement(
        &mut self,
        id: &str,
        readings: Readings,
    ) -> Result<Record, ServiceError> {
        readings.validate()?;
        if !self.repo.update_record(id, readings)? {
            return Err(ServiceError::RecordNotFound(id.to_string()));
        }

        self.repo
            .get_record(id)
            .cloned()
            .ok_or_else(|| ServiceError::RecordNotFound(id.to_string()))
    }

    pub fn delete_measurement(&mut self, id: &str) -> Result<(), ServiceError> {
        if !self.repo.delete_record(id)? {
            return Err(ServiceError::RecordNotFound(id.to_string()));
        }
        Ok(())
    }
}
