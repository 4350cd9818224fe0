//! Measurement record model.
//!
//! # Responsibility
//! - Define one environmental observation and its persisted field names.
//! - Validate reading invariants for callers that accept user input.
//! - Generate timestamp-derived record ids that stay unique per session.
//!
//! # Invariants
//! - `date` is persisted as `YYYY-MM-DD`, `time` as `HH:MM` (`HH:MM:SS` when
//!   the seconds are not zero).
//! - Generated ids are 20 ASCII digits and strictly increasing.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record identifier as stored in the `id` field.
pub type RecordId = String;

const ID_FORMAT: &str = "%Y%m%d%H%M%S%6f";
const ID_WIDTH: usize = 20;

/// One environmental observation for a greenhouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(rename = "invernadero")]
    pub greenhouse: String,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
    #[serde(rename = "hora", with = "hhmm")]
    pub time: NaiveTime,
    pub temp_max: f64,
    pub temp_min: f64,
    pub hr_max: f64,
    pub hr_min: f64,
    pub co2: f64,
}

impl Record {
    /// Builds a record from its identity fields and a set of readings.
    ///
    /// No reading validation happens here; see [`Readings::validate`].
    pub fn new(
        id: RecordId,
        greenhouse: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        readings: Readings,
    ) -> Self {
        Self {
            id,
            greenhouse: greenhouse.into(),
            date,
            time,
            temp_max: readings.temp_max,
            temp_min: readings.temp_min,
            hr_max: readings.hr_max,
            hr_min: readings.hr_min,
            co2: readings.co2,
        }
    }

    /// Returns the five numeric readings of this record.
    pub fn readings(&self) -> Readings {
        Readings {
            temp_max: self.temp_max,
            temp_min: self.temp_min,
            hr_max: self.hr_max,
            hr_min: self.hr_min,
            co2: self.co2,
        }
    }

    /// Overwrites the numeric readings, leaving id, greenhouse, date and time untouched.
    pub fn apply_readings(&mut self, readings: Readings) {
        self.temp_max = readings.temp_max;
        self.temp_min = readings.temp_min;
        self.hr_max = readings.hr_max;
        self.hr_min = readings.hr_min;
        self.co2 = readings.co2;
    }
}

/// The numeric part of a record: temperature (°C), relative humidity (%) and CO₂ (ppm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readings {
    pub temp_max: f64,
    pub temp_min: f64,
    pub hr_max: f64,
    pub hr_min: f64,
    pub co2: f64,
}

/// Reading invariant violations reported by [`Readings::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingsValidationError {
    /// A reading is NaN or infinite; carries the field name.
    NotFinite(&'static str),
    /// `temp_min` is greater than `temp_max`.
    TemperatureRangeReversed,
    /// `hr_min` is greater than `hr_max`.
    HumidityRangeReversed,
    /// A humidity reading is outside `[0, 100]`; carries the field name.
    HumidityOutOfRange(&'static str),
    /// `co2` is negative.
    NegativeCo2,
}

impl Display for ReadingsValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFinite(field) => write!(f, "`{field}` must be a finite number"),
            Self::TemperatureRangeReversed => {
                write!(f, "minimum temperature cannot exceed maximum temperature")
            }
            Self::HumidityRangeReversed => {
                write!(f, "minimum humidity cannot exceed maximum humidity")
            }
            Self::HumidityOutOfRange(field) => write!(f, "`{field}` must be within 0..=100"),
            Self::NegativeCo2 => write!(f, "`co2` cannot be negative"),
        }
    }
}

impl Error for ReadingsValidationError {}

impl Readings {
    /// Checks the invariants a caller must hold before creating or updating a record.
    ///
    /// # Errors
    /// - Any field is not finite.
    /// - `temp_min > temp_max` or `hr_min > hr_max`.
    /// - Humidity outside `[0, 100]`, or negative `co2`.
    pub fn validate(&self) -> Result<(), ReadingsValidationError> {
        let fields = [
            ("temp_max", self.temp_max),
            ("temp_min", self.temp_min),
            ("hr_max", self.hr_max),
            ("hr_min", self.hr_min),
            ("co2", self.co2),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ReadingsValidationError::NotFinite(*field));
        }

        if self.temp_min > self.temp_max {
            return Err(ReadingsValidationError::TemperatureRangeReversed);
        }
        for (field, value) in [("hr_max", self.hr_max), ("hr_min", self.hr_min)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ReadingsValidationError::HumidityOutOfRange(field));
            }
        }
        if self.hr_min > self.hr_max {
            return Err(ReadingsValidationError::HumidityRangeReversed);
        }
        if self.co2 < 0.0 {
            return Err(ReadingsValidationError::NegativeCo2);
        }

        Ok(())
    }
}

/// Issues record ids derived from the local wall clock at microsecond precision.
///
/// Two ids requested within the same clock tick (or after the clock steps
/// back) would collide, so the generator never issues a value that is not
/// strictly greater than the last one it issued or saw at seeding time.
#[derive(Debug, Clone, Default)]
pub struct RecordIdGenerator {
    last: Option<u128>,
}

impl RecordIdGenerator {
    /// Creates a generator that will not reissue any of the given numeric ids.
    ///
    /// Non-numeric ids and ids wider than a generated id are ignored.
    pub fn seeded<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let last = existing
            .into_iter()
            .filter(|id| is_id_shaped(id))
            .filter_map(|id| id.parse::<u128>().ok())
            .max();
        Self { last }
    }

    /// Issues the next id from the current local time.
    pub fn next_id(&mut self) -> RecordId {
        self.next_at(Local::now().naive_local())
    }

    pub(crate) fn next_at(&mut self, now: NaiveDateTime) -> RecordId {
        let candidate = now
            .format(ID_FORMAT)
            .to_string()
            .parse::<u128>()
            .unwrap_or_default();
        let value = match self.last {
            Some(last) if candidate <= last => last.checked_add(1).unwrap_or(candidate),
            _ => candidate,
        };
        self.last = Some(value);
        format!("{value:0width$}", width = ID_WIDTH)
    }
}

fn is_id_shaped(id: &str) -> bool {
    !id.is_empty() && id.len() <= ID_WIDTH && id.bytes().all(|b| b.is_ascii_digit())
}

/// Serde adapter persisting `NaiveTime` as `HH:MM`.
///
/// Reads also accept `HH:MM:SS`; non-zero seconds are written back.
mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";
    const FORMAT_SECONDS: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        let format = if time.second() == 0 {
            FORMAT
        } else {
            FORMAT_SECONDS
        };
        serializer.collect_str(&time.format(format))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&text, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&text, FORMAT_SECONDS))
            .map_err(|err| de::Error::custom(format!("invalid time `{text}`: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{Readings, ReadingsValidationError, Record, RecordIdGenerator};
    use chrono::{NaiveDate, NaiveTime};

    fn readings() -> Readings {
        Readings {
            temp_max: 25.0,
            temp_min: 15.0,
            hr_max: 80.0,
            hr_min: 60.0,
            co2: 800.0,
        }
    }

    fn at(h: u32, m: u32, s: u32, micro: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_micro_opt(h, m, s, micro)
            .unwrap()
    }

    #[test]
    fn id_is_microsecond_timestamp() {
        let mut ids = RecordIdGenerator::default();
        assert_eq!(ids.next_at(at(14, 30, 22, 123_456)), "20240115143022123456");
    }

    #[test]
    fn ids_in_same_tick_do_not_collide() {
        let mut ids = RecordIdGenerator::default();
        let now = at(14, 30, 22, 123_456);
        let first = ids.next_at(now);
        let second = ids.next_at(now);
        assert_eq!(first, "20240115143022123456");
        assert_eq!(second, "20240115143022123457");
    }

    #[test]
    fn seeded_generator_skips_existing_ids() {
        let mut ids = RecordIdGenerator::seeded(["20240115143022123456", "legacy-id"]);
        assert_eq!(ids.next_at(at(14, 30, 22, 0)), "20240115143022123457");
    }

    #[test]
    fn oversized_seed_ids_do_not_overflow_the_generator() {
        let max = u128::MAX.to_string();
        let mut ids = RecordIdGenerator::seeded([max.as_str(), "20240115143022123456"]);
        assert_eq!(ids.next_at(at(14, 30, 22, 0)), "20240115143022123457");

        let mut at_limit = RecordIdGenerator {
            last: Some(u128::MAX),
        };
        assert_eq!(at_limit.next_at(at(14, 30, 22, 0)), "20240115143022000000");
    }

    #[test]
    fn validate_accepts_equal_bounds() {
        let flat = Readings {
            temp_max: 20.0,
            temp_min: 20.0,
            hr_max: 100.0,
            hr_min: 100.0,
            co2: 0.0,
        };
        assert_eq!(flat.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_reversed_and_out_of_range_values() {
        let mut value = readings();
        value.temp_min = 30.0;
        assert_eq!(
            value.validate(),
            Err(ReadingsValidationError::TemperatureRangeReversed)
        );

        let mut value = readings();
        value.hr_min = 90.0;
        assert_eq!(
            value.validate(),
            Err(ReadingsValidationError::HumidityRangeReversed)
        );

        let mut value = readings();
        value.hr_max = 101.0;
        assert_eq!(
            value.validate(),
            Err(ReadingsValidationError::HumidityOutOfRange("hr_max"))
        );

        let mut value = readings();
        value.co2 = -1.0;
        assert_eq!(value.validate(), Err(ReadingsValidationError::NegativeCo2));

        let mut value = readings();
        value.temp_max = f64::NAN;
        assert_eq!(
            value.validate(),
            Err(ReadingsValidationError::NotFinite("temp_max"))
        );
    }

    #[test]
    fn record_serializes_with_persisted_field_names() {
        let record = Record::new(
            "20240115143022123456".to_string(),
            "Invernadero 1",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            readings(),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["invernadero"], "Invernadero 1");
        assert_eq!(json["fecha"], "2024-01-15");
        assert_eq!(json["hora"], "14:30");
        assert_eq!(json["co2"], 800.0);

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "id",
                "invernadero",
                "fecha",
                "hora",
                "temp_max",
                "temp_min",
                "hr_max",
                "hr_min",
                "co2"
            ]
        );
    }

    #[test]
    fn record_accepts_integer_readings_and_seconds() {
        let json = serde_json::json!({
            "id": "1",
            "invernadero": "A",
            "fecha": "2024-01-15",
            "hora": "08:05:59",
            "temp_max": 25,
            "temp_min": 15,
            "hr_max": 80,
            "hr_min": 60,
            "co2": 800
        });
        let record: Record = serde_json::from_value(json).unwrap();
        assert_eq!(record.temp_max, 25.0);
        assert_eq!(record.time, NaiveTime::from_hms_opt(8, 5, 59).unwrap());
        assert_eq!(serde_json::to_value(&record).unwrap()["hora"], "08:05:59");
    }

    #[test]
    fn sub_second_time_does_not_decode() {
        let json = serde_json::json!({
            "id": "1",
            "invernadero": "A",
            "fecha": "2024-01-15",
            "hora": "14:30:00.5",
            "temp_max": 25,
            "temp_min": 15,
            "hr_max": 80,
            "hr_min": 60,
            "co2": 800
        });
        assert!(serde_json::from_value::<Record>(json).is_err());
    }

    #[test]
    fn apply_readings_keeps_identity_fields() {
        let mut record = Record::new(
            "1".to_string(),
            "A",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            readings(),
        );
        let before = record.clone();
        let updated = Readings {
            temp_max: 30.0,
            temp_min: 10.0,
            hr_max: 70.0,
            hr_min: 50.0,
            co2: 900.0,
        };
        record.apply_readings(updated);

        assert_eq!(record.readings(), updated);
        assert_eq!(record.id, before.id);
        assert_eq!(record.greenhouse, before.greenhouse);
        assert_eq!(record.date, before.date);
        assert_eq!(record.time, before.time);
    }
}
