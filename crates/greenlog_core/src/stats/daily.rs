//! Per-day averages over measurement records.

use crate::model::record::Record;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Mean readings for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayAverage {
    pub date: NaiveDate,
    pub temp_max_mean: f64,
    pub temp_min_mean: f64,
    pub hr_max_mean: f64,
    pub hr_min_mean: f64,
    pub co2_mean: f64,
    /// `(temp_max_mean + temp_min_mean) / 2`.
    pub temp_avg: f64,
    /// `(hr_max_mean + hr_min_mean) / 2`.
    pub hr_avg: f64,
    /// Number of records averaged for this date.
    pub samples: usize,
}

#[derive(Debug, Default)]
struct DaySums {
    temp_max: f64,
    temp_min: f64,
    hr_max: f64,
    hr_min: f64,
    co2: f64,
    samples: usize,
}

impl DaySums {
    fn add(&mut self, record: &Record) {
        self.temp_max += record.temp_max;
        self.temp_min += record.temp_min;
        self.hr_max += record.hr_max;
        self.hr_min += record.hr_min;
        self.co2 += record.co2;
        self.samples += 1;
    }

    fn average(&self, date: NaiveDate) -> DayAverage {
        let n = self.samples as f64;
        let temp_max_mean = self.temp_max / n;
        let temp_min_mean = self.temp_min / n;
        let hr_max_mean = self.hr_max / n;
        let hr_min_mean = self.hr_min / n;

        DayAverage {
            date,
            temp_max_mean,
            temp_min_mean,
            hr_max_mean,
            hr_min_mean,
            co2_mean: self.co2 / n,
            temp_avg: (temp_max_mean + temp_min_mean) / 2.0,
            hr_avg: (hr_max_mean + hr_min_mean) / 2.0,
            samples: self.samples,
        }
    }
}

/// Groups records by date and averages every reading per date.
///
/// Every record counts, duplicates included. Returns an empty vector for
/// empty input; otherwise one entry per distinct date, ascending.
pub fn daily_averages<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<DayAverage> {
    let mut by_date: BTreeMap<NaiveDate, DaySums> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date).or_default().add(record);
    }

    by_date
        .iter()
        .map(|(date, sums)| sums.average(*date))
        .collect()
}
