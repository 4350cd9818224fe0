//! Chart input series.

use crate::stats::daily::DayAverage;
use chrono::NaiveDate;

/// Dual-axis climograph input: average temperature and humidity per day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClimographSeries {
    pub dates: Vec<NaiveDate>,
    pub temp_avg: Vec<f64>,
    pub hr_avg: Vec<f64>,
}

impl ClimographSeries {
    pub fn from_days(days: &[DayAverage]) -> Self {
        Self {
            dates: days.iter().map(|day| day.date).collect(),
            temp_avg: days.iter().map(|day| day.temp_avg).collect(),
            hr_avg: days.iter().map(|day| day.hr_avg).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Bar chart input: mean CO₂ per day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Co2Series {
    pub dates: Vec<NaiveDate>,
    pub co2_mean: Vec<f64>,
}

impl Co2Series {
    pub fn from_days(days: &[DayAverage]) -> Self {
        Self {
            dates: days.iter().map(|day| day.date).collect(),
            co2_mean: days.iter().map(|day| day.co2_mean).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
