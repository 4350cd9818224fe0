//! Range summary over daily averages.

use crate::stats::daily::DayAverage;
use chrono::NaiveDate;

/// Minimum, mean and maximum of one daily metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl MetricSummary {
    /// Returns `None` for an empty series.
    pub fn compute(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return None;
        }
        Some(Self {
            min,
            mean: sum / count as f64,
            max,
        })
    }
}

/// Whole-range statistics the report needs, one value per day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub days: usize,
    pub samples: usize,
    pub temp_avg: MetricSummary,
    pub hr_avg: MetricSummary,
    pub co2_mean: MetricSummary,
}

impl RangeSummary {
    /// Summarizes date-sorted daily averages. Returns `None` when `days` is empty.
    pub fn from_days(days: &[DayAverage]) -> Option<Self> {
        let first = days.first()?;
        let last = days.last()?;

        Some(Self {
            first_date: first.date,
            last_date: last.date,
            days: days.len(),
            samples: days.iter().map(|day| day.samples).sum(),
            temp_avg: MetricSummary::compute(days.iter().map(|day| day.temp_avg))?,
            hr_avg: MetricSummary::compute(days.iter().map(|day| day.hr_avg))?,
            co2_mean: MetricSummary::compute(days.iter().map(|day| day.co2_mean))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MetricSummary, RangeSummary};
    use crate::stats::daily::DayAverage;
    use chrono::NaiveDate;

    fn day(d: u32, temp_avg: f64, hr_avg: f64, co2_mean: f64) -> DayAverage {
        DayAverage {
            date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
            temp_max_mean: temp_avg,
            temp_min_mean: temp_avg,
            hr_max_mean: hr_avg,
            hr_min_mean: hr_avg,
            co2_mean,
            temp_avg,
            hr_avg,
            samples: 2,
        }
    }

    #[test]
    fn metric_summary_of_empty_series_is_none() {
        assert_eq!(MetricSummary::compute(Vec::<f64>::new()), None);
    }

    #[test]
    fn range_summary_covers_min_mean_max() {
        let days = [
            day(1, 18.0, 70.0, 600.0),
            day(2, 22.0, 80.0, 1000.0),
            day(5, 20.0, 60.0, 800.0),
        ];

        let summary = RangeSummary::from_days(&days).unwrap();
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(summary.last_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(summary.days, 3);
        assert_eq!(summary.samples, 6);
        assert_eq!(
            summary.temp_avg,
            MetricSummary {
                min: 18.0,
                mean: 20.0,
                max: 22.0
            }
        );
        assert_eq!(summary.hr_avg.mean, 70.0);
        assert_eq!(summary.co2_mean.max, 1000.0);
    }

    #[test]
    fn range_summary_of_no_days_is_none() {
        assert_eq!(RangeSummary::from_days(&[]), None);
    }
}
