use chrono::{NaiveDate, NaiveTime};
use greenlog_core::{
    ClimographSeries, Co2Series, JsonFileStore, MeasurementRepository, Readings, SummaryReport,
    ALL_GREENHOUSES_LABEL,
};

fn readings(temp: (f64, f64), hr: (f64, f64), co2: f64) -> Readings {
    Readings {
        temp_max: temp.0,
        temp_min: temp.1,
        hr_max: hr.0,
        hr_min: hr.1,
        co2,
    }
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

fn seeded_repo(dir: &tempfile::TempDir) -> MeasurementRepository<JsonFileStore> {
    let mut repo = MeasurementRepository::open(JsonFileStore::new(dir.path().join("datos.json")));
    repo.add_greenhouse("Norte").unwrap();

    let rows = [
        ("Invernadero 1", date(1, 15), (20.0, 10.0), (80.0, 60.0), 700.0),
        ("Invernadero 1", date(1, 15), (30.0, 20.0), (90.0, 70.0), 900.0),
        ("Norte", date(1, 14), (18.0, 8.0), (70.0, 50.0), 500.0),
        ("Invernadero 1", date(1, 2), (24.0, 14.0), (75.0, 55.0), 600.0),
        ("Norte", date(1, 15), (26.0, 16.0), (88.0, 68.0), 1100.0),
    ];
    for (hour, (greenhouse, day, temp, hr, co2)) in rows.into_iter().enumerate() {
        repo.add_record(greenhouse, day, time(hour as u32), readings(temp, hr, co2))
            .unwrap();
    }
    repo
}

#[test]
fn same_day_records_average_per_metric() {
    let dir = tempfile::tempdir().unwrap();
    let repo = seeded_repo(&dir);

    let days = repo.daily_averages(Some("Invernadero 1"));
    let jan_15 = days.iter().find(|d| d.date == date(1, 15)).unwrap();
    assert_eq!(jan_15.temp_max_mean, 25.0);
    assert_eq!(jan_15.temp_min_mean, 15.0);
    assert_eq!(jan_15.temp_avg, 20.0);
    assert_eq!(jan_15.hr_avg, 75.0);
    assert_eq!(jan_15.co2_mean, 800.0);
    assert_eq!(jan_15.samples, 2);
}

#[test]
fn unfiltered_averages_span_all_greenhouses_sorted_by_date() {
    let dir = tempfile::tempdir().unwrap();
    let repo = seeded_repo(&dir);

    let days = repo.daily_averages(None);
    let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
    assert_eq!(dates, vec![date(1, 2), date(1, 14), date(1, 15)]);
    assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));

    let jan_15 = days.last().unwrap();
    assert_eq!(jan_15.samples, 3);
    assert_eq!(jan_15.co2_mean, 900.0);
}

#[test]
fn unknown_greenhouse_or_empty_store_has_no_averages() {
    let dir = tempfile::tempdir().unwrap();
    let repo = seeded_repo(&dir);
    assert!(repo.daily_averages(Some("Sur")).is_empty());

    let empty_dir = tempfile::tempdir().unwrap();
    let empty = MeasurementRepository::open(JsonFileStore::new(empty_dir.path().join("d.json")));
    assert!(empty.daily_averages(None).is_empty());
}

#[test]
fn report_and_chart_series_follow_daily_averages() {
    let dir = tempfile::tempdir().unwrap();
    let repo = seeded_repo(&dir);
    let days = repo.daily_averages(None);

    let climograph = ClimographSeries::from_days(&days);
    let co2 = Co2Series::from_days(&days);
    assert_eq!(climograph.dates.len(), 3);
    assert_eq!(co2.co2_mean.last().copied(), Some(900.0));

    let generated_at = date(2, 1).and_hms_opt(8, 0, 0).unwrap();
    let report = SummaryReport::build(ALL_GREENHOUSES_LABEL, &days, generated_at).unwrap();
    assert_eq!(report.summary.days, 3);
    assert_eq!(report.summary.samples, 5);
    assert_eq!(report.summary.co2_mean.min, 500.0);
    assert_eq!(report.summary.co2_mean.max, 900.0);
    assert!(report
        .render_text()
        .contains("Invernadero: Todos los Invernaderos"));
}
