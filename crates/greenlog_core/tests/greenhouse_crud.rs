use chrono::{NaiveDate, NaiveTime};
use greenlog_core::{DocumentStore, JsonFileStore, MeasurementRepository, Readings};
use std::path::Path;

fn readings() -> Readings {
    Readings {
        temp_max: 25.0,
        temp_min: 15.0,
        hr_max: 80.0,
        hr_min: 60.0,
        co2: 800.0,
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

fn time() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 30, 0).unwrap()
}

fn open(path: &Path) -> MeasurementRepository<JsonFileStore> {
    MeasurementRepository::open(JsonFileStore::new(path))
}

#[test]
fn add_greenhouse_trims_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datos.json");
    let mut repo = open(&path);

    assert!(repo.add_greenhouse("  X  ").unwrap());
    assert_eq!(repo.greenhouses().iter().filter(|g| *g == "X").count(), 1);

    let reloaded = JsonFileStore::new(&path).load();
    assert_eq!(
        reloaded.greenhouses,
        vec!["Invernadero 1".to_string(), "X".to_string()]
    );
}

#[test]
fn duplicate_greenhouse_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = open(&dir.path().join("datos.json"));

    assert!(repo.add_greenhouse("X").unwrap());
    let before = repo.greenhouses().to_vec();
    assert!(!repo.add_greenhouse("X").unwrap());
    assert!(!repo.add_greenhouse(" X ").unwrap());
    assert_eq!(repo.greenhouses(), before.as_slice());
}

#[test]
fn remove_greenhouse_cascades_to_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datos.json");
    let mut repo = open(&path);

    repo.add_greenhouse("X").unwrap();
    repo.add_record("X", date(), time(), readings()).unwrap();
    repo.add_record("X", date(), time(), readings()).unwrap();
    let kept = repo
        .add_record("Invernadero 1", date(), time(), readings())
        .unwrap();

    assert!(repo.remove_greenhouse("X").unwrap());
    assert!(!repo.has_greenhouse("X"));
    let remaining: Vec<&str> = repo
        .list_records(None)
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(remaining, vec![kept.as_str()]);

    let reloaded = JsonFileStore::new(&path).load();
    assert_eq!(reloaded.records.len(), 1);
    assert_eq!(reloaded.greenhouses, vec!["Invernadero 1".to_string()]);
}

#[test]
fn removing_unknown_or_last_greenhouse_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datos.json");
    let mut repo = open(&path);

    assert!(!repo.remove_greenhouse("missing").unwrap());
    assert!(!repo.remove_greenhouse("Invernadero 1").unwrap());
    assert_eq!(repo.greenhouses(), ["Invernadero 1".to_string()]);
    assert!(!path.exists());
}

#[test]
fn rename_greenhouse_keeps_position_and_retargets_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datos.json");
    let mut repo = open(&path);

    repo.add_greenhouse("A").unwrap();
    repo.add_greenhouse("C").unwrap();
    repo.add_record("A", date(), time(), readings()).unwrap();
    repo.add_record("C", date(), time(), readings()).unwrap();
    repo.add_record("A", date(), time(), readings()).unwrap();

    assert!(repo.rename_greenhouse("A", "  B ").unwrap());
    assert_eq!(
        repo.greenhouses(),
        ["Invernadero 1".to_string(), "B".to_string(), "C".to_string()]
    );
    assert!(repo.list_records(Some("A")).is_empty());
    assert_eq!(repo.list_records(Some("B")).len(), 2);
    assert_eq!(repo.list_records(Some("C")).len(), 1);

    let reloaded = JsonFileStore::new(&path).load();
    assert_eq!(
        reloaded
            .readable_records()
            .filter(|r| r.greenhouse == "B")
            .count(),
        2
    );
}

#[test]
fn rename_rejects_taken_empty_or_unknown_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = open(&dir.path().join("datos.json"));
    repo.add_greenhouse("A").unwrap();

    assert!(!repo.rename_greenhouse("A", "Invernadero 1").unwrap());
    assert!(!repo.rename_greenhouse("A", "   ").unwrap());
    assert!(!repo.rename_greenhouse("missing", "Z").unwrap());
    assert_eq!(
        repo.greenhouses(),
        ["Invernadero 1".to_string(), "A".to_string()]
    );
}

#[test]
fn reopened_repository_sees_persisted_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("datos.json");
    let id = {
        let mut repo = open(&path);
        repo.add_greenhouse("Norte").unwrap();
        repo.add_record("Norte", date(), time(), readings()).unwrap()
    };

    let repo = open(&path);
    assert!(repo.has_greenhouse("Norte"));
    let record = repo.get_record(&id).unwrap();
    assert_eq!(record.greenhouse, "Norte");
    assert_eq!(record.readings(), readings());
}
