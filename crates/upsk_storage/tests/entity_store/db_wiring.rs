#![forbid(unsafe_code)]

use upsk_contracts::directory::{
    CampusRecord, CampusSlots, Counselor, CounselorId, CounselorRole, SlotKey, PLACEHOLDER_OFFICER,
};
use upsk_contracts::logo::LogoAsset;
use upsk_storage::entity_store::{
    STORAGE_KEY_CAMPUS_LIST, STORAGE_KEY_COUNSELORS_IPGM, STORAGE_KEY_LOGO,
};
use upsk_storage::{
    EditOutcome, FieldSource, FileKeyValue, InMemoryKeyValue, KeyValuePort, PersistedEntityStore,
    StorageError,
};

const LOGO_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==";

fn counselor(id: &str, name: &str) -> Counselor {
    Counselor::ipgm_v1(
        CounselorId::new(id).unwrap(),
        name,
        CounselorRole::PenolongPengarah,
        None,
    )
}

fn campus(name: &str, ketua: &str, pentadbir: &str, pelajar: &str) -> CampusRecord {
    CampusRecord {
        name: name.to_string(),
        counselors: CampusSlots {
            ketua: ketua.to_string(),
            pentadbir: pentadbir.to_string(),
            pelajar: pelajar.to_string(),
        },
    }
}

fn store_with_roster(roster: Vec<Counselor>) -> PersistedEntityStore<InMemoryKeyValue> {
    let raw = serde_json::to_string(&roster).unwrap();
    let port = InMemoryKeyValue::with_entries([(STORAGE_KEY_COUNSELORS_IPGM, raw)]);
    PersistedEntityStore::load(port).0
}

fn store_with_campuses(campuses: Vec<CampusRecord>) -> PersistedEntityStore<InMemoryKeyValue> {
    let raw = serde_json::to_string(&campuses).unwrap();
    let port = InMemoryKeyValue::with_entries([(STORAGE_KEY_CAMPUS_LIST, raw)]);
    PersistedEntityStore::load(port).0
}

#[test]
fn at_store_db_01_first_run_uses_fixture_defaults() {
    let (store, report) = PersistedEntityStore::load(InMemoryKeyValue::new());
    assert_eq!(report.logo, FieldSource::DefaultAbsent);
    assert_eq!(report.counselors, FieldSource::DefaultAbsent);
    assert_eq!(report.campuses, FieldSource::DefaultAbsent);
    assert!(store.logo().is_none());
    assert_eq!(store.counselors().len(), 2);
    assert_eq!(store.counselors()[0].id.as_str(), "ipgm-1");
    assert_eq!(store.campuses().len(), 28);
    assert_eq!(store.port().writes(), 0);
}

#[test]
fn at_store_db_02_campus_list_roundtrips_in_order() {
    let campuses = vec![
        campus("C2", "A", "B", "C"),
        campus("C1", PLACEHOLDER_OFFICER, "Puan Z", PLACEHOLDER_OFFICER),
        campus("C1", "dup", "dup", "dup"),
    ];
    let (mut store, _) = PersistedEntityStore::load(InMemoryKeyValue::new());
    store.set_campuses(campuses.clone()).unwrap();

    let (reloaded, report) = PersistedEntityStore::load(store.into_port());
    assert_eq!(report.campuses, FieldSource::Stored);
    assert_eq!(reloaded.campuses(), campuses.as_slice());
}

#[test]
fn at_store_db_03_rename_counselor_scenario_and_miss() {
    let mut store = store_with_roster(vec![counselor("a", "X")]);

    assert_eq!(
        store.update_counselor_name("a", "Y").unwrap(),
        EditOutcome::Applied
    );
    assert_eq!(store.counselors(), &[counselor("a", "Y")]);

    let mut untouched = store_with_roster(vec![counselor("a", "X")]);
    assert_eq!(
        untouched.update_counselor_name("missing-id", "Y").unwrap(),
        EditOutcome::Unchanged
    );
    assert_eq!(untouched.counselors(), &[counselor("a", "X")]);
    assert_eq!(untouched.port().writes(), 0);
}

#[test]
fn at_store_db_04_rename_is_idempotent() {
    let mut once = store_with_roster(vec![counselor("a", "X"), counselor("b", "W")]);
    once.update_counselor_name("b", "V").unwrap();

    let mut twice = store_with_roster(vec![counselor("a", "X"), counselor("b", "W")]);
    twice.update_counselor_name("b", "V").unwrap();
    twice.update_counselor_name("b", "V").unwrap();

    assert_eq!(once.counselors(), twice.counselors());
    assert_eq!(
        once.port().raw(STORAGE_KEY_COUNSELORS_IPGM),
        twice.port().raw(STORAGE_KEY_COUNSELORS_IPGM)
    );
}

#[test]
fn at_store_db_05_campus_slot_edit_touches_one_slot() {
    let mut store = store_with_campuses(vec![campus("C1", "P1", "P2", "P3"), campus("C2", "Q1", "Q2", "Q3")]);
    assert_eq!(
        store
            .update_campus_counselor_slot("C1", SlotKey::Pentadbir, "NEW")
            .unwrap(),
        EditOutcome::Applied
    );
    assert_eq!(store.campuses()[0], campus("C1", "P1", "NEW", "P3"));
    assert_eq!(store.campuses()[1], campus("C2", "Q1", "Q2", "Q3"));

    let (reloaded, _) = PersistedEntityStore::load(store.into_port());
    assert_eq!(reloaded.campus("C1").unwrap().counselors.pentadbir, "NEW");
}

#[test]
fn at_store_db_06_campus_slot_edit_on_missing_campus_is_noop() {
    let mut store = store_with_campuses(vec![campus("C1", "P1", "P2", "P3")]);
    assert_eq!(
        store
            .update_campus_counselor_slot("gone", SlotKey::Ketua, "NEW")
            .unwrap(),
        EditOutcome::Unchanged
    );
    assert_eq!(store.campuses(), &[campus("C1", "P1", "P2", "P3")]);
    assert_eq!(store.port().writes(), 0);
}

#[test]
fn at_store_db_07_add_campus_trims_and_defaults_slots() {
    let mut store = store_with_campuses(vec![]);
    assert_eq!(store.add_campus("   ").unwrap(), EditOutcome::Unchanged);
    assert_eq!(store.add_campus("").unwrap(), EditOutcome::Unchanged);
    assert_eq!(store.port().writes(), 0);

    assert_eq!(store.add_campus("  IPGK Baru ").unwrap(), EditOutcome::Applied);
    assert_eq!(store.campuses(), &[CampusRecord::unassigned("IPGK Baru")]);

    assert_eq!(store.add_campus("IPGK Baru").unwrap(), EditOutcome::Applied);
    assert_eq!(store.campuses().len(), 2);
}

#[test]
fn at_store_db_08_remove_campus_keeps_relative_order() {
    let mut store = store_with_campuses(vec![
        CampusRecord::unassigned("A"),
        CampusRecord::unassigned("B"),
        CampusRecord::unassigned("C"),
    ]);
    assert_eq!(store.remove_campus(1).unwrap(), EditOutcome::Applied);
    let names: Vec<&str> = store.campuses().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["A", "C"]);

    assert_eq!(store.remove_campus(7).unwrap(), EditOutcome::Unchanged);
    assert_eq!(store.campuses().len(), 2);
}

#[test]
fn at_store_db_09_replace_campus_writes_whole_record() {
    let mut store = store_with_campuses(vec![CampusRecord::unassigned("A")]);
    let edited = campus("A", "K", "T", "P");
    assert_eq!(store.replace_campus(0, edited.clone()).unwrap(), EditOutcome::Applied);
    assert_eq!(store.replace_campus(3, edited.clone()).unwrap(), EditOutcome::Unchanged);
    let (reloaded, _) = PersistedEntityStore::load(store.into_port());
    assert_eq!(reloaded.campuses(), &[edited]);
}

#[test]
fn at_store_db_10_cleared_logo_stays_cleared_after_reload() {
    let (mut store, _) = PersistedEntityStore::load(InMemoryKeyValue::new());
    store
        .set_logo(Some(LogoAsset::from_data_uri(LOGO_URI).unwrap()))
        .unwrap();
    let (mut store, report) = PersistedEntityStore::load(store.into_port());
    assert_eq!(report.logo, FieldSource::Stored);
    assert_eq!(store.logo().map(LogoAsset::as_str), Some(LOGO_URI));

    store.set_logo(None).unwrap();
    assert!(!store.port().contains_key(STORAGE_KEY_LOGO));

    let (reloaded, report) = PersistedEntityStore::load(store.into_port());
    assert!(reloaded.logo().is_none());
    assert_eq!(report.logo, FieldSource::DefaultAbsent);
}

#[test]
fn at_store_db_11_one_corrupt_key_does_not_block_the_others() {
    let roster = vec![counselor("a", "X")];
    let campuses = vec![campus("C1", "P1", "P2", "P3")];

    let corrupt_roster = InMemoryKeyValue::with_entries([
        (STORAGE_KEY_LOGO, LOGO_URI.to_string()),
        (STORAGE_KEY_COUNSELORS_IPGM, "[{\"id\":".to_string()),
        (STORAGE_KEY_CAMPUS_LIST, serde_json::to_string(&campuses).unwrap()),
    ]);
    let (store, report) = PersistedEntityStore::load(corrupt_roster);
    assert_eq!(report.counselors, FieldSource::DefaultCorrupt);
    assert_eq!(report.logo, FieldSource::Stored);
    assert_eq!(report.campuses, FieldSource::Stored);
    assert_eq!(store.counselors().len(), 2);
    assert_eq!(store.campuses(), campuses.as_slice());
    assert_eq!(store.logo().map(LogoAsset::as_str), Some(LOGO_URI));

    let corrupt_campuses = InMemoryKeyValue::with_entries([
        (STORAGE_KEY_COUNSELORS_IPGM, serde_json::to_string(&roster).unwrap()),
        (
            STORAGE_KEY_CAMPUS_LIST,
            r#"[{"name":"C1","counselors":{"ketua":"P1"}}]"#.to_string(),
        ),
    ]);
    let (store, report) = PersistedEntityStore::load(corrupt_campuses);
    assert_eq!(report.campuses, FieldSource::DefaultCorrupt);
    assert_eq!(report.counselors, FieldSource::Stored);
    assert_eq!(report.logo, FieldSource::DefaultAbsent);
    assert_eq!(store.campuses().len(), 28);
    assert_eq!(store.counselors(), roster.as_slice());

    let empty_logo = InMemoryKeyValue::with_entries([(STORAGE_KEY_LOGO, "")]);
    let (store, report) = PersistedEntityStore::load(empty_logo);
    assert_eq!(report.logo, FieldSource::DefaultCorrupt);
    assert!(store.logo().is_none());
}

#[test]
fn at_store_db_12_partial_hydration_falls_back_per_key() {
    let (mut store, _) = PersistedEntityStore::load(InMemoryKeyValue::new());
    store.add_campus("IPGK Baru").unwrap();
    let port = store.into_port();
    assert!(!port.contains_key(STORAGE_KEY_COUNSELORS_IPGM));

    let (reloaded, report) = PersistedEntityStore::load(port);
    assert_eq!(report.campuses, FieldSource::Stored);
    assert_eq!(report.counselors, FieldSource::DefaultAbsent);
    assert_eq!(reloaded.campuses().len(), 29);
    assert_eq!(reloaded.counselors().len(), 2);
}

#[test]
fn at_store_db_13_every_applied_edit_writes_full_list_immediately() {
    let mut store = store_with_campuses(vec![CampusRecord::unassigned("A")]);
    store.add_campus("B").unwrap();
    store.add_campus("C").unwrap();
    assert_eq!(store.port().writes(), 2);
    let stored: Vec<CampusRecord> =
        serde_json::from_str(store.port().raw(STORAGE_KEY_CAMPUS_LIST).unwrap()).unwrap();
    assert_eq!(stored.len(), 3);
}

#[derive(Debug, Default)]
struct ReadOnlyPort {
    inner: InMemoryKeyValue,
}

impl KeyValuePort for ReadOnlyPort {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "quota exceeded",
        )))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "quota exceeded",
        )))
    }
}

#[test]
fn at_store_db_14_write_failure_is_reported_and_memory_keeps_edit() {
    let (mut store, _) = PersistedEntityStore::load(ReadOnlyPort::default());
    let err = store.add_campus("IPGK Baru").unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));
    assert_eq!(store.campuses().len(), 29);
}

#[test]
fn at_store_db_15_file_port_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portal_storage.json");

    let (mut store, _) = PersistedEntityStore::load(FileKeyValue::for_path(&path));
    store.update_counselor_name("ipgm-1", "Dr. Aminah").unwrap();
    store
        .update_campus_counselor_slot("ELTC", SlotKey::Ketua, "Encik Lim")
        .unwrap();
    drop(store);

    let (reloaded, report) = PersistedEntityStore::load(FileKeyValue::for_path(&path));
    assert_eq!(report.counselors, FieldSource::Stored);
    assert_eq!(reloaded.counselors()[0].name, "Dr. Aminah");
    assert_eq!(reloaded.campus("ELTC").unwrap().counselors.ketua, "Encik Lim");
    assert_eq!(report.logo, FieldSource::DefaultAbsent);
}

#[test]
fn at_store_db_16_campus_write_keeps_other_keys_of_unreadable_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("portal_storage.json");
    let newer = format!(
        r#"{{"schema_version":2,"entries":{{"{STORAGE_KEY_LOGO}":"{LOGO_URI}","{STORAGE_KEY_COUNSELORS_IPGM}":"[]","extra":"keep"}}}}"#
    );
    std::fs::write(&path, &newer).unwrap();

    let (mut store, report) = PersistedEntityStore::load(FileKeyValue::for_path(&path));
    assert_eq!(report.logo, FieldSource::DefaultCorrupt);
    assert!(matches!(
        store.add_campus("X"),
        Err(StorageError::SchemaVersion(2))
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), newer);
}
