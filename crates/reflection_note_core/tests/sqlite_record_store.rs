use reflection_note_core::db::migrations::latest_version;
use reflection_note_core::db::DbError;
use reflection_note_core::{
    BootstrapSeeder, ClassRepository, RecordStore, SqliteRecordStore, StorageKey, StoreError,
    UserRepository,
};
use rusqlite::Connection;

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn open_in_memory_applies_migrations() {
    let store = SqliteRecordStore::open_in_memory().unwrap();

    assert_eq!(schema_version(store.connection()), latest_version());
    assert_eq!(store.get(StorageKey::Users).unwrap(), None);
}

#[test]
fn set_get_remove_roundtrip_per_key() {
    let store = SqliteRecordStore::open_in_memory().unwrap();

    store.set(StorageKey::Classes, "[]").unwrap();
    store.set(StorageKey::Classes, "[1]").unwrap();
    store.set(StorageKey::Users, "[2]").unwrap();
    assert_eq!(store.get(StorageKey::Classes).unwrap().as_deref(), Some("[1]"));

    store.remove(StorageKey::Classes).unwrap();
    assert_eq!(store.get(StorageKey::Classes).unwrap(), None);
    assert_eq!(store.get(StorageKey::Users).unwrap().as_deref(), Some("[2]"));
}

#[test]
fn snapshots_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");

    {
        let store = SqliteRecordStore::open(&path).unwrap();
        BootstrapSeeder::new(&store).init().unwrap();
        let class = ClassRepository::new(&store)
            .list_classes()
            .unwrap()
            .remove(0);
        ClassRepository::new(&store).delete_class(&class.id).unwrap();
    }

    let reopened = SqliteRecordStore::open(&path).unwrap();
    assert!(!BootstrapSeeder::new(&reopened).init().unwrap());
    assert!(ClassRepository::new(&reopened)
        .list_classes()
        .unwrap()
        .is_empty());
    let users = UserRepository::new(&reopened).list_users().unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.class_id.is_none()));
}

#[test]
fn set_many_is_atomic() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    store.set(StorageKey::Users, "before").unwrap();
    store
        .connection()
        .execute_batch(
            "CREATE TRIGGER reject_classes BEFORE INSERT ON records
             WHEN NEW.key = 'reflection_note_classes_v2'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

    let result = store.set_many(&[
        (StorageKey::Users, "after".to_string()),
        (StorageKey::Classes, "[]".to_string()),
    ]);

    assert!(matches!(result, Err(StoreError::Db(DbError::Sqlite(_)))));
    assert_eq!(store.get(StorageKey::Users).unwrap().as_deref(), Some("before"));
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = SqliteRecordStore::open(&path).err().unwrap();
    assert!(err.to_string().contains("schema v999"));
    match err {
        StoreError::Db(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn remove_many_is_atomic() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    store.set(StorageKey::CurrentUser, "user").unwrap();
    store.set(StorageKey::LastActivity, "1000").unwrap();
    store
        .connection()
        .execute_batch(
            "CREATE TRIGGER keep_activity BEFORE DELETE ON records
             WHEN OLD.key = 'reflection_note_last_activity'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

    let result = store.remove_many(&[StorageKey::CurrentUser, StorageKey::LastActivity]);

    assert!(matches!(result, Err(StoreError::Db(DbError::Sqlite(_)))));
    assert_eq!(store.get(StorageKey::CurrentUser).unwrap().as_deref(), Some("user"));
    assert_eq!(store.get(StorageKey::LastActivity).unwrap().as_deref(), Some("1000"));
}
