use reflection_note_core::{
    AccountStatus, BulkUpsertReport, MemoryRecordStore, RepoError, SequenceIdGenerator,
    StudentDraft, StudentImport, User, UserRepository, UserRole, DEFAULT_PASSWORD_HASH,
};
use std::collections::HashSet;

fn draft(class_id: &str, student_id: &str, name: &str) -> StudentDraft {
    StudentDraft {
        name: Some(name.to_string()),
        student_id: Some(student_id.to_string()),
        class_id: Some(Some(class_id.to_string())),
        ..StudentDraft::default()
    }
}

fn import(class_id: &str, student_id: &str, name: &str) -> StudentImport {
    StudentImport {
        name: name.to_string(),
        student_id: student_id.to_string(),
        class_id: class_id.to_string(),
    }
}

fn assert_active_slots_unique(users: &[User]) {
    let mut seen = HashSet::new();
    for user in users
        .iter()
        .filter(|u| u.role == UserRole::Student && u.is_active())
    {
        assert!(
            seen.insert((user.class_id.clone(), user.student_id.clone())),
            "duplicate active slot for {:?}",
            user.student_id
        );
    }
}

#[test]
fn insert_creates_student_with_defaults() {
    let store = MemoryRecordStore::new();
    let ids = SequenceIdGenerator::new("s");
    let repo = UserRepository::with_id_generator(&store, &ids);

    let id = repo.upsert_student(draft("class-1", "10301", "Kim")).unwrap();

    let student = repo.find_user(&id).unwrap().unwrap();
    assert_eq!(id, "s-1");
    assert_eq!(student.role, UserRole::Student);
    assert_eq!(student.name, "Kim");
    assert_eq!(student.student_id.as_deref(), Some("10301"));
    assert_eq!(student.class_id.as_deref(), Some("class-1"));
    assert_eq!(student.login_id, "");
    assert_eq!(student.password_hash, DEFAULT_PASSWORD_HASH);
    assert_eq!(student.status, AccountStatus::PendingFirstLogin);
}

#[test]
fn insert_rejects_duplicate_active_student_and_leaves_roster_unchanged() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    repo.upsert_student(draft("class-1", "10301", "First")).unwrap();
    let before = repo.list_users().unwrap();

    let err = repo
        .upsert_student(draft("class-1", "10301", "X"))
        .unwrap_err();

    assert!(matches!(err, RepoError::DuplicateStudentId(ref id) if id == "10301"));
    assert!(err.to_string().contains("10301"));
    assert_eq!(repo.list_users().unwrap(), before);
}

#[test]
fn insert_allows_same_number_in_other_class_or_after_deactivation() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    let first = repo.upsert_student(draft("class-1", "10301", "First")).unwrap();

    repo.upsert_student(draft("class-2", "10301", "Other class"))
        .unwrap();
    repo.deactivate_user(&first).unwrap();
    repo.upsert_student(draft("class-1", "10301", "Replacement"))
        .unwrap();

    let users = repo.list_users().unwrap();
    assert_eq!(users.len(), 3);
    assert_active_slots_unique(&users);
}

#[test]
fn insert_ignores_teachers_with_matching_fields() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    let teacher = repo.add_teacher("T", "10301", "h").unwrap();
    assert_eq!(teacher.class_id, None);

    repo.upsert_student(StudentDraft {
        student_id: Some("10301".to_string()),
        ..StudentDraft::default()
    })
    .unwrap();

    assert_eq!(repo.list_users().unwrap().len(), 2);
}

#[test]
fn update_merges_supplied_fields_only() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    let id = repo.upsert_student(draft("class-1", "10301", "Before")).unwrap();
    repo.complete_first_login(&id, "own-hash").unwrap();
    let original = repo.find_user(&id).unwrap().unwrap();

    let returned = repo
        .upsert_student(StudentDraft {
            id: Some(id.clone()),
            name: Some("After".to_string()),
            ..StudentDraft::default()
        })
        .unwrap();

    assert_eq!(returned, id);
    let updated = repo.find_user(&id).unwrap().unwrap();
    assert_eq!(
        updated,
        User {
            name: "After".to_string(),
            ..original
        }
    );
}

#[test]
fn update_does_not_recheck_slot_uniqueness() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    repo.upsert_student(draft("class-1", "10301", "Holder")).unwrap();
    let mover = repo.upsert_student(draft("class-2", "10301", "Mover")).unwrap();

    repo.upsert_student(StudentDraft {
        id: Some(mover.clone()),
        class_id: Some(Some("class-1".to_string())),
        ..StudentDraft::default()
    })
    .unwrap();

    let moved = repo.find_user(&mover).unwrap().unwrap();
    assert_eq!(moved.class_id.as_deref(), Some("class-1"));
}

#[test]
fn update_with_unknown_id_is_noop() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    repo.upsert_student(draft("class-1", "10301", "Holder")).unwrap();
    let before = repo.list_users().unwrap();

    repo.upsert_student(StudentDraft {
        id: Some("missing".to_string()),
        name: Some("Ghost".to_string()),
        ..StudentDraft::default()
    })
    .unwrap();

    assert_eq!(repo.list_users().unwrap(), before);
}

#[test]
fn bulk_upsert_admits_new_and_reports_duplicates() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    repo.upsert_student(draft("class-1", "10301", "Existing")).unwrap();

    let report = repo
        .bulk_upsert_students(&[
            import("class-1", "10301", "Dup"),
            import("class-1", "10302", "New"),
        ])
        .unwrap();

    assert_eq!(
        report,
        BulkUpsertReport {
            count: 1,
            duplicates: vec!["10301".to_string()],
        }
    );
    let users = repo.list_users().unwrap();
    assert_eq!(users.len(), 2);
    let added = users
        .iter()
        .find(|u| u.student_id.as_deref() == Some("10302"))
        .unwrap();
    assert_eq!(added.name, "New");
    assert_eq!(added.status, AccountStatus::PendingFirstLogin);
    assert_eq!(added.password_hash, DEFAULT_PASSWORD_HASH);
}

#[test]
fn bulk_upsert_reports_duplicates_in_input_order() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    for number in ["3", "1", "2"] {
        repo.upsert_student(draft("c", number, "Existing")).unwrap();
    }

    let report = repo
        .bulk_upsert_students(&[
            import("c", "2", "a"),
            import("c", "9", "b"),
            import("c", "3", "c"),
            import("c", "1", "d"),
        ])
        .unwrap();

    assert_eq!(report.count, 1);
    assert_eq!(report.duplicates, vec!["2", "3", "1"]);
}

#[test]
fn bulk_upsert_checks_only_the_pre_existing_roster() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);

    let report = repo
        .bulk_upsert_students(&[import("c", "7", "a"), import("c", "7", "b")])
        .unwrap();

    assert_eq!(report.count, 2);
    assert!(report.duplicates.is_empty());
    assert_eq!(repo.list_users().unwrap().len(), 2);
}

#[test]
fn bulk_upsert_with_empty_input_keeps_roster() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    repo.upsert_student(draft("c", "1", "Existing")).unwrap();

    let report = repo.bulk_upsert_students(&[]).unwrap();

    assert_eq!(report, BulkUpsertReport::default());
    assert_eq!(repo.list_users().unwrap().len(), 1);
}

#[test]
fn update_can_unassign_class_and_keep_other_fields() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    let id = repo.upsert_student(draft("class-1", "10301", "Kim")).unwrap();
    let original = repo.find_user(&id).unwrap().unwrap();

    repo.upsert_student(StudentDraft {
        id: Some(id.clone()),
        class_id: Some(None),
        ..StudentDraft::default()
    })
    .unwrap();

    let updated = repo.find_user(&id).unwrap().unwrap();
    assert_eq!(
        updated,
        User {
            class_id: None,
            ..original
        }
    );
}

#[test]
fn update_without_class_field_keeps_class() {
    let store = MemoryRecordStore::new();
    let repo = UserRepository::new(&store);
    let id = repo.upsert_student(draft("class-1", "10301", "Kim")).unwrap();

    repo.upsert_student(StudentDraft {
        id: Some(id.clone()),
        student_id: Some("10305".to_string()),
        ..StudentDraft::default()
    })
    .unwrap();

    let updated = repo.find_user(&id).unwrap().unwrap();
    assert_eq!(updated.class_id.as_deref(), Some("class-1"));
    assert_eq!(updated.student_id.as_deref(), Some("10305"));
}
