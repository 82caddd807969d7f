use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::HashSet;
use std::rc::Rc;
use taskpad_core::{
    IdGenerator, MemoryTaskStore, NewTask, Priority, RepoError, SequentialIdGenerator,
    SteppingClock, TaskId, TaskPatch, TaskRepository, TaskStore, TaskValidationError,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn open_repo() -> TaskRepository<MemoryTaskStore> {
    TaskRepository::open(
        MemoryTaskStore::new(),
        Box::new(SteppingClock::new(start(), Duration::seconds(1))),
        Box::new(SequentialIdGenerator::new("task")),
    )
    .unwrap()
}

fn high(title: &str) -> NewTask {
    NewTask {
        priority: Priority::High,
        ..NewTask::new(title)
    }
}

#[test]
fn create_sets_defaults_and_persists() {
    let mut repo = open_repo();

    let id = repo.create(high("Buy milk")).unwrap();

    let task = repo.get(&id).unwrap();
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.priority, Priority::High);
    assert!(!task.completed);
    assert_eq!(task.note, "");
    assert_eq!(task.created_at, task.modified_at);
    assert_eq!(repo.store().save_count(), 1);
    assert_eq!(repo.store().load_all().unwrap(), repo.list());
}

#[test]
fn create_with_empty_title_fails_and_does_not_append() {
    let mut repo = open_repo();
    repo.create(high("Buy milk")).unwrap();

    let err = repo.create(NewTask::new("   ")).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(TaskValidationError::EmptyTitle)
    ));
    assert_eq!(repo.len(), 1);
    assert_eq!(repo.store().save_count(), 1);
}

#[test]
fn created_ids_are_unique_and_insertion_ordered() {
    let mut repo = open_repo();
    let ids: Vec<TaskId> = (0..5)
        .map(|idx| repo.create(NewTask::new(format!("t{idx}"))).unwrap())
        .collect();

    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    let listed: Vec<_> = repo.list().iter().map(|task| task.id.clone()).collect();
    assert_eq!(listed, ids);
}

#[test]
fn duplicate_generated_id_is_rejected() {
    struct FixedId;
    impl IdGenerator for FixedId {
        fn next_id(&self) -> TaskId {
            TaskId::new("same")
        }
    }

    let mut repo = TaskRepository::open(
        MemoryTaskStore::new(),
        Box::new(SteppingClock::new(start(), Duration::seconds(1))),
        Box::new(FixedId),
    )
    .unwrap();
    repo.create(NewTask::new("first")).unwrap();

    let err = repo.create(NewTask::new("second")).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert_eq!(repo.len(), 1);
}

#[test]
fn update_applies_patch_and_bumps_modified_at() {
    let mut repo = open_repo();
    let id = repo.create(NewTask::new("draft")).unwrap();
    let created_at = repo.get(&id).unwrap().created_at;

    let patch = TaskPatch {
        title: Some("  final  ".to_string()),
        assignee: Some("Ann".to_string()),
        deadline: Some(NaiveDate::from_ymd_opt(2024, 3, 15)),
        ..TaskPatch::default()
    };
    repo.update(&id, &patch).unwrap();

    let task = repo.get(&id).unwrap();
    assert_eq!(task.title, "final");
    assert_eq!(task.assignee, "Ann");
    assert_eq!(task.deadline, NaiveDate::from_ymd_opt(2024, 3, 15));
    assert_eq!(task.created_at, created_at);
    assert!(task.modified_at > created_at);
}

#[test]
fn update_to_empty_title_fails_without_change() {
    let mut repo = open_repo();
    let id = repo.create(NewTask::new("keep me")).unwrap();
    let before = repo.get(&id).unwrap().clone();

    let patch = TaskPatch {
        title: Some(String::new()),
        ..TaskPatch::default()
    };
    let err = repo.update(&id, &patch).unwrap_err();

    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.get(&id).unwrap(), &before);
}

#[test]
fn update_toggle_and_note_on_missing_id_return_not_found() {
    let mut repo = open_repo();
    let missing = TaskId::new("missing");

    let update_err = repo.update(&missing, &TaskPatch::default()).unwrap_err();
    assert!(matches!(update_err, RepoError::NotFound(ref id) if id == &missing));
    assert!(matches!(
        repo.toggle_completed(&missing),
        Err(RepoError::NotFound(_))
    ));
    assert!(matches!(
        repo.set_note(&missing, "text"),
        Err(RepoError::NotFound(_))
    ));
}

#[test]
fn toggle_flips_completed_both_ways() {
    let mut repo = open_repo();
    let id = repo.create(NewTask::new("chore")).unwrap();

    assert!(repo.toggle_completed(&id).unwrap());
    assert!(repo.get(&id).unwrap().completed);
    assert!(!repo.toggle_completed(&id).unwrap());
    assert!(!repo.get(&id).unwrap().completed);
}

#[test]
fn delete_is_idempotent() {
    let mut repo = open_repo();
    let id = repo.create(NewTask::new("temp")).unwrap();
    repo.create(NewTask::new("stay")).unwrap();

    assert!(repo.delete(&id).unwrap());
    assert_eq!(repo.len(), 1);
    let saves = repo.store().save_count();

    assert!(!repo.delete(&id).unwrap());
    assert_eq!(repo.len(), 1);
    assert!(repo.get(&id).is_none());
    assert_eq!(repo.store().save_count(), saves);
}

#[test]
fn set_note_stores_text_verbatim() {
    let mut repo = open_repo();
    let id = repo.create(NewTask::new("with note")).unwrap();

    repo.set_note(&id, "  line one\nline two  ").unwrap();

    assert_eq!(repo.get(&id).unwrap().note, "  line one\nline two  ");
}

#[test]
fn failed_write_leaves_collection_unchanged() {
    let mut repo = open_repo();
    let id = repo.create(NewTask::new("stable")).unwrap();
    let snapshot = repo.list().to_vec();

    repo.store().set_fail_writes(true);
    assert!(matches!(
        repo.create(NewTask::new("lost")),
        Err(RepoError::Store(_))
    ));
    assert!(matches!(repo.toggle_completed(&id), Err(RepoError::Store(_))));
    assert!(matches!(repo.delete(&id), Err(RepoError::Store(_))));
    assert!(matches!(repo.set_note(&id, "x"), Err(RepoError::Store(_))));
    assert_eq!(repo.list(), snapshot.as_slice());

    repo.store().set_fail_writes(false);
    assert!(repo.toggle_completed(&id).unwrap());
}

#[test]
fn modified_at_never_moves_backwards() {
    let clock = Rc::new(SteppingClock::new(start(), Duration::seconds(1)));
    let mut repo = TaskRepository::open(
        MemoryTaskStore::new(),
        Box::new(Rc::clone(&clock)),
        Box::new(SequentialIdGenerator::new("task")),
    )
    .unwrap();
    let id = repo.create(NewTask::new("clock skew")).unwrap();
    repo.toggle_completed(&id).unwrap();
    let before = repo.get(&id).unwrap().modified_at;

    clock.set(start() - Duration::days(1));
    repo.set_note(&id, "later edit").unwrap();

    let task = repo.get(&id).unwrap();
    assert_eq!(task.modified_at, before);
    assert!(task.modified_at >= task.created_at);
}

#[test]
fn open_loads_existing_blob_and_skips_duplicates() {
    let blob = r#"[
        {"id":"a","title":"first","createdAt":"2024-03-01T09:00:00Z","modifiedAt":"2024-03-01T09:00:00Z"},
        {"id":"a","title":"copy","createdAt":"2024-03-01T09:00:00Z","modifiedAt":"2024-03-01T09:00:00Z"},
        {"id":"b","title":"second","createdAt":"2024-03-01T09:00:00Z","modifiedAt":"2024-03-01T09:00:00Z"}
    ]"#;
    let repo = TaskRepository::open(
        MemoryTaskStore::with_blob(blob),
        Box::new(SteppingClock::new(start(), Duration::seconds(1))),
        Box::new(SequentialIdGenerator::new("task")),
    )
    .unwrap();

    let titles: Vec<_> = repo.list().iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second"]);
}

#[test]
fn open_with_invalid_blob_starts_empty() {
    let repo = TaskRepository::open(
        MemoryTaskStore::with_blob("{not json"),
        Box::new(SteppingClock::new(start(), Duration::seconds(1))),
        Box::new(SequentialIdGenerator::new("task")),
    )
    .unwrap();

    assert!(repo.is_empty());
}

#[test]
fn bad_record_is_skipped_and_siblings_survive_next_save() {
    let blob = r#"[
        {"id":"a","title":"keep me","deadline":"2024-03-15",
         "createdAt":"2024-03-01T09:00:00Z","modifiedAt":"2024-03-01T09:00:00Z"},
        {"id":"b","title":"bad date","deadline":"15.03.2024",
         "createdAt":"2024-03-01T09:00:00Z","modifiedAt":"2024-03-01T09:00:00Z"},
        {"id":"c","createdAt":"2024-03-01T09:00:00Z","modifiedAt":"2024-03-01T09:00:00Z"},
        {"id":"d","title":"bad stamp","createdAt":"yesterday","modifiedAt":"2024-03-01T09:00:00Z"}
    ]"#;
    let store = MemoryTaskStore::with_blob(blob);
    let mut repo = TaskRepository::open(
        store.clone(),
        Box::new(SteppingClock::new(start(), Duration::seconds(1))),
        Box::new(SequentialIdGenerator::new("task")),
    )
    .unwrap();
    assert_eq!(repo.len(), 1);

    repo.create(NewTask::new("new")).unwrap();

    let stored = store.load_all().unwrap();
    let titles: Vec<_> = stored.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["keep me", "new"]);
    assert_eq!(stored[0].deadline, NaiveDate::from_ymd_opt(2024, 3, 15));
}

#[test]
fn reload_picks_up_changes_from_another_writer() {
    let store = MemoryTaskStore::new();
    let mut repo = TaskRepository::open(
        store.clone(),
        Box::new(SteppingClock::new(start(), Duration::seconds(1))),
        Box::new(SequentialIdGenerator::new("task")),
    )
    .unwrap();
    repo.create(NewTask::new("mine")).unwrap();

    let mut other = TaskRepository::open(
        store.clone(),
        Box::new(SteppingClock::new(start(), Duration::seconds(1))),
        Box::new(SequentialIdGenerator::new("other")),
    )
    .unwrap();
    other.create(NewTask::new("theirs")).unwrap();

    assert_eq!(repo.len(), 1);
    assert_eq!(repo.reload().unwrap(), 2);
    assert!(repo.contains(&TaskId::new("other-1")));
}
