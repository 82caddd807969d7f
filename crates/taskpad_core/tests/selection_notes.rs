use chrono::{Duration, TimeZone, Utc};
use taskpad_core::{
    MemoryTaskStore, NewTask, SelectionState, SequentialIdGenerator, SortDirection, SortKey,
    SortSpec, SteppingClock, TaskFilter, TaskId, TaskRepository, TaskService, TaskServiceError,
    TaskValidationError,
};

fn open_service() -> TaskService<MemoryTaskStore> {
    let repo = TaskRepository::open(
        MemoryTaskStore::new(),
        Box::new(SteppingClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            Duration::seconds(1),
        )),
        Box::new(SequentialIdGenerator::new("task")),
    )
    .unwrap();
    TaskService::new(repo)
}

fn selected(service: &TaskService<MemoryTaskStore>) -> Option<TaskId> {
    match service.selection() {
        SelectionState::Selected(id) => Some(id.clone()),
        SelectionState::Empty => None,
    }
}

#[test]
fn deleting_selected_task_clears_selection() {
    let mut service = open_service();
    let id = service.create_task(NewTask::new("selected")).unwrap();
    service.select_task(&id).unwrap();

    assert!(service.delete_task(&id).unwrap());

    assert_eq!(service.selection(), &SelectionState::Empty);
    assert!(!service.note_panel().enabled);
}

#[test]
fn deleting_other_task_keeps_selection() {
    let mut service = open_service();
    let keep = service.create_task(NewTask::new("keep")).unwrap();
    let drop = service.create_task(NewTask::new("drop")).unwrap();
    service.select_task(&keep).unwrap();

    service.delete_task(&drop).unwrap();

    assert_eq!(selected(&service), Some(keep));
}

#[test]
fn changing_filter_clears_selection_but_sort_does_not() {
    let mut service = open_service();
    let id = service.create_task(NewTask::new("a")).unwrap();
    service.select_task(&id).unwrap();

    service.set_sort(SortSpec::new(SortKey::Priority, SortDirection::Asc));
    assert_eq!(selected(&service), Some(id.clone()));

    service.set_filter(TaskFilter::Active);
    assert_eq!(service.selection(), &SelectionState::Empty);
    assert_eq!(service.view_state().filter, TaskFilter::Active);
}

#[test]
fn selecting_unknown_id_fails_and_keeps_previous_selection() {
    let mut service = open_service();
    let id = service.create_task(NewTask::new("a")).unwrap();
    service.select_task(&id).unwrap();

    let err = service.select_task(&TaskId::new("missing")).unwrap_err();

    assert!(matches!(err, TaskServiceError::TaskNotFound(missing) if missing.as_str() == "missing"));
    assert_eq!(selected(&service), Some(id));
}

#[test]
fn completing_selected_task_under_active_view_keeps_selection() {
    let mut service = open_service();
    service.set_filter(TaskFilter::Active);
    let id = service.create_task(NewTask::new("finish me")).unwrap();
    service.select_task(&id).unwrap();

    assert!(service.toggle_task(&id).unwrap());

    assert!(service.visible_tasks().is_empty());
    assert_eq!(selected(&service), Some(id));
    assert!(service.note_panel().enabled);
}

#[test]
fn note_panel_tracks_selection() {
    let mut service = open_service();
    let id = service.create_task(NewTask::new("Write report")).unwrap();

    let panel = service.note_panel();
    assert!(!panel.enabled);
    assert_eq!(panel.text(), "");

    service.select_task(&id).unwrap();
    let panel = service.note_panel();
    assert!(panel.enabled);
    assert_eq!(panel.task_id, Some(id));
    assert_eq!(panel.task_title.as_deref(), Some("Write report"));

    service.clear_selection();
    assert!(!service.note_panel().enabled);
}

#[test]
fn every_note_edit_is_written_through() {
    let mut service = open_service();
    let id = service.create_task(NewTask::new("typing")).unwrap();
    service.select_task(&id).unwrap();
    let saves_before = service.repository().store().save_count();

    for text in ["h", "he", "hel", "hell", "hello"] {
        assert!(service.edit_note(text).unwrap());
    }

    assert_eq!(service.repository().store().save_count(), saves_before + 5);
    assert_eq!(service.note_panel().text(), "hello");
    assert_eq!(service.repository().get(&id).unwrap().note, "hello");
}

#[test]
fn note_text_is_stored_verbatim() {
    let mut service = open_service();
    let id = service.create_task(NewTask::new("spacing")).unwrap();
    service.select_task(&id).unwrap();

    service.edit_note("  line one\n\nline three  ").unwrap();

    assert_eq!(
        service.repository().get(&id).unwrap().note,
        "  line one\n\nline three  "
    );
}

#[test]
fn note_edit_without_selection_is_ignored() {
    let mut service = open_service();
    service.create_task(NewTask::new("a")).unwrap();
    let saves_before = service.repository().store().save_count();

    assert!(!service.edit_note("lost").unwrap());

    assert_eq!(service.repository().store().save_count(), saves_before);
    assert!(service.tasks().iter().all(|task| task.note.is_empty()));
}

#[test]
fn service_delete_is_idempotent() {
    let mut service = open_service();
    let id = service.create_task(NewTask::new("once")).unwrap();

    assert!(service.delete_task(&id).unwrap());
    assert!(!service.delete_task(&id).unwrap());
    assert!(service.tasks().is_empty());
}

#[test]
fn service_maps_validation_and_missing_ids() {
    let mut service = open_service();

    let err = service.create_task(NewTask::new("")).unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Validation(TaskValidationError::EmptyTitle)
    ));

    let err = service.toggle_task(&TaskId::new("ghost")).unwrap_err();
    assert!(matches!(err, TaskServiceError::TaskNotFound(_)));
}

#[test]
fn failed_write_leaves_service_state_untouched() {
    let mut service = open_service();
    let id = service.create_task(NewTask::new("stable")).unwrap();
    service.select_task(&id).unwrap();
    service.repository().store().set_fail_writes(true);

    assert!(matches!(
        service.edit_note("unsaved"),
        Err(TaskServiceError::Repo(_))
    ));
    assert!(service.delete_task(&id).is_err());

    assert_eq!(service.tasks().len(), 1);
    assert_eq!(service.note_panel().text(), "");
    assert_eq!(selected(&service), Some(id));
}

#[test]
fn reload_drops_selection_of_task_removed_by_another_writer() {
    let store = MemoryTaskStore::new();
    let clock = || {
        Box::new(SteppingClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            Duration::seconds(1),
        ))
    };
    let mut service = TaskService::new(
        TaskRepository::open(
            store.clone(),
            clock(),
            Box::new(SequentialIdGenerator::new("task")),
        )
        .unwrap(),
    );
    let gone = service.create_task(NewTask::new("gone")).unwrap();
    let kept = service.create_task(NewTask::new("kept")).unwrap();
    service.select_task(&gone).unwrap();

    let mut other = TaskRepository::open(
        store.clone(),
        clock(),
        Box::new(SequentialIdGenerator::new("other")),
    )
    .unwrap();
    other.delete(&gone).unwrap();

    assert_eq!(service.reload().unwrap(), 1);
    assert_eq!(service.selection(), &SelectionState::Empty);
    assert!(!service.note_panel().enabled);

    service.select_task(&kept).unwrap();
    assert_eq!(service.reload().unwrap(), 1);
    assert_eq!(selected(&service), Some(kept));
}
