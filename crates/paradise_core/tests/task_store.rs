use chrono::{DateTime, Duration, TimeZone, Utc};
use paradise_core::{
    default_categories, Category, CategoryDraft, CategoryIcon, CategoryPatch, FixedClock,
    KeyValueStore, MemoryKeyValueStore, StorageKeys, Task, TaskDraft, TaskPatch, TaskStore,
    TaskStoreError,
};
use std::collections::HashSet;

#[test]
fn load_seeds_and_persists_default_categories() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, _clock) = new_store(&storage);

    store.load_for_identity("alice").unwrap();

    assert_eq!(store.scope(), Some("alice"));
    assert!(store.tasks().is_empty());
    assert_eq!(store.categories(), default_categories().as_slice());
    let persisted: Vec<Category> = read(&storage, "categories_alice");
    assert_eq!(persisted, default_categories());
    assert_eq!(storage.get("tasks_alice").unwrap(), None);
}

#[test]
fn load_keeps_stored_categories_and_replaces_state_wholesale() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, _clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();
    store.add_task(TaskDraft::new("Alice task", "1")).unwrap();

    storage
        .set(
            "categories_bob",
            r##"[{"id":"x","name":"Chores","color":"#123456","icon":"rocket"}]"##,
        )
        .unwrap();
    store.load_for_identity("bob").unwrap();

    assert!(store.tasks().is_empty());
    assert_eq!(store.categories().len(), 1);
    assert_eq!(store.categories()[0].icon, "rocket");
    assert_eq!(store.categories()[0].icon_kind(), CategoryIcon::Hash);
}

#[test]
fn add_task_generates_unique_ids_and_preserves_insertion_order() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();

    let first = store.add_task(TaskDraft::new("Buy milk", "1")).unwrap();
    assert!(!first.completed);
    assert_eq!(first.created_at, start());
    assert_eq!(first.updated_at, start());

    clock.advance(Duration::seconds(1));
    for index in 0..50 {
        store
            .add_task(TaskDraft::new(format!("task {index}"), "2"))
            .unwrap();
    }

    let ids: HashSet<&str> = store.tasks().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids.len(), 51);
    assert_eq!(store.tasks()[0].title, "Buy milk");
    assert_eq!(store.tasks()[50].title, "task 49");

    let persisted: Vec<Task> = read(&storage, "tasks_alice");
    assert_eq!(persisted, store.tasks());
}

#[test]
fn update_task_merges_fields_and_refreshes_updated_at() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();
    let task = store
        .add_task(TaskDraft::new("Buy milk", "1").with_description("oat"))
        .unwrap();

    clock.advance(Duration::minutes(10));
    let due = start() + Duration::days(2);
    let changed = store
        .update_task(
            &task.id,
            TaskPatch {
                title: Some("Buy oat milk".to_string()),
                due_date: Some(Some(due)),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert!(changed);

    let updated = store.get_task(&task.id).unwrap();
    assert_eq!(updated.title, "Buy oat milk");
    assert_eq!(updated.description, "oat");
    assert_eq!(updated.due_date, Some(due));
    assert_eq!(updated.created_at, start());
    assert_eq!(updated.updated_at, start() + Duration::minutes(10));
}

#[test]
fn missing_ids_are_silent_noops() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, _clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();
    store.add_task(TaskDraft::new("Keep me", "1")).unwrap();
    let before: Vec<Task> = store.tasks().to_vec();
    let categories_before = store.categories().to_vec();

    assert!(!store.update_task("missing", TaskPatch::default()).unwrap());
    assert!(!store.delete_task("missing").unwrap());
    assert_eq!(store.toggle_completion("missing").unwrap(), None);
    assert!(!store
        .update_category("missing", CategoryPatch::default())
        .unwrap());
    assert!(!store.delete_category("missing").unwrap());

    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(store.categories(), categories_before.as_slice());
    assert!(store.get_category("missing").is_none());
}

#[test]
fn toggle_completion_is_an_involution_apart_from_updated_at() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();
    let original = store
        .add_task(TaskDraft::new("Stretch", "3").with_due_date(start() + Duration::hours(3)))
        .unwrap();

    clock.advance(Duration::minutes(1));
    assert_eq!(store.toggle_completion(&original.id).unwrap(), Some(true));
    clock.advance(Duration::minutes(1));
    assert_eq!(store.toggle_completion(&original.id).unwrap(), Some(false));

    let after = store.get_task(&original.id).unwrap().clone();
    assert_eq!(after.updated_at, start() + Duration::minutes(2));
    assert_eq!(
        Task {
            updated_at: original.updated_at,
            ..after
        },
        original
    );
}

#[test]
fn delete_task_removes_permanently() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, _clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();
    let doomed = store.add_task(TaskDraft::new("Doomed", "1")).unwrap();
    let kept = store.add_task(TaskDraft::new("Kept", "1")).unwrap();

    assert!(store.delete_task(&doomed.id).unwrap());

    let persisted: Vec<Task> = read(&storage, "tasks_alice");
    assert_eq!(persisted, vec![kept]);
}

#[test]
fn category_crud_persists_whole_collection() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, _clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();

    let added = store
        .add_category(CategoryDraft::new("Work", "#222222", CategoryIcon::Briefcase))
        .unwrap();
    assert!(store
        .update_category(
            &added.id,
            CategoryPatch {
                color: Some("#333333".to_string()),
                ..CategoryPatch::default()
            },
        )
        .unwrap());

    let persisted: Vec<Category> = read(&storage, "categories_alice");
    assert_eq!(persisted.len(), 5);
    assert_eq!(persisted[4].name, "Work");
    assert_eq!(persisted[4].color, "#333333");
    assert_eq!(store.get_category(&added.id), Some(&persisted[4]));

    assert!(store.delete_category(&added.id).unwrap());
    let persisted: Vec<Category> = read(&storage, "categories_alice");
    assert_eq!(persisted, default_categories());
}

#[test]
fn delete_category_in_use_fails_without_mutation() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, _clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();
    store.add_task(TaskDraft::new("Groceries", "1")).unwrap();
    store.add_task(TaskDraft::new("More groceries", "1")).unwrap();
    let before = storage.get("categories_alice").unwrap();

    let err = store.delete_category("1").unwrap_err();
    match err {
        TaskStoreError::CategoryInUse {
            category_id,
            task_count,
        } => {
            assert_eq!(category_id, "1");
            assert_eq!(task_count, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.categories(), default_categories().as_slice());
    assert_eq!(storage.get("categories_alice").unwrap(), before);

    assert!(store.delete_category("2").unwrap());
    assert_eq!(store.categories().len(), 3);
}

#[test]
fn reload_reproduces_last_persisted_collections() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();

    let a = store.add_task(TaskDraft::new("a", "1")).unwrap();
    let b = store.add_task(TaskDraft::new("b", "2")).unwrap();
    store.add_task(TaskDraft::new("c", "3")).unwrap();
    clock.advance(Duration::hours(1));
    store.toggle_completion(&b.id).unwrap();
    store.delete_task(&a.id).unwrap();
    store
        .add_category(CategoryDraft::new("Later", "#abcdef", CategoryIcon::Clock))
        .unwrap();

    let expected_tasks = store.tasks().to_vec();
    let expected_categories = store.categories().to_vec();

    let (mut reloaded, _clock) = new_store(&storage);
    reloaded.load_for_identity("alice").unwrap();
    assert_eq!(reloaded.tasks(), expected_tasks.as_slice());
    assert_eq!(reloaded.categories(), expected_categories.as_slice());
}

#[test]
fn reset_drops_scope_without_writing() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, _clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();
    store.add_task(TaskDraft::new("a", "1")).unwrap();
    let keys_before = storage.keys();

    store.reset();
    assert_eq!(store.scope(), None);
    assert!(store.tasks().is_empty());
    assert_eq!(store.categories(), default_categories().as_slice());

    store.add_task(TaskDraft::new("unscoped", "1")).unwrap();
    assert_eq!(storage.keys(), keys_before);
    let persisted: Vec<Task> = read(&storage, "tasks_alice");
    assert_eq!(persisted.len(), 1);
}

#[test]
fn corrupt_persisted_tasks_fail_load_and_keep_previous_state() {
    let storage = MemoryKeyValueStore::new();
    let (mut store, _clock) = new_store(&storage);
    store.load_for_identity("alice").unwrap();
    store.add_task(TaskDraft::new("safe", "1")).unwrap();

    storage.set("tasks_bob", "[{\"id\":").unwrap();
    assert!(store.load_for_identity("bob").is_err());
    assert_eq!(store.scope(), Some("alice"));
    assert_eq!(store.tasks().len(), 1);
}

fn new_store(storage: &MemoryKeyValueStore) -> (TaskStore<MemoryKeyValueStore>, FixedClock) {
    let clock = FixedClock::new(start());
    let store = TaskStore::with_options(storage.clone(), StorageKeys::default(), clock.clone());
    (store, clock)
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap()
}

fn read<T: serde::de::DeserializeOwned>(storage: &MemoryKeyValueStore, key: &str) -> T {
    serde_json::from_str(&storage.get(key).unwrap().unwrap()).unwrap()
}
