use chrono::{TimeZone, Utc};
use paradise_core::{
    FixedClock, Identity, IdentityError, IdentityStore, KeyValueStore, MemoryKeyValueStore,
    Session, StorageKeys,
};

#[test]
fn register_establishes_and_persists_session() {
    let storage = MemoryKeyValueStore::new();
    let mut store = new_store(&storage);

    let session = store.register("alice", "pw123456", "Alice").unwrap();
    assert_eq!(session, alice_session());
    assert_eq!(store.session(), Some(&alice_session()));

    let identities: Vec<Identity> = read(&storage, "identity_list");
    assert_eq!(identities.len(), 1);
    assert_eq!(identities[0].username, "alice");
    assert_eq!(identities[0].password, "pw123456");
    assert_eq!(identities[0].created_at, start());

    let marker: Session = read(&storage, "current_session");
    assert_eq!(marker, alice_session());
}

#[test]
fn duplicate_registration_fails_and_leaves_session_unchanged() {
    let storage = MemoryKeyValueStore::new();
    let mut store = new_store(&storage);
    store.register("alice", "pw123456", "Alice").unwrap();

    let err = store.register("alice", "other-pw", "Impostor").unwrap_err();
    assert!(matches!(err, IdentityError::DuplicateUsername(ref name) if name == "alice"));
    assert_eq!(store.session(), Some(&alice_session()));

    let identities: Vec<Identity> = read(&storage, "identity_list");
    assert_eq!(identities.len(), 1);
    assert_eq!(identities[0].display_name, "Alice");
}

#[test]
fn usernames_are_case_sensitive() {
    let storage = MemoryKeyValueStore::new();
    let mut store = new_store(&storage);
    store.register("alice", "pw123456", "Alice").unwrap();
    store.register("Alice", "pw654321", "Other Alice").unwrap();

    let identities: Vec<Identity> = read(&storage, "identity_list");
    assert_eq!(identities.len(), 2);
}

#[test]
fn login_requires_exact_credentials_without_revealing_which_failed() {
    let storage = MemoryKeyValueStore::new();
    let mut store = new_store(&storage);
    store.register("alice", "pw123456", "Alice").unwrap();
    store.logout().unwrap();

    let wrong_password = store.login("alice", "nope").unwrap_err();
    let unknown_user = store.login("mallory", "pw123456").unwrap_err();
    assert!(matches!(wrong_password, IdentityError::InvalidCredentials));
    assert!(matches!(unknown_user, IdentityError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert!(!store.is_authenticated());
    assert_eq!(storage.get("current_session").unwrap(), None);

    let session = store.login("alice", "pw123456").unwrap();
    assert_eq!(session, alice_session());
    assert!(store.is_authenticated());
}

#[test]
fn logout_is_idempotent() {
    let storage = MemoryKeyValueStore::new();
    let mut store = new_store(&storage);
    store.logout().unwrap();

    store.register("alice", "pw123456", "Alice").unwrap();
    store.logout().unwrap();
    store.logout().unwrap();

    assert_eq!(store.session(), None);
    assert_eq!(storage.get("current_session").unwrap(), None);
    assert!(storage.get("identity_list").unwrap().is_some());
}

#[test]
fn restore_session_trusts_marker_without_revalidation() {
    let storage = MemoryKeyValueStore::new();
    storage
        .set(
            "current_session",
            r#"{"username":"ghost","displayName":"Ghost"}"#,
        )
        .unwrap();

    let mut store = new_store(&storage);
    assert_eq!(store.session(), None);

    let restored = store.restore_session().unwrap().unwrap();
    assert_eq!(restored.username, "ghost");
    assert_eq!(store.session().unwrap().display_name, "Ghost");
}

#[test]
fn restore_session_without_marker_stays_signed_out() {
    let storage = MemoryKeyValueStore::new();
    let mut store = new_store(&storage);
    assert_eq!(store.restore_session().unwrap(), None);
    assert!(!store.is_authenticated());
}

#[test]
fn namespaced_keys_isolate_identity_lists() {
    let storage = MemoryKeyValueStore::new();
    let clock = FixedClock::new(start());
    let mut first =
        IdentityStore::with_options(storage.clone(), StorageKeys::new("a_"), clock.clone());
    let mut second = IdentityStore::with_options(storage.clone(), StorageKeys::new("b_"), clock);

    first.register("alice", "pw123456", "Alice").unwrap();
    second.register("alice", "pw123456", "Alice").unwrap();

    assert_eq!(
        storage.keys(),
        [
            "a_current_session",
            "a_identity_list",
            "b_current_session",
            "b_identity_list"
        ]
    );
}

fn new_store(storage: &MemoryKeyValueStore) -> IdentityStore<MemoryKeyValueStore> {
    IdentityStore::with_options(
        storage.clone(),
        StorageKeys::default(),
        FixedClock::new(start()),
    )
}

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap()
}

fn alice_session() -> Session {
    Session {
        username: "alice".to_string(),
        display_name: "Alice".to_string(),
    }
}

fn read<T: serde::de::DeserializeOwned>(storage: &MemoryKeyValueStore, key: &str) -> T {
    serde_json::from_str(&storage.get(key).unwrap().unwrap()).unwrap()
}
