use std::sync::Arc;
use tokio::sync::Mutex;

use pantry::constants::{KEY_FIREBASE_UID, KEY_IS_FIREBASE_USER, KEY_USER_ID, KEY_USER_NAME};
use pantry::session::{
    is_fallback_id, CloudUser, DbSettingsStore, MemorySettingsStore, NoIdentityProvider, SessionService,
    SettingsStore, StaticIdentityProvider,
};
use pantry::storage::LocalStorage;

fn local_session() -> (SessionService, Arc<MemorySettingsStore>) {
    let settings = Arc::new(MemorySettingsStore::new());
    (SessionService::new(settings.clone(), Arc::new(NoIdentityProvider)), settings)
}

fn cloud_user() -> CloudUser {
    CloudUser {
        uid: "cloud-uid-42".to_string(),
        display_name: Some("Ada".to_string()),
        email: Some("ada@example.com".to_string()),
    }
}

#[tokio::test]
async fn test_fallback_id_is_generated_and_persisted() {
    let (session, settings) = local_session();

    let user_id = session.resolve_user_id().await.unwrap();
    assert!(is_fallback_id(&user_id));
    let parts: Vec<&str> = user_id.splitn(3, '_').collect();
    assert_eq!(parts[0], "local");
    assert!(parts[1].parse::<i64>().is_ok());
    assert_eq!(parts[2].len(), 8);

    assert_eq!(settings.get(KEY_USER_ID).await.unwrap(), Some(user_id.clone()));
    assert_eq!(session.user_name().await.unwrap(), "User");
    assert!(!session.is_cloud_user().await.unwrap());

    // Subsequent resolutions return the same id
    assert_eq!(session.resolve_user_id().await.unwrap(), user_id);
}

#[tokio::test]
async fn test_concurrent_resolution_yields_one_id() {
    let (session, _) = local_session();
    let (a, b) = tokio::join!(session.resolve_user_id(), session.resolve_user_id());
    assert_eq!(a.unwrap(), b.unwrap());
}

#[tokio::test]
async fn test_cloud_session_is_adopted() {
    let settings = Arc::new(MemorySettingsStore::new());
    let session = SessionService::new(settings.clone(), Arc::new(StaticIdentityProvider::new(Some(cloud_user()))));

    assert_eq!(session.resolve_user_id().await.unwrap(), "cloud-uid-42");
    assert_eq!(settings.get(KEY_FIREBASE_UID).await.unwrap().as_deref(), Some("cloud-uid-42"));
    assert_eq!(settings.get_bool(KEY_IS_FIREBASE_USER).await.unwrap(), Some(true));
    assert_eq!(session.user_name().await.unwrap(), "Ada");
    assert_eq!(session.user_email().await.unwrap(), "ada@example.com");
}

#[tokio::test]
async fn test_persisted_id_wins_over_cloud_session() {
    let settings = Arc::new(MemorySettingsStore::new());
    settings.set(KEY_USER_ID, "local_1_deadbeef").await.unwrap();
    let session = SessionService::new(settings, Arc::new(StaticIdentityProvider::new(Some(cloud_user()))));

    assert_eq!(session.resolve_user_id().await.unwrap(), "local_1_deadbeef");
}

#[tokio::test]
async fn test_logout_mints_a_fresh_fallback() {
    let settings = Arc::new(MemorySettingsStore::new());
    let session = SessionService::new(settings.clone(), Arc::new(StaticIdentityProvider::new(Some(cloud_user()))));
    session.resolve_user_id().await.unwrap();
    session.mark_launched().await.unwrap();

    let new_id = session.logout().await.unwrap();
    assert!(is_fallback_id(&new_id));
    assert_eq!(settings.get(KEY_USER_ID).await.unwrap(), Some(new_id.clone()));
    assert!(settings.get(KEY_FIREBASE_UID).await.unwrap().is_none());
    assert!(!session.is_cloud_user().await.unwrap());
    assert!(!session.is_first_launch().await.unwrap());

    // The identity provider was signed out, so the fallback sticks
    assert_eq!(session.resolve_user_id().await.unwrap(), new_id);
}

#[tokio::test]
async fn test_attach_cloud_user_replaces_fallback() {
    let (session, settings) = local_session();
    let fallback = session.resolve_user_id().await.unwrap();

    session.attach_cloud_user(&cloud_user()).await.unwrap();
    let resolved = session.resolve_user_id().await.unwrap();
    assert_ne!(resolved, fallback);
    assert_eq!(resolved, "cloud-uid-42");
    assert_eq!(settings.get(KEY_USER_NAME).await.unwrap().as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_first_launch_flag() {
    let (session, _) = local_session();
    assert!(session.is_first_launch().await.unwrap());
    session.mark_launched().await.unwrap();
    assert!(!session.is_first_launch().await.unwrap());
}

#[tokio::test]
async fn test_db_settings_store_round_trip() {
    let storage = Arc::new(Mutex::new(LocalStorage::in_memory().await.unwrap()));
    let settings = DbSettingsStore::new(storage.clone());

    assert!(settings.get("user_id").await.unwrap().is_none());
    settings.set("user_id", "a").await.unwrap();
    settings.set("user_id", "b").await.unwrap();
    assert_eq!(settings.get("user_id").await.unwrap().as_deref(), Some("b"));

    settings.remove("user_id").await.unwrap();
    assert!(settings.get("user_id").await.unwrap().is_none());

    settings.set_bool("is_first_launch", false).await.unwrap();
    assert_eq!(settings.get_bool("is_first_launch").await.unwrap(), Some(false));
    settings.clear().await.unwrap();
    assert!(settings.get("is_first_launch").await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_over_database_survives_new_service() {
    let storage = Arc::new(Mutex::new(LocalStorage::in_memory().await.unwrap()));
    let first = SessionService::new(Arc::new(DbSettingsStore::new(storage.clone())), Arc::new(NoIdentityProvider));
    let id = first.resolve_user_id().await.unwrap();

    let second = SessionService::new(Arc::new(DbSettingsStore::new(storage)), Arc::new(NoIdentityProvider));
    assert_eq!(second.resolve_user_id().await.unwrap(), id);
}
