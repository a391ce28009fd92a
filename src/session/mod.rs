//! Session and identity resolution.
//!
//! [`SessionService`] is constructed explicitly and handed to whoever needs a
//! user identifier. Persistence goes through an injected [`SettingsStore`],
//! and the cloud session through an injected [`IdentityProvider`].

pub mod identity;
pub mod settings;

pub use identity::{CloudUser, IdentityProvider, NoIdentityProvider, StaticIdentityProvider};
pub use settings::{DbSettingsStore, MemorySettingsStore, SettingsStore};

use anyhow::Result;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::constants::{
    DEFAULT_USER_EMAIL, DEFAULT_USER_NAME, FALLBACK_USER_PREFIX, KEY_FIREBASE_UID, KEY_IS_FIREBASE_USER,
    KEY_IS_FIRST_LAUNCH, KEY_USER_EMAIL, KEY_USER_ID, KEY_USER_NAME,
};
use crate::utils::datetime;

/// Keys wiped on logout. The first-launch flag survives.
const SESSION_KEYS: [&str; 5] = [
    KEY_USER_ID,
    KEY_USER_NAME,
    KEY_USER_EMAIL,
    KEY_FIREBASE_UID,
    KEY_IS_FIREBASE_USER,
];

/// Resolves and persists the installation's user identifier.
#[derive(Clone)]
pub struct SessionService {
    settings: Arc<dyn SettingsStore>,
    identity: Arc<dyn IdentityProvider>,
    /// Serializes resolution so concurrent callers never mint two fallback ids
    resolve_lock: Arc<Mutex<()>>,
}

impl SessionService {
    pub fn new(settings: Arc<dyn SettingsStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            settings,
            identity,
            resolve_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Return the persisted user id, adopting the cloud session or minting a
    /// fallback id on first access.
    pub async fn resolve_user_id(&self) -> Result<String> {
        let _guard = self.resolve_lock.lock().await;

        if let Some(user_id) = self.settings.get(KEY_USER_ID).await? {
            if !user_id.is_empty() {
                return Ok(user_id);
            }
        }

        if let Some(user) = self.identity.current_user().await? {
            self.persist_cloud_user(&user).await?;
            info!("Resolved cloud user {}", user.uid);
            return Ok(user.uid);
        }

        self.persist_fallback_user().await
    }

    /// Persist an authenticated identity, replacing whatever was stored.
    pub async fn attach_cloud_user(&self, user: &CloudUser) -> Result<()> {
        let _guard = self.resolve_lock.lock().await;
        self.persist_cloud_user(user).await
    }

    /// Sign out, wipe the session, and immediately mint a fresh fallback id.
    pub async fn logout(&self) -> Result<String> {
        let _guard = self.resolve_lock.lock().await;

        self.identity.sign_out().await?;
        for key in SESSION_KEYS {
            self.settings.remove(key).await?;
        }
        self.settings.set_bool(KEY_IS_FIRST_LAUNCH, false).await?;

        let user_id = self.persist_fallback_user().await?;
        info!("Logged out, switched to {}", user_id);
        Ok(user_id)
    }

    pub async fn user_name(&self) -> Result<String> {
        Ok(self
            .settings
            .get(KEY_USER_NAME)
            .await?
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()))
    }

    pub async fn user_email(&self) -> Result<String> {
        Ok(self
            .settings
            .get(KEY_USER_EMAIL)
            .await?
            .unwrap_or_else(|| DEFAULT_USER_EMAIL.to_string()))
    }

    pub async fn is_cloud_user(&self) -> Result<bool> {
        Ok(self.settings.get_bool(KEY_IS_FIREBASE_USER).await?.unwrap_or(false))
    }

    /// `true` until [`SessionService::mark_launched`] is called.
    pub async fn is_first_launch(&self) -> Result<bool> {
        Ok(self.settings.get_bool(KEY_IS_FIRST_LAUNCH).await?.unwrap_or(true))
    }

    pub async fn mark_launched(&self) -> Result<()> {
        self.settings.set_bool(KEY_IS_FIRST_LAUNCH, false).await
    }

    async fn persist_cloud_user(&self, user: &CloudUser) -> Result<()> {
        self.settings.set(KEY_USER_ID, &user.uid).await?;
        self.settings.set(KEY_FIREBASE_UID, &user.uid).await?;
        self.settings
            .set(KEY_USER_NAME, user.display_name.as_deref().unwrap_or(DEFAULT_USER_NAME))
            .await?;
        self.settings
            .set(KEY_USER_EMAIL, user.email.as_deref().unwrap_or(DEFAULT_USER_EMAIL))
            .await?;
        self.settings.set_bool(KEY_IS_FIREBASE_USER, true).await
    }

    async fn persist_fallback_user(&self) -> Result<String> {
        let user_id = generate_fallback_id();
        self.settings.set(KEY_USER_ID, &user_id).await?;
        self.settings.set(KEY_USER_NAME, DEFAULT_USER_NAME).await?;
        self.settings.set(KEY_USER_EMAIL, DEFAULT_USER_EMAIL).await?;
        self.settings.set_bool(KEY_IS_FIREBASE_USER, false).await?;
        info!("Created local user {}", user_id);
        Ok(user_id)
    }
}

/// `local_<epoch millis>_<8 hex chars>`
pub fn generate_fallback_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}{}_{}", FALLBACK_USER_PREFIX, datetime::now_millis(), &random[..8])
}

/// Whether `user_id` was minted locally rather than by the identity service.
pub fn is_fallback_id(user_id: &str) -> bool {
    user_id.starts_with(FALLBACK_USER_PREFIX)
}
