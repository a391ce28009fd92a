//! Cloud identity session abstraction.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// An authenticated user as reported by the cloud identity service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudUser {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// The cloud identity session, if any.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when no session exists.
    async fn current_user(&self) -> Result<Option<CloudUser>>;

    async fn sign_out(&self) -> Result<()>;
}

/// Provider for installations without cloud sign-in.
pub struct NoIdentityProvider;

#[async_trait]
impl IdentityProvider for NoIdentityProvider {
    async fn current_user(&self) -> Result<Option<CloudUser>> {
        Ok(None)
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(())
    }
}

/// Provider holding a fixed session until signed out.
#[derive(Default)]
pub struct StaticIdentityProvider {
    user: Mutex<Option<CloudUser>>,
}

impl StaticIdentityProvider {
    pub fn new(user: Option<CloudUser>) -> Self {
        Self { user: Mutex::new(user) }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn current_user(&self) -> Result<Option<CloudUser>> {
        Ok(self.user.lock().map_err(|_| anyhow::anyhow!("identity lock poisoned"))?.clone())
    }

    async fn sign_out(&self) -> Result<()> {
        *self.user.lock().map_err(|_| anyhow::anyhow!("identity lock poisoned"))? = None;
        Ok(())
    }
}
