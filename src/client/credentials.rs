use std::sync::Arc;

use tokio::sync::RwLock;

/// Holder of the bearer token, shared by everything that issues protected
/// requests. Cloning shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_present(&self) -> bool {
        self.token.read().await.is_some()
    }
}
