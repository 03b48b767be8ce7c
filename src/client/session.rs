use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    client::{
        api::ApiClient, credentials::CredentialStore, error::ClientError, flash::FlashBoard,
        view::CollectionHandle,
    },
    dto::{
        Validate,
        auth::{RegisterRequest, RegisterResponse},
        non_blank,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// What the registration form collects. `confirm_password` never leaves the
/// client.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub invite_code: Option<String>,
}

impl RegistrationForm {
    fn into_request(self) -> Result<RegisterRequest, ClientError> {
        if self.password != self.confirm_password {
            return Err(ClientError::Validation("The passwords do not match".into()));
        }
        let request = RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            invite_code: non_blank(self.invite_code),
        };
        request.validate().map_err(ClientError::Validation)?;
        Ok(request)
    }
}

struct SessionInner {
    api: ApiClient,
    credentials: CredentialStore,
    flash: FlashBoard,
    state: RwLock<SessionState>,
    username: RwLock<Option<String>>,
    // Views whose contents belong to the signed-in user.
    views: Vec<Arc<dyn CollectionHandle>>,
}

/// Decides whether protected requests may be issued. Authentication itself is
/// the server's job; the gate only tracks the credential it hands back.
#[derive(Clone)]
pub struct SessionGate {
    inner: Arc<SessionInner>,
}

impl SessionGate {
    pub fn new(
        api: ApiClient,
        credentials: CredentialStore,
        flash: FlashBoard,
        views: Vec<Arc<dyn CollectionHandle>>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                api,
                credentials,
                flash,
                state: RwLock::new(SessionState::Anonymous),
                username: RwLock::new(None),
                views,
            }),
        }
    }

    pub async fn state(&self) -> SessionState {
        *self.inner.state.read().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state().await == SessionState::Authenticated
    }

    pub async fn username(&self) -> Option<String> {
        self.inner.username.read().await.clone()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            let err = ClientError::Validation("Enter a username and password".into());
            self.inner.flash.error(err.user_message()).await;
            return Err(err);
        }

        *self.inner.state.write().await = SessionState::Authenticating;
        self.inner.flash.clear().await;

        match self.inner.api.login(username, password).await {
            Ok(response) => {
                self.inner.credentials.set(response.access_token).await;
                *self.inner.username.write().await = Some(username.to_string());
                *self.inner.state.write().await = SessionState::Authenticated;
                tracing::info!(username, "signed in");
                Ok(())
            }
            Err(err) => {
                *self.inner.state.write().await = SessionState::Anonymous;
                tracing::warn!(username, error = %err, "sign in failed");
                self.inner.flash.error(err.user_message()).await;
                Err(err)
            }
        }
    }

    /// Drops the credential and everything loaded while signed in.
    pub async fn logout(&self) {
        self.inner.credentials.clear().await;
        *self.inner.username.write().await = None;
        *self.inner.state.write().await = SessionState::Anonymous;
        for view in &self.inner.views {
            view.reset().await;
        }
        self.inner.flash.clear().await;
        tracing::info!("signed out");
    }

    pub async fn register(&self, form: RegistrationForm) -> Result<RegisterResponse, ClientError> {
        self.inner.flash.clear().await;
        let result = match form.into_request() {
            Ok(request) => self.inner.api.register(&request).await,
            Err(err) => Err(err),
        };
        match &result {
            Ok(response) => self.inner.flash.success(response.message.clone()).await,
            Err(err) => self.inner.flash.error(err.user_message()).await,
        }
        result
    }

    /// The stored token, or [`ClientError::MissingCredential`] while anonymous.
    pub async fn require_credential(&self) -> Result<String, ClientError> {
        self.inner
            .credentials
            .get()
            .await
            .ok_or(ClientError::MissingCredential)
    }
}
