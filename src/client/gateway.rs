use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    client::{
        api::ApiClient,
        error::{ClientError, ErrorKind},
        flash::FlashBoard,
        resource::ResourceConfig,
        session::SessionGate,
        view::{CollectionHandle, RemoteCollectionView},
    },
    dto::{Validate, orders::UpdateOrderRequest},
    models::{ORDER_STATUSES, Order},
};

/// Asks the user to confirm a destructive action.
pub trait Confirm: Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Applied,
    /// The user declined the confirmation; nothing was sent.
    Declined,
    Failed(ErrorKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult {
    pub status: MutationStatus,
    pub message: Option<String>,
}

impl MutationResult {
    fn applied(message: String) -> Self {
        Self {
            status: MutationStatus::Applied,
            message: Some(message),
        }
    }

    fn failed(err: &ClientError) -> Self {
        Self {
            status: MutationStatus::Failed(err.kind()),
            message: Some(err.user_message()),
        }
    }

    pub fn success(&self) -> bool {
        self.status == MutationStatus::Applied
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self.status {
            MutationStatus::Failed(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Applies single-item changes and then re-fetches instead of patching the
/// local page.
pub struct MutationGateway<T> {
    api: ApiClient,
    config: ResourceConfig,
    session: SessionGate,
    view: RemoteCollectionView<T>,
    dependents: Vec<Arc<dyn CollectionHandle>>,
    flash: FlashBoard,
}

impl<T> Clone for MutationGateway<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            config: self.config.clone(),
            session: self.session.clone(),
            view: self.view.clone(),
            dependents: self.dependents.clone(),
            flash: self.flash.clone(),
        }
    }
}

impl<T> MutationGateway<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(
        api: ApiClient,
        session: SessionGate,
        view: RemoteCollectionView<T>,
        flash: FlashBoard,
    ) -> Self {
        Self {
            api,
            config: view.config().clone(),
            session,
            view,
            dependents: Vec::new(),
            flash,
        }
    }

    /// Other views refreshed after every successful change.
    pub fn with_dependents(mut self, dependents: Vec<Arc<dyn CollectionHandle>>) -> Self {
        self.dependents = dependents;
        self
    }

    pub fn view(&self) -> &RemoteCollectionView<T> {
        &self.view
    }

    async fn credential(&self) -> Result<Option<String>, ClientError> {
        if self.config.mutations_require_credential {
            self.session.require_credential().await.map(Some)
        } else {
            Ok(None)
        }
    }

    /// On success the view goes back to the first page.
    pub async fn create<P>(&self, payload: &P) -> MutationResult
    where
        P: Serialize + Validate + Sync,
    {
        self.flash.clear().await;
        let outcome: Result<(), ClientError> = async {
            payload.validate().map_err(ClientError::Validation)?;
            let credential = self.credential().await?;
            self.api
                .create::<P, T>(
                    self.config.path,
                    payload,
                    credential.as_deref(),
                    &self.config.save_failed(),
                )
                .await?;
            Ok(())
        }
        .await;
        self.finish(outcome, true, self.config.created()).await
    }

    /// On success the view stays on its current page.
    pub async fn update<P>(&self, id: i64, payload: &P) -> MutationResult
    where
        P: Serialize + Validate + Sync,
    {
        self.flash.clear().await;
        let outcome: Result<(), ClientError> = async {
            payload.validate().map_err(ClientError::Validation)?;
            let credential = self.credential().await?;
            self.api
                .update::<P, T>(
                    self.config.path,
                    id,
                    payload,
                    credential.as_deref(),
                    &self.config.save_failed(),
                )
                .await?;
            Ok(())
        }
        .await;
        self.finish(outcome, false, self.config.updated()).await
    }

    /// Deletes after `confirm` agrees. A delete blocked by dependents fails
    /// with [`ErrorKind::Conflict`] and leaves the view untouched.
    pub async fn remove(&self, id: i64, confirm: &dyn Confirm) -> MutationResult {
        self.flash.clear().await;
        let credential = match self.credential().await {
            Ok(credential) => credential,
            Err(err) => return self.finish(Err(err), false, String::new()).await,
        };
        if !confirm.confirm(&self.config.delete_prompt()) {
            tracing::debug!(path = self.config.path, id, "delete declined");
            return MutationResult {
                status: MutationStatus::Declined,
                message: None,
            };
        }
        let outcome = self
            .api
            .delete(
                self.config.path,
                id,
                credential.as_deref(),
                &self.config.delete_failed(),
                &self.config.delete_blocked(),
            )
            .await;
        self.finish(outcome, false, self.config.deleted()).await
    }

    async fn finish(
        &self,
        outcome: Result<(), ClientError>,
        rewind: bool,
        message: String,
    ) -> MutationResult {
        match outcome {
            Ok(()) => {
                tracing::info!(path = self.config.path, %message, "mutation applied");
                if rewind {
                    self.view.rewind().await;
                }
                self.flash.success(message.clone()).await;
                self.refresh_affected().await;
                MutationResult::applied(message)
            }
            Err(err) => {
                tracing::warn!(path = self.config.path, error = %err, "mutation failed");
                self.flash.error(err.user_message()).await;
                MutationResult::failed(&err)
            }
        }
    }

    // Refresh failures are recorded on the views themselves.
    async fn refresh_affected(&self) {
        if let Err(err) = self.view.refresh().await {
            tracing::debug!(path = self.config.path, error = %err, "refresh after mutation failed");
        }
        for view in &self.dependents {
            if let Err(err) = view.reload().await {
                tracing::debug!(resource = ?view.resource(), error = %err, "dependent refresh failed");
            }
        }
    }
}

impl MutationGateway<Order> {
    pub async fn update_status(&self, id: i64, status: &str) -> MutationResult {
        if !ORDER_STATUSES.contains(&status) {
            let err = ClientError::Validation(format!("Unknown order status '{status}'"));
            self.flash.clear().await;
            return self.finish(Err(err), false, String::new()).await;
        }
        self.update(id, &UpdateOrderRequest::status(status)).await
    }
}
