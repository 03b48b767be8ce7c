use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::{
    client::{
        api::ApiClient,
        credentials::CredentialStore,
        error::ClientError,
        resource::{Resource, ResourceConfig},
    },
    models::Record,
    query::{ListQuery, Page, SortDirection, SortKey},
};

#[derive(Debug, Clone)]
pub struct ViewState<T> {
    pub query: ListQuery,
    pub page: Page<T>,
    /// Refreshes issued and not yet completed.
    pub in_flight: usize,
    pub error: Option<String>,
    // Bumped by `clear`; completions from an older epoch are dropped.
    epoch: u64,
}

impl<T> ViewState<T> {
    fn new(query: ListQuery, epoch: u64) -> Self {
        Self {
            query,
            page: Page::default(),
            in_flight: 0,
            error: None,
            epoch,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn page_count(&self) -> u64 {
        self.page.page_count(self.query.page_limit)
    }

    pub fn has_previous(&self) -> bool {
        self.query.page_offset > 0
    }

    pub fn has_next(&self) -> bool {
        self.query.page_offset.saturating_add(self.query.page_limit) < self.page.total_count
    }
}

struct ViewInner<T> {
    api: ApiClient,
    config: ResourceConfig,
    credentials: CredentialStore,
    debounce: Duration,
    default_query: ListQuery,
    state: RwLock<ViewState<T>>,
    // Ticket of the most recent scheduled refresh; older timers see a
    // different value when they wake and do nothing.
    schedule: AtomicU64,
}

/// The visible slice of one remote collection.
///
/// State only changes when a refresh completes, and completions are applied
/// in the order they arrive. A slow response to an older query can therefore
/// overwrite a newer one; requests are never cancelled once sent.
pub struct RemoteCollectionView<T> {
    inner: Arc<ViewInner<T>>,
}

impl<T> Clone for RemoteCollectionView<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> RemoteCollectionView<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(
        api: ApiClient,
        config: ResourceConfig,
        credentials: CredentialStore,
        page_limit: u64,
        debounce: Duration,
    ) -> Self {
        let default_query = ListQuery::new(page_limit);
        Self {
            inner: Arc::new(ViewInner {
                api,
                config,
                credentials,
                debounce,
                state: RwLock::new(ViewState::new(default_query.clone(), 0)),
                default_query,
                schedule: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.inner.config
    }

    /// Issues one listing request for the current query and, on success,
    /// replaces the stored page wholesale. On failure the previous items stay
    /// and the error message is recorded.
    pub async fn refresh(&self) -> Result<Page<T>, ClientError> {
        let (query, epoch) = {
            let mut state = self.inner.state.write().await;
            state.in_flight += 1;
            (state.query.clone(), state.epoch)
        };

        let result = self.fetch(&query).await;

        let mut state = self.inner.state.write().await;
        if state.epoch != epoch {
            tracing::debug!(path = self.inner.config.path, "dropping result from before reset");
            return result;
        }
        state.in_flight = state.in_flight.saturating_sub(1);
        match &result {
            Ok(page) => {
                state.page = page.clone();
                state.error = None;
            }
            Err(err) => {
                tracing::warn!(path = self.inner.config.path, error = %err, "refresh failed");
                state.error = Some(err.user_message());
            }
        }
        result
    }

    async fn fetch(&self, query: &ListQuery) -> Result<Page<T>, ClientError> {
        let config = &self.inner.config;
        let credential = if config.send_credential {
            self.inner.credentials.get().await
        } else {
            None
        };
        if config.listing_requires_credential && credential.is_none() {
            return Err(ClientError::MissingCredential);
        }
        self.inner
            .api
            .list(config.path, query, credential.as_deref(), &config.load_failed())
            .await
    }

    /// Replaces the whole query and refreshes immediately.
    pub async fn refresh_with(&self, query: ListQuery) -> Result<Page<T>, ClientError> {
        self.cancel_scheduled();
        self.inner.state.write().await.query = query;
        self.refresh().await
    }

    /// Updates the filter and schedules a refresh after the quiet period.
    /// A later call before the period ends replaces the pending refresh.
    pub async fn set_filter(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut state = self.inner.state.write().await;
            if state.query.filter_text == text {
                return;
            }
            state.query.filter_text = text;
            state.query.page_offset = 0;
        }
        self.schedule_refresh();
    }

    fn schedule_refresh(&self) {
        let ticket = self.inner.schedule.fetch_add(1, Ordering::SeqCst) + 1;
        let view = self.clone();
        let delay = self.inner.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if view.inner.schedule.load(Ordering::SeqCst) != ticket {
                return;
            }
            if let Err(err) = view.refresh().await {
                tracing::debug!(error = %err, "scheduled refresh failed");
            }
        });
    }

    fn cancel_scheduled(&self) {
        self.inner.schedule.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn set_sort(
        &self,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Page<T>, ClientError> {
        if !self.inner.config.supports_sort(key) {
            return Err(ClientError::Validation(format!(
                "The {} list cannot be sorted by {}",
                self.inner.config.singular,
                key.as_param()
            )));
        }
        self.cancel_scheduled();
        {
            let mut state = self.inner.state.write().await;
            state.query.sort_key = key;
            state.query.sort_direction = direction;
            state.query.page_offset = 0;
        }
        self.refresh().await
    }

    pub async fn toggle_direction(&self) -> Result<Page<T>, ClientError> {
        let (key, direction) = {
            let state = self.inner.state.read().await;
            (state.query.sort_key, state.query.sort_direction)
        };
        self.set_sort(key, direction.toggled()).await
    }

    /// Moves to page `index` (zero-based). Filter and sort are kept.
    pub async fn go_to_page(&self, index: u64) -> Result<Page<T>, ClientError> {
        self.cancel_scheduled();
        {
            let mut state = self.inner.state.write().await;
            state.query = state.query.at_page(index);
        }
        self.refresh().await
    }

    /// No request is issued when already on the last page.
    pub async fn next_page(&self) -> Result<Page<T>, ClientError> {
        let (has_next, index, page) = {
            let state = self.inner.state.read().await;
            (state.has_next(), state.query.page_index(), state.page.clone())
        };
        if !has_next {
            return Ok(page);
        }
        self.go_to_page(index + 1).await
    }

    /// No request is issued when already on the first page.
    pub async fn previous_page(&self) -> Result<Page<T>, ClientError> {
        let (index, page) = {
            let state = self.inner.state.read().await;
            (state.query.page_index(), state.page.clone())
        };
        if index == 0 {
            return Ok(page);
        }
        self.go_to_page(index - 1).await
    }

    pub(crate) async fn rewind(&self) {
        self.inner.state.write().await.query.page_offset = 0;
    }

    /// Forgets everything loaded and restores the default query.
    pub async fn clear(&self) {
        self.cancel_scheduled();
        let mut state = self.inner.state.write().await;
        let epoch = state.epoch + 1;
        *state = ViewState::new(self.inner.default_query.clone(), epoch);
    }

    pub async fn snapshot(&self) -> ViewState<T> {
        self.inner.state.read().await.clone()
    }

    pub async fn query(&self) -> ListQuery {
        self.inner.state.read().await.query.clone()
    }

    pub async fn items(&self) -> Vec<T> {
        self.inner.state.read().await.page.items.clone()
    }

    pub async fn total_count(&self) -> u64 {
        self.inner.state.read().await.page.total_count
    }

    pub async fn page_index(&self) -> u64 {
        self.inner.state.read().await.query.page_index()
    }

    pub async fn page_count(&self) -> u64 {
        self.inner.state.read().await.page_count()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.is_loading()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.inner.state.read().await.error.clone()
    }
}

impl<T> RemoteCollectionView<T>
where
    T: Record + DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub async fn find(&self, id: i64) -> Option<T> {
        self.inner
            .state
            .read()
            .await
            .page
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }
}

/// Type-erased handle so gateways and the session can reach views of any
/// item type.
#[async_trait]
pub trait CollectionHandle: Send + Sync {
    fn resource(&self) -> Resource;

    async fn reload(&self) -> Result<(), ClientError>;

    async fn reset(&self);
}

#[async_trait]
impl<T> CollectionHandle for RemoteCollectionView<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn resource(&self) -> Resource {
        self.inner.config.resource
    }

    async fn reload(&self) -> Result<(), ClientError> {
        self.refresh().await.map(|_| ())
    }

    async fn reset(&self) {
        self.clear().await;
    }
}
