//! Generic list-state controller shared by every resource screen.
//!
//! A controller owns the fetched page, the active filters and the client-side
//! search term of one screen. Operations are `async` and may run
//! concurrently; the state mutex is never held across an `.await`. Fetch
//! results are committed in issue order: each fetch takes a sequence token
//! and its response is dropped unless that token is still the latest.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde_json::Value;

use crate::api::errors::ApiResult;
use crate::api::{ApiRequest, ApiResponse, ApiTransport, Endpoint};
use crate::controller::errors::{
    ControllerError, ControllerResult, DEFAULT_REJECTION_MESSAGE, ErrorInfo,
};
use crate::controller::state::{
    FetchOutcome, ListOptions, ListSnapshot, ListState, LoadStatus, PendingWrite,
};
use crate::domain::record::Entity;
use crate::domain::types::EntityId;
use crate::dto::api::{ListEnvelope, WriteEnvelope};
use crate::filters::Filters;
use crate::pagination::{Paginated, total_pages};
use crate::search::filter_by_search;
use crate::session::SessionStore;

pub mod errors;
pub mod state;

pub struct ResourceListController<E, T: ?Sized, S: ?Sized> {
    endpoint: Endpoint,
    transport: Arc<T>,
    session: Arc<S>,
    options: ListOptions,
    state: Mutex<ListState<E>>,
    abandoned: AtomicBool,
}

impl<E, T, S> ResourceListController<E, T, S>
where
    E: Entity,
    T: ApiTransport + ?Sized,
    S: SessionStore + ?Sized,
{
    pub fn new(
        endpoint: impl Into<Endpoint>,
        transport: Arc<T>,
        session: Arc<S>,
        options: ListOptions,
    ) -> Self {
        let page_size = options.clamp_page_size(options.default_page_size);
        Self {
            endpoint: endpoint.into(),
            transport,
            session,
            options,
            state: Mutex::new(ListState::new(page_size)),
            abandoned: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ListState<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Items of the last successful fetch, ignoring the search term.
    pub fn items(&self) -> Vec<E> {
        self.lock().items.clone()
    }

    /// Items of the last successful fetch refined by the search term.
    pub fn visible_items(&self) -> Vec<E> {
        let state = self.lock();
        filter_by_search(&state.items, &state.search_term, &self.options.search_fields)
    }

    pub fn page(&self) -> usize {
        self.lock().page
    }

    pub fn page_size(&self) -> usize {
        self.lock().page_size
    }

    pub fn total_count(&self) -> usize {
        self.lock().total_count
    }

    pub fn total_pages(&self) -> usize {
        let state = self.lock();
        total_pages(state.total_count, state.page_size)
    }

    pub fn filters(&self) -> Filters {
        self.lock().filters.clone()
    }

    pub fn search_term(&self) -> String {
        self.lock().search_term.clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.lock().status
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    pub fn error(&self) -> Option<ErrorInfo> {
        self.lock().error.clone()
    }

    /// Everything a list screen renders, taken under one lock.
    pub fn snapshot(&self) -> ListSnapshot<E> {
        let state = self.lock();
        let visible =
            filter_by_search(&state.items, &state.search_term, &self.options.search_fields);
        ListSnapshot {
            page: Paginated::new(visible, state.page, state.page_size, state.total_count),
            filters: state.filters.query_pairs(),
            search_term: state.search_term.clone(),
            status: state.status,
            is_loading: state.in_flight > 0,
            error: state.error.clone(),
        }
    }

    /// Marks the owning screen as gone. Responses arriving afterwards are
    /// ignored and new operations are refused.
    pub fn abandon(&self) {
        self.abandoned.store(true, Ordering::SeqCst);
    }

    pub fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }

    /// Re-fetches with the current page, page size and filters.
    pub async fn load(&self) -> FetchOutcome {
        let (page, page_size, filters) = self.current_query();
        self.fetch_page(page, page_size, &filters).await
    }

    pub async fn go_to_page(&self, page: usize) -> FetchOutcome {
        let (_, page_size, filters) = self.current_query();
        self.fetch_page(page, page_size, &filters).await
    }

    /// Fetches one page. On success items, total, page and page size are
    /// replaced together; on failure the previous items stay in place.
    pub async fn fetch_page(&self, page: usize, page_size: usize, filters: &Filters) -> FetchOutcome {
        if self.is_abandoned() {
            return FetchOutcome::Abandoned;
        }

        let page = page.max(1);
        let page_size = page_size.max(1);

        let token = {
            let mut state = self.lock();
            state.begin();
            state.latest_fetch += 1;
            state.latest_fetch
        };

        let request = ApiRequest::get(self.endpoint.list())
            .query_param("page", page)
            .query_param("page_size", page_size)
            .query_pairs(filters.query_pairs());

        log::debug!(
            "Fetching {} page {page} (size {page_size}, request #{token})",
            self.endpoint.base()
        );

        let result = self.transport.send(request).await;
        self.commit_fetch(token, page, page_size, filters, result)
    }

    /// Merges filter updates (`None`, blank and `all` remove a key) and
    /// fetches the first page.
    pub async fn apply_filters<I, K, V>(&self, updates: I) -> FetchOutcome
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (page_size, filters) = {
            let mut state = self.lock();
            state.filters.merge(updates);
            (state.requested_page_size, state.filters.clone())
        };
        self.fetch_page(1, page_size, &filters).await
    }

    /// Clears filters and the search term, then fetches the first page.
    pub async fn reset_filters(&self) -> FetchOutcome {
        let page_size = {
            let mut state = self.lock();
            state.filters.clear();
            state.search_term.clear();
            state.requested_page_size
        };
        self.fetch_page(1, page_size, &Filters::new()).await
    }

    /// Updates the client-side search term and returns the refined view.
    /// Never touches the network.
    pub fn set_search_term(&self, term: impl Into<String>) -> Vec<E> {
        let mut state = self.lock();
        state.search_term = term.into();
        filter_by_search(&state.items, &state.search_term, &self.options.search_fields)
    }

    /// Clamps the size into the configured bounds and fetches the first page.
    /// Later fetches use the new size even if this one is superseded.
    pub async fn change_page_size(&self, size: usize) -> FetchOutcome {
        let page_size = self.options.clamp_page_size(size);
        let filters = {
            let mut state = self.lock();
            state.requested_page_size = page_size;
            state.filters.clone()
        };
        self.fetch_page(1, page_size, &filters).await
    }

    pub async fn create<P>(&self, payload: &P) -> ControllerResult<Option<E>>
    where
        P: Serialize + ?Sized,
    {
        let body = to_body(payload)?;
        self.mutate(ApiRequest::post(self.endpoint.create()).json(body))
            .await
    }

    /// Sends the payload with `id` set to the target identifier.
    pub async fn update<P>(&self, id: &EntityId, payload: &P) -> ControllerResult<Option<E>>
    where
        P: Serialize + ?Sized,
    {
        let mut body = to_body(payload)?;
        let Value::Object(fields) = &mut body else {
            return Err(ControllerError::Malformed(
                "update payload must be a JSON object".to_string(),
            ));
        };
        fields.insert("id".to_string(), Value::String(id.to_string()));
        self.mutate(ApiRequest::put(self.endpoint.update()).json(body))
            .await
    }

    pub async fn remove(&self, id: &EntityId) -> ControllerResult<()> {
        self.mutate(ApiRequest::delete(self.endpoint.delete(id)))
            .await
            .map(|_| ())
    }

    fn current_query(&self) -> (usize, usize, Filters) {
        let state = self.lock();
        (state.page, state.requested_page_size, state.filters.clone())
    }

    /// Sends a write and, once its response is in, re-fetches the current
    /// page so derived fields come from the server.
    async fn mutate(&self, request: ApiRequest) -> ControllerResult<Option<E>> {
        if self.is_abandoned() {
            return Err(ControllerError::Abandoned);
        }

        let pending = self.lock().begin_write();
        log::debug!("{} {}", request.method, request.path);

        let result = self.transport.send(request).await;
        let data = self.settle_write(pending, result)?;

        if !self.is_abandoned() {
            self.load().await;
        }

        Ok(data)
    }

    fn commit_fetch(
        &self,
        token: u64,
        page: usize,
        page_size: usize,
        filters: &Filters,
        result: ApiResult<ApiResponse>,
    ) -> FetchOutcome {
        let mut state = self.lock();
        state.finish();

        if self.is_abandoned() {
            return FetchOutcome::Abandoned;
        }

        if token != state.latest_fetch {
            log::debug!(
                "Discarding stale response for {} (request #{token}, latest #{})",
                self.endpoint.base(),
                state.latest_fetch
            );
            return FetchOutcome::Discarded;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                log::error!("Failed to fetch {}: {err}", self.endpoint.base());
                state.error = Some(ErrorInfo::network());
                state.settle(LoadStatus::Errored);
                return FetchOutcome::Failed;
            }
        };

        if response.is_unauthorized() {
            state.settle(LoadStatus::Idle);
            drop(state);
            self.session.on_unauthorized();
            return FetchOutcome::SessionExpired;
        }

        if !response.is_success() {
            log::error!(
                "Failed to fetch {}: server responded with status {}",
                self.endpoint.base(),
                response.status
            );
            state.error = Some(ErrorInfo::network());
            state.settle(LoadStatus::Errored);
            return FetchOutcome::Failed;
        }

        let envelope = match serde_json::from_value::<ListEnvelope<E>>(response.body) {
            Ok(envelope) => envelope,
            Err(err) => {
                log::error!("Malformed list response from {}: {err}", self.endpoint.base());
                return Self::commit_malformed(&mut state);
            }
        };

        let total_count = envelope.total_count();
        let Some(items) = envelope.data else {
            log::error!("List response from {} has no data", self.endpoint.base());
            return Self::commit_malformed(&mut state);
        };

        state.items = items;
        state.total_count = total_count;
        state.page = envelope.page.filter(|p| *p >= 1).unwrap_or(page);
        state.page_size = envelope.page_size.filter(|s| *s >= 1).unwrap_or(page_size);
        state.requested_page_size = state.page_size;
        state.filters = filters.clone();
        state.settle(LoadStatus::Loaded);
        FetchOutcome::Applied
    }

    fn commit_malformed(state: &mut ListState<E>) -> FetchOutcome {
        state.items.clear();
        state.total_count = 0;
        state.error = Some(ErrorInfo::malformed());
        state.settle(LoadStatus::Errored);
        FetchOutcome::Failed
    }

    fn settle_write(
        &self,
        pending: PendingWrite,
        result: ApiResult<ApiResponse>,
    ) -> ControllerResult<Option<E>> {
        let outcome = classify_write(result);

        let mut state = self.lock();
        state.finish();
        match &outcome {
            Err(ControllerError::SessionExpired) => {
                state.settle(LoadStatus::Idle);
                drop(state);
                if !self.is_abandoned() {
                    self.session.on_unauthorized();
                }
            }
            Err(err) => {
                log::error!("Write to {} failed: {err}", self.endpoint.base());
                state.abort_write(pending);
            }
            Ok(_) => {}
        }

        outcome
    }
}

fn to_body<P: Serialize + ?Sized>(payload: &P) -> ControllerResult<Value> {
    serde_json::to_value(payload).map_err(|err| ControllerError::Malformed(err.to_string()))
}

/// Maps a write response onto the caller-facing outcome.
fn classify_write<E: Entity>(result: ApiResult<ApiResponse>) -> ControllerResult<Option<E>> {
    let response = result.map_err(|err| ControllerError::Network(err.to_string()))?;

    if response.is_unauthorized() {
        return Err(ControllerError::SessionExpired);
    }

    if !response.is_success() {
        let message = response
            .body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty());
        return Err(match message {
            Some(message) if (400..500).contains(&response.status) => {
                ControllerError::Rejected(message.to_string())
            }
            _ => ControllerError::Network(format!(
                "server responded with status {}",
                response.status
            )),
        });
    }

    let envelope = match serde_json::from_value::<WriteEnvelope<Value>>(response.body) {
        Ok(envelope) => envelope,
        Err(err) => {
            log::debug!("Write response is not an envelope: {err}");
            return Ok(None);
        }
    };

    if !envelope.succeeded() {
        let message = envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());
        return Err(ControllerError::Rejected(message));
    }

    Ok(envelope
        .data
        .and_then(|data| match serde_json::from_value(data) {
            Ok(entity) => Some(entity),
            Err(err) => {
                log::debug!("Write response data is not an entity: {err}");
                None
            }
        }))
}
