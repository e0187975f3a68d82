use serde::Serialize;

use crate::controller::errors::ErrorInfo;
use crate::filters::Filters;
use crate::models::config::DashboardConfig;
use crate::pagination::Paginated;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// What happened to a fetch once its response arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Result committed to the controller state.
    Applied,
    /// A newer fetch was issued meanwhile; the result was dropped.
    Discarded,
    /// Authentication failed and the session store was notified.
    SessionExpired,
    /// Request failed; `error` is set and the previous items kept.
    Failed,
    /// Controller was torn down before or while the request ran.
    Abandoned,
}

/// Page size bounds and searchable fields for one list screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListOptions {
    pub default_page_size: usize,
    pub min_page_size: usize,
    pub max_page_size: usize,
    pub search_fields: Vec<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            min_page_size: 5,
            max_page_size: 100,
            search_fields: Vec::new(),
        }
    }
}

impl ListOptions {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            default_page_size: config.default_page_size,
            min_page_size: config.min_page_size,
            max_page_size: config.max_page_size,
            search_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Clamps a requested page size into the configured bounds.
    pub fn clamp_page_size(&self, size: usize) -> usize {
        let min = self.min_page_size.max(1);
        let max = self.max_page_size.max(min);
        size.clamp(min, max)
    }
}

/// Mutable state of one controller; only touched under its mutex.
#[derive(Debug)]
pub(crate) struct ListState<E> {
    pub items: Vec<E>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    /// Page size the next fetch asks for; `page_size` is the committed one.
    pub requested_page_size: usize,
    pub filters: Filters,
    pub search_term: String,
    pub status: LoadStatus,
    /// Status to return to when a mutation fails without touching the list.
    pub settled: LoadStatus,
    pub error: Option<ErrorInfo>,
    pub in_flight: usize,
    pub latest_fetch: u64,
}

impl<E> ListState<E> {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            items: Vec::new(),
            total_count: 0,
            page: 1,
            page_size,
            requested_page_size: page_size,
            filters: Filters::new(),
            search_term: String::new(),
            status: LoadStatus::Idle,
            settled: LoadStatus::Idle,
            error: None,
            in_flight: 0,
            latest_fetch: 0,
        }
    }

    /// Marks a request as started: loading, error cleared.
    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.status = LoadStatus::Loading;
        self.error = None;
    }

    /// Like [`ListState::begin`] for a write, remembering what a failed
    /// write has to restore.
    pub fn begin_write(&mut self) -> PendingWrite {
        let pending = PendingWrite {
            error: self.error.clone(),
            latest_fetch: self.latest_fetch,
        };
        self.begin();
        pending
    }

    /// Puts back status and read error after a failed write. A fetch issued
    /// meanwhile owns the error instead.
    pub fn abort_write(&mut self, pending: PendingWrite) {
        if self.in_flight > 0 {
            return;
        }
        if self.latest_fetch == pending.latest_fetch {
            self.error = pending.error;
        }
        self.status = self.settled;
    }

    pub fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn settle(&mut self, status: LoadStatus) {
        self.status = status;
        self.settled = status;
    }
}

/// State captured when a write starts.
#[derive(Debug)]
pub(crate) struct PendingWrite {
    error: Option<ErrorInfo>,
    latest_fetch: u64,
}

/// Read-only view of a controller for rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListSnapshot<E> {
    /// Visible items (after client-side search) with page metadata.
    pub page: Paginated<E>,
    pub filters: Vec<(String, String)>,
    pub search_term: String,
    pub status: LoadStatus,
    pub is_loading: bool,
    pub error: Option<ErrorInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_page_size_to_bounds() {
        let options = ListOptions::default();
        assert_eq!(options.clamp_page_size(1000), 100);
        assert_eq!(options.clamp_page_size(0), 5);
        assert_eq!(options.clamp_page_size(25), 25);
    }

    #[test]
    fn aborted_write_restores_read_error() {
        let mut state = ListState::<()>::new(20);
        state.begin();
        state.finish();
        state.error = Some(ErrorInfo::network());
        state.settle(LoadStatus::Errored);

        let pending = state.begin_write();
        assert!(state.error.is_none());
        state.finish();
        state.abort_write(pending);

        assert_eq!(state.status, LoadStatus::Errored);
        assert_eq!(state.error, Some(ErrorInfo::network()));
    }

    #[test]
    fn aborted_write_keeps_newer_fetch_result() {
        let mut state = ListState::<()>::new(20);
        state.error = Some(ErrorInfo::network());
        state.settle(LoadStatus::Errored);

        let pending = state.begin_write();
        state.begin();
        state.latest_fetch += 1;
        state.finish();
        state.settle(LoadStatus::Loaded);
        state.finish();
        state.abort_write(pending);

        assert_eq!(state.status, LoadStatus::Loaded);
        assert!(state.error.is_none());
    }

    #[test]
    fn clamp_tolerates_inverted_bounds() {
        let options = ListOptions {
            min_page_size: 0,
            max_page_size: 0,
            ..ListOptions::default()
        };
        assert_eq!(options.clamp_page_size(0), 1);
        assert_eq!(options.clamp_page_size(50), 1);
    }
}
