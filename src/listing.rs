// src/listing.rs
//! Filtered, paginated job listing: query state, fetch scheduling and result
//! reconciliation

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::app_log;
use crate::auth::{guard, Route};
use crate::core::{JobBoardApi, SessionContext};
use crate::environment::ClientConfig;
use crate::error::ClientError;
use crate::messages::{FETCH_JOBS_ERROR, FETCH_JOBS_FAILED};
use crate::types::{FilterField, Job, JobPage, ListingQuery, Organization};

/// Number of numbered page buttons the pager shows.
const PAGER_BUTTONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListingConfig {
    pub page_size: u32,
    pub search_debounce: Duration,
}

impl From<&ClientConfig> for ListingConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            page_size: config.page_size,
            search_debounce: config.search_debounce(),
        }
    }
}

/// Everything the listing view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingState {
    pub query: ListingQuery,
    pub items: Vec<Job>,
    pub total: u64,
    pub total_pages: u32,
    pub loading: bool,
    pub error: Option<String>,
    pub organizations: Vec<Organization>,
    /// Set once any listing result has been applied.
    pub observed: bool,
    generation: u64,
}

/// Result of applying a response to the state.
#[derive(Debug, PartialEq)]
enum Applied {
    Stale,
    Done,
    Refetch(ListingQuery),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub pages: Vec<u32>,
    pub has_previous: bool,
    pub has_next: bool,
}

impl ListingState {
    fn new(page_size: u32) -> Self {
        Self {
            query: ListingQuery::new(page_size),
            items: Vec::new(),
            total: 0,
            total_pages: 0,
            loading: false,
            error: None,
            organizations: Vec::new(),
            observed: false,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Highest page that may be requested.
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn page_allowed(&self, page: u32) -> bool {
        page >= 1 && (!self.observed || page <= self.last_page())
    }

    /// Pager controls; `None` when everything fits on one page.
    pub fn pager(&self) -> Option<Pager> {
        if self.total_pages <= 1 {
            return None;
        }
        Some(Pager {
            current: self.query.page,
            pages: (1..=self.total_pages.min(PAGER_BUTTONS)).collect(),
            has_previous: self.query.page > 1,
            has_next: self.query.page < self.total_pages,
        })
    }

    pub fn summary(&self) -> String {
        format!(
            "Menampilkan {} dari {} lowongan magang",
            self.items.len(),
            self.total
        )
    }

    pub fn page_label(&self) -> String {
        format!("Halaman {} dari {}", self.query.page, self.total_pages)
    }

    fn begin(&mut self) -> (u64, ListingQuery) {
        self.generation += 1;
        self.loading = true;
        (self.generation, self.query.clone())
    }

    fn apply(&mut self, generation: u64, outcome: Result<JobPage, ClientError>) -> Applied {
        if generation != self.generation {
            app_log!(
                debug,
                "discarding listing response for generation {} (latest {})",
                generation,
                self.generation
            );
            return Applied::Stale;
        }

        match outcome {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                self.total_pages = page.total_pages;
                self.observed = true;
                self.error = None;

                let last_page = self.last_page();
                if self.query.page > last_page {
                    app_log!(
                        info,
                        "page {} is past the last page {}, clamping",
                        self.query.page,
                        last_page
                    );
                    self.query.page = last_page;
                    return Applied::Refetch(self.query.clone());
                }

                self.loading = false;
                Applied::Done
            }
            Err(e) => {
                app_log!(error, "Error fetching jobs: {}", e);
                self.error = Some(e.user_message(FETCH_JOBS_FAILED, FETCH_JOBS_ERROR));
                self.loading = false;
                Applied::Done
            }
        }
    }
}

/// Owns the listing state and issues at most one live fetch per state change.
///
/// Every change bumps the request generation and aborts the previous fetch task;
/// a response whose generation is no longer the latest is dropped. Must be used
/// from within a Tokio runtime.
pub struct ListingController<A: JobBoardApi> {
    api: Arc<A>,
    session: SessionContext,
    state: Arc<watch::Sender<ListingState>>,
    inflight: Option<JoinHandle<()>>,
    organizations_task: Option<JoinHandle<()>>,
    search_debounce: Duration,
}

impl<A: JobBoardApi> ListingController<A> {
    pub fn new(api: Arc<A>, session: SessionContext, config: ListingConfig) -> Self {
        let (state, _) = watch::channel(ListingState::new(config.page_size));
        Self {
            api,
            session,
            state: Arc::new(state),
            inflight: None,
            organizations_task: None,
            search_debounce: config.search_debounce,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ListingState {
        self.state.borrow().clone()
    }

    /// Enter the listing view: redirect to login without a session, otherwise
    /// load the first page and the organization filter options.
    pub async fn mount(&mut self) -> Result<Route, ClientError> {
        let route = guard(Route::Dashboard, &self.session)?;
        if route != Route::Dashboard {
            return Ok(route);
        }

        self.spawn_organizations()?;
        self.schedule(Duration::ZERO)?;
        Ok(route)
    }

    /// Change one filter. Resets to page 1; free-text fields wait out the
    /// debounce window before fetching.
    pub fn set_filter(
        &mut self,
        field: FilterField,
        value: impl Into<String>,
    ) -> Result<(), ClientError> {
        let value = value.into();
        self.state.send_modify(|s| {
            s.query.page = 1;
            s.query.filters.set(field, value);
        });

        let delay = if field.is_free_text() {
            self.search_debounce
        } else {
            Duration::ZERO
        };
        self.schedule(delay)
    }

    /// Jump to a page. Pages outside `1..=max(1, total_pages)` are refused once a
    /// result has been seen.
    pub fn set_page(&mut self, page: u32) -> Result<(), ClientError> {
        let allowed = {
            let state = self.state.borrow();
            if state.page_allowed(page) {
                Ok(())
            } else {
                Err(ClientError::PageOutOfRange {
                    requested: page,
                    last_page: state.last_page(),
                })
            }
        };
        allowed?;

        self.state.send_modify(|s| s.query.page = page);
        self.schedule(Duration::ZERO)
    }

    pub fn next_page(&mut self) -> Result<(), ClientError> {
        let page = self.state.borrow().query.page.saturating_add(1);
        self.set_page(page)
    }

    pub fn previous_page(&mut self) -> Result<(), ClientError> {
        let page = self.state.borrow().query.page.saturating_sub(1);
        self.set_page(page)
    }

    /// Explicit search submit: back to page 1 and fetch now, skipping any
    /// pending debounce.
    pub fn submit_search(&mut self) -> Result<(), ClientError> {
        self.state.send_modify(|s| s.query.page = 1);
        self.schedule(Duration::ZERO)
    }

    /// Fetch the current query immediately and wait for it to land.
    pub async fn fetch(&mut self) -> Result<(), ClientError> {
        self.schedule(Duration::ZERO)?;
        self.settle().await;
        Ok(())
    }

    /// Wait for the in-flight fetches, if any, to finish.
    pub async fn settle(&mut self) {
        for handle in [self.inflight.take(), self.organizations_task.take()]
            .into_iter()
            .flatten()
        {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    app_log!(error, "listing task failed: {}", e);
                }
            }
        }
    }

    fn schedule(&mut self, delay: Duration) -> Result<(), ClientError> {
        if let Some(previous) = self.inflight.take() {
            previous.abort();
        }

        let token = match self.session.token() {
            Ok(Some(token)) => token,
            Ok(None) => return Err(self.abandon(ClientError::NotAuthenticated)),
            Err(e) => return Err(self.abandon(e)),
        };

        let mut ticket = None;
        self.state.send_modify(|s| ticket = Some(s.begin()));
        let Some((generation, mut query)) = ticket else {
            return Ok(());
        };

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);

        self.inflight = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            loop {
                let outcome = api.list_jobs(&token, &query).await;
                let mut applied = Applied::Stale;
                state.send_if_modified(|s| {
                    applied = s.apply(generation, outcome);
                    applied != Applied::Stale
                });

                match applied {
                    Applied::Refetch(next) => query = next,
                    Applied::Done | Applied::Stale => break,
                }
            }
        }));

        Ok(())
    }

    /// No fetch could be started: settle the view so it is not left loading.
    fn abandon(&self, error: ClientError) -> ClientError {
        app_log!(warn, "listing fetch not started: {}", error);
        self.state.send_modify(|s| {
            s.loading = false;
            s.error = Some(error.to_string());
        });
        error
    }

    fn spawn_organizations(&mut self) -> Result<(), ClientError> {
        let Some(token) = self.session.token()? else {
            return Err(ClientError::NotAuthenticated);
        };
        if let Some(previous) = self.organizations_task.take() {
            previous.abort();
        }

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);

        self.organizations_task = Some(tokio::spawn(async move {
            match api.organizations(&token).await {
                Ok(organizations) => state.send_modify(|s| s.organizations = organizations),
                Err(e) => app_log!(error, "Error fetching organizations: {}", e),
            }
        }));

        Ok(())
    }
}

impl<A: JobBoardApi> Drop for ListingController<A> {
    fn drop(&mut self) {
        for handle in [self.inflight.take(), self.organizations_task.take()]
            .into_iter()
            .flatten()
        {
            handle.abort();
        }
    }
}
