//! Catalog controller: criteria, search, hydration.
//!
//! Criteria edits are applied synchronously and hand back a [`SearchTicket`].
//! The caller runs [`CatalogController::fetch`] for that ticket, usually
//! through [`CatalogController::fetch_detached`]. Tickets carry a sequence number and only the most recently
//! issued ticket may change what is displayed, so a slow response to an older
//! search can never overwrite a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use pawfinder_core::PawError;
use pawfinder_core::dog::{Breed, Dog, DogApi};
use pawfinder_core::pagination::{PageItem, Pagination};
use pawfinder_core::search::{CriteriaAction, PAGE_SIZE, SearchCriteria};
use pawfinder_core::session::SessionHandle;
use tokio::sync::Mutex;

pub const BREEDS_ERROR: &str = "Failed to load breeds. Please try again.";
pub const DOGS_ERROR: &str = "Failed to load dogs. Please try again.";

/// Loading/error flags for one family of requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchState {
    pub loading: bool,
    pub error: Option<String>,
}

impl FetchState {
    fn start(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn succeed(&mut self) {
        self.loading = false;
        self.error = None;
    }

    fn fail(&mut self, message: &str) {
        self.loading = false;
        self.error = Some(message.to_string());
    }
}

/// Everything the catalog view needs, copied out under the lock.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub criteria: SearchCriteria,
    pub breeds: Vec<Breed>,
    pub dogs: Vec<Dog>,
    pub total: usize,
    pub next: Option<String>,
    pub prev: Option<String>,
    pub breeds_state: FetchState,
    pub dogs_state: FetchState,
}

impl CatalogSnapshot {
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(PAGE_SIZE)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.criteria.page, self.total_pages())
    }
}

/// A search that has been issued but not yet fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    criteria: SearchCriteria,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }
}

/// What happened to a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The results are now on display.
    Applied { shown: usize, total: usize },
    /// A newer ticket was issued meanwhile; this result was dropped.
    Superseded,
    /// The request failed; the message is already recorded in `dogs_state`.
    Failed(String),
}

pub struct CatalogController {
    api: Arc<dyn DogApi>,
    state: Mutex<CatalogSnapshot>,
    latest: AtomicU64,
}

impl CatalogController {
    pub fn new(api: Arc<dyn DogApi>) -> Self {
        Self {
            api,
            state: Mutex::new(CatalogSnapshot::default()),
            latest: AtomicU64::new(0),
        }
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.state.lock().await.clone()
    }

    pub async fn criteria(&self) -> SearchCriteria {
        self.state.lock().await.criteria.clone()
    }

    /// Applies one edit and issues a ticket for the resulting search.
    ///
    /// Returns `None` when the edit changes nothing, including paging past
    /// either end.
    pub async fn dispatch(&self, action: CriteriaAction) -> Option<SearchTicket> {
        let mut state = self.state.lock().await;
        let pagination = state.pagination();

        let allowed = match &action {
            CriteriaAction::NextPage => pagination.next_enabled,
            CriteriaAction::PrevPage => pagination.prev_enabled,
            // Until a total is known only the first page exists.
            CriteriaAction::GoToPage(page) if pagination.total_pages == 0 => *page == 0,
            CriteriaAction::GoToPage(page) => pagination.select(PageItem::Page(*page)).is_some(),
            _ => true,
        };
        if !allowed {
            tracing::debug!(?action, "page navigation out of range");
            return None;
        }

        let next = state.criteria.apply(action);
        if next == state.criteria {
            return None;
        }
        state.criteria = next;
        Some(self.issue(&mut state))
    }

    /// Issues a ticket for the current criteria, e.g. after a failure.
    pub async fn refresh(&self) -> SearchTicket {
        let mut state = self.state.lock().await;
        self.issue(&mut state)
    }

    fn issue(&self, state: &mut CatalogSnapshot) -> SearchTicket {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        state.dogs_state.start();
        tracing::debug!(seq, criteria = ?state.criteria, "search issued");
        SearchTicket {
            seq,
            criteria: state.criteria.clone(),
        }
    }

    fn is_latest(&self, ticket: &SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.seq
    }

    /// Runs search and hydration for `ticket`.
    pub async fn fetch(&self, session: &SessionHandle, ticket: &SearchTicket) -> FetchOutcome {
        let page = match self.api.search(session, &ticket.criteria).await {
            Ok(page) => page,
            Err(e) => return self.fail(ticket, "search", e).await,
        };

        let dogs = match self.api.dogs(session, &page.result_ids).await {
            Ok(dogs) => dogs,
            Err(e) => return self.fail(ticket, "hydration", e).await,
        };

        let mut state = self.state.lock().await;
        if !self.is_latest(ticket) {
            tracing::debug!(seq = ticket.seq, "stale search result dropped");
            return FetchOutcome::Superseded;
        }

        let shown = dogs.len();
        state.dogs = dogs;
        state.total = page.total;
        state.next = page.next;
        state.prev = page.prev;
        state.dogs_state.succeed();
        tracing::info!(seq = ticket.seq, shown, total = page.total, "search applied");

        FetchOutcome::Applied {
            shown,
            total: page.total,
        }
    }

    /// Runs [`fetch`](Self::fetch) on its own task.
    ///
    /// A task that panics or is cancelled is recorded like any other failed
    /// search, so the loading flag never sticks.
    pub async fn fetch_detached(
        self: &Arc<Self>,
        session: SessionHandle,
        ticket: SearchTicket,
    ) -> FetchOutcome {
        let task = {
            let catalog = Arc::clone(self);
            let ticket = ticket.clone();
            tokio::spawn(async move { catalog.fetch(&session, &ticket).await })
        };

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                let error = PawError::internal(format!("search task failed: {}", e));
                self.fail(&ticket, "task", error).await
            }
        }
    }

    async fn fail(&self, ticket: &SearchTicket, stage: &str, e: PawError) -> FetchOutcome {
        let mut state = self.state.lock().await;
        if !self.is_latest(ticket) {
            tracing::debug!(seq = ticket.seq, stage, error = %e, "stale search failed");
            return FetchOutcome::Superseded;
        }
        tracing::error!(seq = ticket.seq, stage, error = %e, details = ?e, "failed to load dogs");
        state.dogs_state.fail(DOGS_ERROR);
        FetchOutcome::Failed(DOGS_ERROR.to_string())
    }

    /// Fetches the breed list for the filter.
    pub async fn load_breeds(&self, session: &SessionHandle) -> Result<usize, String> {
        self.state.lock().await.breeds_state.start();

        let result = self.api.breeds(session).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(breeds) => {
                let count = breeds.len();
                state.breeds = breeds;
                state.breeds_state.succeed();
                tracing::debug!(count, "breeds loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, details = ?e, "failed to load breeds");
                state.breeds_state.fail(BREEDS_ERROR);
                Err(BREEDS_ERROR.to_string())
            }
        }
    }

    /// Forgets everything and invalidates in-flight tickets.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        self.latest.fetch_add(1, Ordering::SeqCst);
        *state = CatalogSnapshot::default();
    }
}
