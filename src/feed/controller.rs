//! Feed controller: owns the query state and the displayed result set.
//!
//! The controller never performs I/O. Each state change that needs a fetch
//! returns a [`PendingQuery`]; the caller runs the request and hands the
//! outcome back through [`FeedController::complete`]. Every pending query
//! carries a sequence number so that a response older than one that has
//! already settled can be discarded instead of overwriting newer results.

use crate::feed::query::{Category, NewsRequest, QueryState, SortOrder};
use crate::news::{Article, ArticlesPage, ErrorKind, NewsError};

/// Why a query was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    InitialLoad,
    CategoryChanged,
    SortChanged,
    SearchSubmitted,
    /// Manual re-run of the current query.
    Refresh,
}

/// Busy indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
}

/// A request the caller must run, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub seq: u64,
    pub trigger: Trigger,
    pub request: NewsRequest,
}

/// What [`FeedController::complete`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Results replaced; holds the new article count.
    Applied(usize),
    /// Request failed; results left as they were.
    Failed(ErrorKind),
    /// Response was older than what is already displayed and was dropped.
    Stale,
}

#[derive(Debug)]
pub struct FeedController {
    state: QueryState,
    results: Vec<Article>,
    total_results: Option<u64>,
    /// Sequence number of the most recently issued query.
    issued_seq: u64,
    /// Newest query that has settled, by any outcome (0 = none).
    /// A success at or below it is stale.
    settled_seq: u64,
    busy: bool,
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new(QueryState::default())
    }
}

impl FeedController {
    pub fn new(state: QueryState) -> Self {
        Self {
            state,
            results: Vec::new(),
            total_results: None,
            issued_seq: 0,
            settled_seq: 0,
            busy: false,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn search_term(&self) -> &str {
        &self.state.search_term
    }

    pub fn category(&self) -> Category {
        self.state.category
    }

    pub fn sort_order(&self) -> SortOrder {
        self.state.sort_order
    }

    pub fn results(&self) -> &[Article] {
        &self.results
    }

    pub fn total_results(&self) -> Option<u64> {
        self.total_results
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn load_state(&self) -> LoadState {
        if self.busy {
            LoadState::Loading
        } else {
            LoadState::Idle
        }
    }

    /// Sequence number of the last issued query.
    pub fn latest_seq(&self) -> u64 {
        self.issued_seq
    }

    /// Mark busy and build the request for the current state.
    ///
    /// Does not cancel anything already in flight.
    pub fn submit_query(&mut self, trigger: Trigger) -> PendingQuery {
        self.issued_seq = self.issued_seq.wrapping_add(1);
        self.busy = true;

        let request = self.state.to_request();
        tracing::debug!(
            seq = self.issued_seq,
            ?trigger,
            mode = ?request.mode(),
            "Submitting news query"
        );

        PendingQuery {
            seq: self.issued_seq,
            trigger,
            request,
        }
    }

    /// Switch category, clearing any search term, and refetch.
    pub fn set_category(&mut self, category: Category) -> PendingQuery {
        self.state.category = category;
        self.state.search_term.clear();
        self.submit_query(Trigger::CategoryChanged)
    }

    /// Change sort order and refetch, even in headlines mode where the
    /// order has no effect on the request.
    pub fn set_sort_order(&mut self, order: SortOrder) -> PendingQuery {
        self.state.sort_order = order;
        self.submit_query(Trigger::SortChanged)
    }

    /// Update the search term without fetching.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
    }

    /// Run the current search term.
    pub fn submit_search(&mut self) -> PendingQuery {
        self.submit_query(Trigger::SearchSubmitted)
    }

    /// Apply the outcome of query `seq`.
    ///
    /// The busy flag clears once the most recently issued query settles.
    /// A success replaces the results only when `seq` is newer than every
    /// query that has already settled, so a late reply never overrides a
    /// newer failure.
    pub fn complete(&mut self, seq: u64, result: Result<ArticlesPage, NewsError>) -> Completion {
        if seq == self.issued_seq {
            self.busy = false;
        }

        match result {
            Ok(page) => {
                if seq <= self.settled_seq {
                    tracing::debug!(
                        seq,
                        settled = self.settled_seq,
                        "Ignoring stale news response"
                    );
                    return Completion::Stale;
                }
                let count = page.articles.len();
                self.results = page.articles;
                self.total_results = page.total_results;
                self.settled_seq = seq;
                tracing::debug!(seq, count, "Applied news results");
                Completion::Applied(count)
            }
            Err(e) => {
                self.settled_seq = self.settled_seq.max(seq);
                let kind = e.kind();
                if seq < self.issued_seq {
                    tracing::debug!(seq, error = %e, "Superseded news query failed");
                } else {
                    tracing::warn!(seq, ?kind, error = %e, "News query failed");
                }
                Completion::Failed(kind)
            }
        }
    }

    /// Settle query `seq` without a result (its task died before replying).
    pub fn abandon(&mut self, seq: u64) {
        if seq == self.issued_seq {
            self.busy = false;
        }
        self.settled_seq = self.settled_seq.max(seq);
        tracing::warn!(seq, "News query abandoned");
    }
}
