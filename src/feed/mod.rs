//! Query state and the feed controller that reconciles it with results.
//!
//! - [`query`] - categories, sort orders, and the request a state maps to
//! - [`controller`] - the owned controller state machine (Idle/Loading)
//!
//! # Example
//!
//! ```
//! use newsflow::feed::{Category, FeedController, NewsRequest};
//!
//! let mut controller = FeedController::default();
//! let pending = controller.set_category(Category::Sports);
//! assert_eq!(controller.search_term(), "");
//! assert_eq!(pending.request, NewsRequest::Headlines { category: Category::Sports });
//! ```

mod controller;
mod query;

pub use controller::{Completion, FeedController, LoadState, PendingQuery, Trigger};
pub use query::{
    Category, NewsRequest, ParseQueryError, QueryState, RequestMode, SortOrder, LANGUAGE,
    PAGE_SIZE,
};
