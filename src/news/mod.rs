//! News API access: the HTTP client and the article model it decodes into.

mod client;
mod types;

pub use client::{ErrorKind, NewsClient, NewsError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use types::{Article, ArticlesPage, DEFAULT_SOURCE_LABEL};
