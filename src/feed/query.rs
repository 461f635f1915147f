//! Query state and the outbound request it maps to.
//!
//! A non-empty search term always selects the free-text search endpoint;
//! otherwise the category selects the top-headlines endpoint. The headlines
//! branch never carries a sort parameter because the upstream API does not
//! accept one there.

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Language filter sent with every request.
pub const LANGUAGE: &str = "en";

/// Fixed page size; there is no pagination.
pub const PAGE_SIZE: u32 = 20;

/// Error returned when a category or sort name cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseQueryError {
    #[error("Unknown category '{0}' (expected one of: general, business, entertainment, health, science, sports, technology)")]
    UnknownCategory(String),
    #[error("Unknown sort order '{0}' (expected one of: latest, relevance, popularity)")]
    UnknownSortOrder(String),
}

// ============================================================================
// Category
// ============================================================================

/// Headline categories supported by the top-headlines endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// Wire value for the `category` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Science => "science",
            Self::Sports => "sports",
            Self::Technology => "technology",
        }
    }

    /// Capitalized name for tabs and headings.
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Business => "Business",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Science => "Science",
            Self::Sports => "Sports",
            Self::Technology => "Technology",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Category at `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Next category, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous category, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| ParseQueryError::UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// Sort Order
// ============================================================================

/// Result ordering for free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Latest,
    Relevance,
    Popularity,
}

impl SortOrder {
    /// All sort orders in selector order.
    pub const ALL: [SortOrder; 3] = [Self::Latest, Self::Relevance, Self::Popularity];

    /// Wire value for the `sortBy` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Latest => "publishedAt",
            Self::Relevance => "relevancy",
            Self::Popularity => "popularity",
        }
    }

    /// Label shown in the sort selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Latest => "Latest",
            Self::Relevance => "Most Relevant",
            Self::Popularity => "Trending",
        }
    }

    /// Cycle Latest → Most Relevant → Trending → Latest.
    pub fn next(self) -> Self {
        match self {
            Self::Latest => Self::Relevance,
            Self::Relevance => Self::Popularity,
            Self::Popularity => Self::Latest,
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" | "publishedat" => Ok(Self::Latest),
            "relevance" | "relevancy" => Ok(Self::Relevance),
            "popularity" | "trending" => Ok(Self::Popularity),
            _ => Err(ParseQueryError::UnknownSortOrder(s.to_string())),
        }
    }
}

/// Config values go through `FromStr` so they accept the same spellings as
/// the command line.
fn deserialize_via_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = ParseQueryError>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_via_from_str(deserializer)
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_via_from_str(deserializer)
    }
}

// ============================================================================
// Query State
// ============================================================================

/// The selections that decide what gets fetched.
///
/// Both `search_term` and `category` persist even though only one of them
/// drives a given request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_term: String,
    pub category: Category,
    pub sort_order: SortOrder,
}

impl QueryState {
    pub const DEFAULT_SEARCH_TERM: &'static str = "technology";

    /// True when a free-text term is set and search mode applies.
    pub fn is_search(&self) -> bool {
        !self.search_term.is_empty()
    }

    /// Build the request this state maps to.
    pub fn to_request(&self) -> NewsRequest {
        if self.is_search() {
            NewsRequest::Search {
                q: self.search_term.clone(),
                sort_by: self.sort_order,
            }
        } else {
            NewsRequest::Headlines {
                category: self.category,
            }
        }
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: Self::DEFAULT_SEARCH_TERM.to_string(),
            category: Category::General,
            sort_order: SortOrder::Latest,
        }
    }
}

// ============================================================================
// News Request
// ============================================================================

/// Which endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Search,
    Headlines,
}

/// One outbound query, minus the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsRequest {
    Search { q: String, sort_by: SortOrder },
    Headlines { category: Category },
}

impl NewsRequest {
    pub fn mode(&self) -> RequestMode {
        match self {
            Self::Search { .. } => RequestMode::Search,
            Self::Headlines { .. } => RequestMode::Headlines,
        }
    }

    /// Endpoint path relative to the API base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Search { .. } => "v2/everything",
            Self::Headlines { .. } => "v2/top-headlines",
        }
    }

    /// Query parameters in wire order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = match self {
            Self::Search { q, sort_by } => vec![
                ("q", q.clone()),
                ("sortBy", sort_by.as_param().to_string()),
            ],
            Self::Headlines { category } => vec![("category", category.as_str().to_string())],
        };
        pairs.push(("language", LANGUAGE.to_string()));
        pairs.push(("pageSize", PAGE_SIZE.to_string()));
        pairs
    }
}

// ============================================================================
// Tests
// ============================================================================
