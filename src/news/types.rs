//! Article model and the wire shapes it is decoded from.
//!
//! The upstream API makes no promise about which article fields are
//! populated, so everything except `url` is optional here. Wire records
//! without a `url` are dropped during decoding.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt;
use serde::{Deserialize, Deserializer};

/// Fallback badge when an article has no source name.
pub const DEFAULT_SOURCE_LABEL: &str = "News";

/// A single news article as displayed in the card grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub source_name: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Source badge text, falling back to "News" when absent or blank.
    pub fn source_label(&self) -> &str {
        self.source_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SOURCE_LABEL)
    }

    /// Publication date as "Mon D, YYYY" in the viewer's time zone, or
    /// `None` when unknown.
    pub fn formatted_date(&self) -> Option<String> {
        self.formatted_date_in(&Local)
    }

    /// Publication date as "Mon D, YYYY" in `tz`.
    pub fn formatted_date_in<Tz>(&self, tz: &Tz) -> Option<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.published_at
            .map(|dt| dt.with_timezone(tz).format("%b %-d, %Y").to_string())
    }
}

/// One page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticlesPage {
    pub articles: Vec<Article>,
    /// Total match count reported upstream, when present.
    pub total_results: Option<u64>,
}

impl ArticlesPage {
    /// Decode a success body. A missing or null `articles` key yields an
    /// empty page rather than an error.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let wire: WireResponse = serde_json::from_slice(bytes)?;
        let raw = wire.articles.unwrap_or_default();
        let raw_len = raw.len();

        let articles: Vec<Article> = raw.into_iter().filter_map(WireArticle::into_article).collect();

        if articles.len() != raw_len {
            tracing::debug!(
                dropped = raw_len - articles.len(),
                "Dropped articles without a URL"
            );
        }

        Ok(Self {
            articles,
            total_results: wire.total_results,
        })
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    articles: Option<Vec<WireArticle>>,
    #[serde(default)]
    total_results: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    url_to_image: Option<String>,
    #[serde(default)]
    source: Option<WireSource>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct WireSource {
    #[serde(default)]
    name: Option<String>,
}

impl WireArticle {
    fn into_article(self) -> Option<Article> {
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        Some(Article {
            title: self.title,
            description: self.description,
            url,
            image_url: self.url_to_image.filter(|u| !u.trim().is_empty()),
            source_name: self.source.and_then(|s| s.name),
            published_at: self.published_at,
        })
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Accept any JSON value for a timestamp; anything that is not an RFC 3339
/// string becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok(),
        _ => None,
    })
}
