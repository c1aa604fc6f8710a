//! Result type definitions

use crate::error::SearchError;
use crate::providers::RawEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single normalized search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The URL of the result
    pub link: String,
    /// The title of the result
    pub title: String,
    /// Content snippet/description
    #[serde(default)]
    pub description: String,
    /// Date of the underlying item, if the provider knows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Title of the provider that returned this result
    pub from: String,
}

impl SearchResult {
    /// Create a new result
    pub fn new(link: impl Into<String>, title: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            title: title.into(),
            description: String::new(),
            date: None,
            from: from.into(),
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Normalize a raw provider entry
    ///
    /// `index` is the entry's position in the provider's list and only used
    /// for error reporting.
    pub fn from_raw(
        raw: RawEntry,
        index: usize,
        provider: &str,
        from: &str,
    ) -> Result<Self, SearchError> {
        let malformed = |field| SearchError::MalformedResult {
            provider: provider.to_string(),
            index,
            field,
        };

        let link = raw.link.filter(|l| !l.is_empty()).ok_or_else(|| malformed("link"))?;
        let title = raw.title.filter(|t| !t.is_empty()).ok_or_else(|| malformed("title"))?;

        Ok(Self {
            link,
            title,
            description: raw.description.unwrap_or_default(),
            date: raw.date,
            from: from.to_string(),
        })
    }

    /// Date formatted as `YYYY-MM-DD`
    pub fn short_date(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }
}
