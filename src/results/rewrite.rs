//! Provider-level link rewriting
//!
//! A rule has the form `link|<pattern>|<replacement>`. The pattern is a
//! regular expression matched against each result's link; the replacement
//! may use `$1`-style group references. After rewriting, the result's title
//! is set to the new link.

use super::types::SearchResult;
use crate::error::SearchError;
use regex::Regex;

/// A parsed rewrite rule
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    /// Parse a `link|<pattern>|<replacement>` rule
    pub fn parse(rule: &str) -> Result<Self, SearchError> {
        let invalid = |message: String| SearchError::Rewrite {
            rule: rule.to_string(),
            message,
        };

        let mut parts = rule.splitn(3, '|');
        let field = parts.next().unwrap_or_default();
        let (pattern, replacement) = match (parts.next(), parts.next()) {
            (Some(pattern), Some(replacement)) => (pattern, replacement),
            _ => {
                return Err(invalid(
                    "expected link|<pattern>|<replacement>".to_string(),
                ))
            }
        };

        if field != "link" {
            return Err(invalid(format!("unsupported field {:?}", field)));
        }
        if pattern.is_empty() {
            return Err(invalid("empty pattern".to_string()));
        }

        let pattern = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
        })
    }

    /// Rewrite a single link
    pub fn rewrite_link(&self, link: &str) -> String {
        self.pattern
            .replace_all(link, self.replacement.as_str())
            .into_owned()
    }

    /// Rewrite every result's link and copy it into the title
    pub fn apply(&self, results: &mut [SearchResult]) {
        for result in results.iter_mut() {
            result.link = self.rewrite_link(&result.link);
            result.title = result.link.clone();
        }
    }
}
