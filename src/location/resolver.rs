//! Name resolution against the catalog.
//!
//! Rules, first hit wins:
//!   1. exact alias (case-sensitive)
//!   2. exact canonical key
//!   3. case-insensitive substring in either direction. Localized aliases are
//!      scanned first across the whole catalog, then regional aliases, then
//!      keys, each tier in catalog order
//!
//! Rule 3 can be ambiguous when two aliases both match. The fixed scan order
//! keeps the outcome reproducible; it is not a geocoder.

use super::catalog::{AliasTier, Catalog};
use super::types::{LocationError, LocationKey, MatchRule, Resolution};
use tracing::{debug, warn};

impl Catalog {
    /// Resolve free text to a catalog record, reporting the matching rule.
    pub fn resolve_with_rule(&self, query: &str) -> Result<Resolution<'_>, LocationError> {
        match self.match_query(query) {
            Some((index, rule)) => {
                let record = self.record_at(index);
                debug!(query, key = %record.key, %rule, "resolved location");
                Ok(Resolution { record, rule })
            }
            None => {
                warn!(query, "cannot resolve location name");
                Err(LocationError::Unresolved(query.to_string()))
            }
        }
    }

    /// Resolve free text to its canonical key.
    pub fn resolve(&self, query: &str) -> Result<LocationKey, LocationError> {
        self.resolve_with_rule(query).map(|r| r.record.key.clone())
    }

    fn match_query(&self, query: &str) -> Option<(usize, MatchRule)> {
        if let Some(entry) = self
            .aliases
            .iter()
            .find(|e| e.tier != AliasTier::Canonical && e.alias == query)
        {
            return Some((entry.index, MatchRule::ExactAlias));
        }

        if let Some(&index) = self.by_key.get(query) {
            return Some((index, MatchRule::ExactKey));
        }

        let normalized = normalize(query);
        // An empty needle is a substring of every alias.
        if normalized.is_empty() {
            return None;
        }
        self.aliases
            .iter()
            .find(|e| normalized.contains(&e.lowered) || e.lowered.contains(&normalized))
            .map(|e| (e.index, MatchRule::Substring))
    }
}

fn normalize(q: &str) -> String {
    q.trim().to_lowercase()
}
