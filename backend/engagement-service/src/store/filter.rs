use chrono::{DateTime, Utc};

use crate::models::{ContentKind, ScorableItem};

/// A typed filter set for store queries.
///
/// Conditions combine with AND and both time bounds are inclusive. Building
/// the set is backend-independent; each store decides how to execute it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentFilter {
    kind: Option<ContentKind>,
    created_after: Option<DateTime<Utc>>,
    created_before: Option<DateTime<Utc>>,
}

impl ContentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_created_after(mut self, cutoff: DateTime<Utc>) -> Self {
        self.created_after = Some(cutoff);
        self
    }

    pub fn with_created_before(mut self, cutoff: DateTime<Utc>) -> Self {
        self.created_before = Some(cutoff);
        self
    }

    pub fn kind(&self) -> Option<ContentKind> {
        self.kind
    }

    pub fn created_after(&self) -> Option<DateTime<Utc>> {
        self.created_after
    }

    pub fn created_before(&self) -> Option<DateTime<Utc>> {
        self.created_before
    }

    /// Whether `item` satisfies every condition.
    pub fn matches(&self, item: &ScorableItem) -> bool {
        if let Some(kind) = self.kind {
            if item.kind != kind {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if item.created_at < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if item.created_at > before {
                return false;
            }
        }
        true
    }
}
