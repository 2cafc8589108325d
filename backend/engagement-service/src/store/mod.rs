use thiserror::Error;

use crate::models::{EngagementEvent, MemberActivity, ScorableItem};

pub mod filter;
pub mod memory;

pub use filter::ContentFilter;
pub use memory::InMemoryStore;

/// Errors from the content store boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("item not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The boundary between the ranking service and whatever owns the counters.
///
/// Implementations translate `ContentFilter` into their own query language
/// exactly once; the bundled in-memory store evaluates it as a predicate,
/// a SQL-backed store would render WHERE clauses.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch every item matching the filter.
    async fn fetch_items(&self, filter: &ContentFilter) -> Result<Vec<ScorableItem>, StoreError>;

    /// Fetch a single item by id.
    async fn get_item(&self, id: &str) -> Result<Option<ScorableItem>, StoreError>;

    /// Insert or replace a counter snapshot.
    async fn upsert_item(&self, item: ScorableItem) -> Result<(), StoreError>;

    /// Apply one engagement event to an existing item and return the updated
    /// snapshot. Unknown ids are `NotFound`.
    async fn record_event(
        &self,
        id: &str,
        event: EngagementEvent,
    ) -> Result<ScorableItem, StoreError>;

    /// Fetch every member activity row.
    async fn fetch_members(&self) -> Result<Vec<MemberActivity>, StoreError>;

    /// Insert or replace a member activity row.
    async fn upsert_member(&self, member: MemberActivity) -> Result<(), StoreError>;

    /// Dependency health probe.
    async fn ping(&self) -> Result<(), StoreError>;
}
