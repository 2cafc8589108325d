use dashmap::DashMap;

use super::{ContentFilter, ContentStore, StoreError};
use crate::models::{EngagementEvent, MemberActivity, ScorableItem};

/// DashMap-backed reference store.
///
/// Serves the service binary and tests. Production deployments put a real
/// database behind `ContentStore`; nothing above the trait changes.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: DashMap<String, ScorableItem>,
    members: DashMap<String, MemberActivity>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Counter updates saturate; the snapshot keeps whatever sign results and
/// scoring applies its own floor.
fn apply_event(item: &mut ScorableItem, event: &EngagementEvent) {
    match event {
        EngagementEvent::View => item.view_count = item.view_count.saturating_add(1),
        EngagementEvent::Upvote => item.vote_count = item.vote_count.saturating_add(1),
        EngagementEvent::Downvote => item.vote_count = item.vote_count.saturating_sub(1),
        EngagementEvent::Comment => item.comment_count = item.comment_count.saturating_add(1),
        EngagementEvent::Bookmark => item.bookmark_count = item.bookmark_count.saturating_add(1),
        EngagementEvent::Rating { value } => item.ratings.push(*value),
    }
}

#[async_trait::async_trait]
impl ContentStore for InMemoryStore {
    async fn fetch_items(&self, filter: &ContentFilter) -> Result<Vec<ScorableItem>, StoreError> {
        Ok(self
            .items
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn get_item(&self, id: &str) -> Result<Option<ScorableItem>, StoreError> {
        Ok(self.items.get(id).map(|entry| entry.value().clone()))
    }

    async fn upsert_item(&self, item: ScorableItem) -> Result<(), StoreError> {
        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    async fn record_event(
        &self,
        id: &str,
        event: EngagementEvent,
    ) -> Result<ScorableItem, StoreError> {
        let mut entry = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply_event(entry.value_mut(), &event);
        Ok(entry.value().clone())
    }

    async fn fetch_members(&self) -> Result<Vec<MemberActivity>, StoreError> {
        Ok(self.members.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn upsert_member(&self, member: MemberActivity) -> Result<(), StoreError> {
        self.members.insert(member.member_id.clone(), member);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
