use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two kinds of rankable content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Resource,
    Post,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Resource => "resource",
            ContentKind::Post => "post",
        }
    }
}

/// A counter snapshot for one piece of content, as synced in by the
/// content collaborators. Counters may arrive negative or stale; scoring
/// coerces them, the model stores what the wire said.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScorableItem {
    pub id: String,
    pub kind: ContentKind,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub bookmark_count: i64,
    #[serde(default)]
    pub ratings: Vec<f64>,
    pub created_at: DateTime<Utc>,
}

/// An item paired with its computed score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub item: T,
    pub score: f64,
}

pub type ScoredItem = Scored<ScorableItem>;

/// Activity counters for one member, the leaderboard input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberActivity {
    pub member_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub posts_created: i64,
    #[serde(default)]
    pub comments_written: i64,
    #[serde(default)]
    pub votes_received: i64,
    #[serde(default)]
    pub bookmarks_received: i64,
    pub joined_at: DateTime<Utc>,
}

/// A single engagement event against one item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngagementEvent {
    View,
    Upvote,
    Downvote,
    Comment,
    Bookmark,
    Rating { value: f64 },
}

impl EngagementEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementEvent::View => "view",
            EngagementEvent::Upvote => "upvote",
            EngagementEvent::Downvote => "downvote",
            EngagementEvent::Comment => "comment",
            EngagementEvent::Bookmark => "bookmark",
            EngagementEvent::Rating { .. } => "rating",
        }
    }
}
