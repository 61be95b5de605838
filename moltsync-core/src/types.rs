use serde::{Deserialize, Serialize};

/// Public profile metrics for the tracked agent, merged into the
/// persisted stats document under the `moltbook` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub karma: i64,
    pub followers: i64,
    pub following: i64,
    pub posts: i64,
    pub comments: i64,
    pub profile_url: Option<String>,
}

/// Render-ready topic card derived from a feed post. Free-text fields
/// are already escaped for the target file's string syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCard {
    pub tag: String,
    pub tag_color: String,
    pub author: String,
    pub title: String,
    pub description: String,
    pub votes: String,
    pub comments: i64,
    pub post_id: String,
}
