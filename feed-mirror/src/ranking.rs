use chrono::{DateTime, Utc};
use moltbook_client::FeedPost;
use std::cmp::Ordering;

/// How the mirrored subset is chosen from the feed. Two historical
/// behaviors exist; both stay selectable rather than hard-wiring one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingStrategy {
    /// Recency-weighted engagement score, highest first.
    Trending,
    /// Keep the feed's order as given.
    FeedOrder,
}

/// `(upvotes + 2 × comments) / hours since posted`, with the age clamped
/// to at least half an hour so very fresh posts don't divide by ~zero.
/// Posts without a parseable creation timestamp score 0.
pub fn trending_score(post: &FeedPost, now: DateTime<Utc>) -> f64 {
    let created = match post
        .created_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    {
        Some(created) => created.with_timezone(&Utc),
        None => return 0.0,
    };

    let hours = (now - created).num_seconds() as f64 / 3600.0;
    let engagement = (post.upvotes + 2 * post.comment_count) as f64;
    engagement / hours.max(0.5)
}

/// Order the feed by the chosen strategy and keep at most `limit` posts.
/// The sort is stable, so ties keep their original feed order.
pub fn rank_posts(
    mut posts: Vec<FeedPost>,
    strategy: RankingStrategy,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<FeedPost> {
    if strategy == RankingStrategy::Trending {
        posts.sort_by(|a, b| {
            trending_score(b, now)
                .partial_cmp(&trending_score(a, now))
                .unwrap_or(Ordering::Equal)
        });
    }
    posts.truncate(limit);
    posts
}
