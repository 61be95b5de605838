//! Stats Sync: fetch the agent's public Moltbook metrics and merge them
//! into the persisted stats document under its `moltbook` key.
//!
//! The document is read, transformed in memory, and written back with a
//! single write; a failure anywhere before the write leaves the file on
//! disk untouched.

pub mod validate;

pub use validate::{validate_document, ValidationReport};

use chrono::Local;
use moltsync_core::{int_from_aliases, string_from_aliases, AgentMetrics, CoreError};
use moltbook_client::MoltbookApiClient;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

const PROFILE_HOST: &str = "https://www.moltbook.com";

const KARMA_ALIASES: &[&str] = &["karma"];
const FOLLOWERS_ALIASES: &[&str] = &["followers", "follower_count"];
const FOLLOWING_ALIASES: &[&str] = &["following", "following_count"];
const POSTS_ALIASES: &[&str] = &["posts_count", "posts"];
const COMMENTS_ALIASES: &[&str] = &["comments_count", "comments"];

// Handle fields tried when the payload carries no explicit profile URL.
const HANDLE_ALIASES: &[&str] = &["name", "display_name"];

pub fn load_document(path: &Path) -> Result<Value, CoreError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CoreError::NotFound {
                resource: path.display().to_string(),
            }
        } else {
            CoreError::Io(e)
        }
    })?;
    let document: Value = serde_json::from_str(&raw)?;
    Ok(document)
}

/// Pretty-printed with 2-space indentation and a trailing newline;
/// non-ASCII characters are left unescaped.
pub fn write_document(path: &Path, document: &Value) -> Result<(), CoreError> {
    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    std::fs::write(path, rendered)?;
    Ok(())
}

/// Merge the agent profile payload into the document's `moltbook`
/// sub-object. Each metric tries its alias keys in priority order and
/// falls back to the previously persisted value (default 0) when the
/// payload carries nothing usable. Sibling keys of `moltbook` and unknown
/// keys inside it are left alone.
pub fn merge_profile(document: &mut Value, agent: &Value) -> Result<AgentMetrics, CoreError> {
    let root = document
        .as_object_mut()
        .ok_or_else(|| CoreError::InvalidInput {
            message: "stats document root must be a JSON object".to_string(),
        })?;

    let empty = Map::new();
    let agent_map = agent.as_object().unwrap_or(&empty);

    if !root.get("moltbook").map_or(false, Value::is_object) {
        root.insert("moltbook".to_string(), Value::Object(Map::new()));
    }
    let moltbook = root
        .get_mut("moltbook")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| CoreError::Internal {
            message: "moltbook sub-object missing after insert".to_string(),
        })?;

    let merge_field = |moltbook: &Map<String, Value>, field: &str, aliases: &[&str]| {
        let previous = int_from_aliases(moltbook, &[field], 0);
        int_from_aliases(agent_map, aliases, previous)
    };

    let metrics = AgentMetrics {
        karma: merge_field(moltbook, "karma", KARMA_ALIASES),
        followers: merge_field(moltbook, "followers", FOLLOWERS_ALIASES),
        following: merge_field(moltbook, "following", FOLLOWING_ALIASES),
        posts: merge_field(moltbook, "posts", POSTS_ALIASES),
        comments: merge_field(moltbook, "comments", COMMENTS_ALIASES),
        profile_url: resolve_profile_url(agent_map),
    };

    moltbook.insert("karma".to_string(), metrics.karma.into());
    moltbook.insert("followers".to_string(), metrics.followers.into());
    moltbook.insert("following".to_string(), metrics.following.into());
    moltbook.insert("posts".to_string(), metrics.posts.into());
    moltbook.insert("comments".to_string(), metrics.comments.into());

    // Never overwrite a previously persisted URL with nothing.
    if let Some(url) = &metrics.profile_url {
        moltbook.insert("profile_url".to_string(), Value::String(url.clone()));
    }

    Ok(metrics)
}

fn resolve_profile_url(agent: &Map<String, Value>) -> Option<String> {
    if let Some(url) = string_from_aliases(agent, &["profile_url"]) {
        return Some(url);
    }
    string_from_aliases(agent, HANDLE_ALIASES).map(|handle| format!("{}/u/{}", PROFILE_HOST, handle))
}

/// Rewrite `last_updated` to the current local time. Runs on every sync,
/// even when no metric changed.
pub fn touch_last_updated(document: &mut Value) {
    set_last_updated(document, Local::now().format("%Y-%m-%dT%H:%M:%S%z").to_string());
}

fn set_last_updated(document: &mut Value, stamp: String) {
    if let Some(root) = document.as_object_mut() {
        root.insert("last_updated".to_string(), Value::String(stamp));
    }
}

/// Run the full sync: fetch, merge, stamp, write once.
pub async fn run(
    client: &MoltbookApiClient,
    api_key: &str,
    data_file: &Path,
) -> Result<AgentMetrics, CoreError> {
    let agent = client.get_agent_profile(api_key).await?;
    debug!("Agent payload keys: {:?}", agent.as_object().map(|m| m.len()));

    let mut document = load_document(data_file)?;
    let metrics = merge_profile(&mut document, &agent)?;
    touch_last_updated(&mut document);
    write_document(data_file, &document)?;

    info!("Updated Moltbook stats in {}", data_file.display());
    info!(
        "karma={} followers={} following={} posts={} comments={}",
        metrics.karma, metrics.followers, metrics.following, metrics.posts, metrics.comments
    );
    Ok(metrics)
}
