//! Feed Mirror: fetch the Moltbook post feed, pick a handful of posts by
//! the configured ranking strategy, classify and render them as topic
//! cards, and splice the result into the generated region of a front-end
//! source file. The target is read once, both edits (region splice and
//! `Updated:` marker refresh) happen in memory, and a single write puts
//! the file back.

pub mod ranking;
pub mod render;
pub mod splice;
pub mod topics;

pub use ranking::{rank_posts, trending_score, RankingStrategy};
pub use render::render_cards;
pub use splice::{refresh_updated_marker, splice_anchors, splice_markers};
pub use topics::{build_card, classify, Topic};

use chrono::{Local, Utc};
use moltsync_core::{CoreError, TopicCard};
use moltbook_client::MoltbookApiClient;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Delimiter contract for the generated region of the target file.
#[derive(Debug, Clone)]
pub enum SpliceRegion {
    /// Begin/end comment tokens; region replaced inclusively, markers
    /// re-emitted around the fresh content.
    Markers { begin: String, end: String },
    /// Literal structural prefix and suffix; both retained.
    Anchors { prefix: String, suffix: String },
}

#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub target_file: PathBuf,
    pub strategy: RankingStrategy,
    pub limit: usize,
    pub region: SpliceRegion,
}

/// Fetch the feed, absorbing any fetch or parse failure into an empty
/// list; the caller treats empty as "nothing to update".
pub async fn fetch_posts(
    client: &MoltbookApiClient,
    api_key: &str,
) -> Vec<moltbook_client::FeedPost> {
    match client.get_feed(api_key, Some("new")).await {
        Ok(posts) => posts,
        Err(e) => {
            warn!("Feed fetch failed, treating as empty: {}", e);
            Vec::new()
        }
    }
}

/// Apply rendered cards to the target file: read, splice the generated
/// region, refresh the `Updated:` marker, write once. Any error before
/// the write leaves the file untouched.
pub fn apply_to_target(
    target_file: &Path,
    region: &SpliceRegion,
    cards: &[TopicCard],
    stamp: &str,
) -> Result<(), CoreError> {
    let path_label = target_file.display().to_string();
    let text = std::fs::read_to_string(target_file).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CoreError::NotFound {
                resource: path_label.clone(),
            }
        } else {
            CoreError::Io(e)
        }
    })?;

    let block = format!("\n{}\n  ", render_cards(cards));
    let spliced = match region {
        SpliceRegion::Markers { begin, end } => {
            splice_markers(&text, begin, end, &block, &path_label)?
        }
        SpliceRegion::Anchors { prefix, suffix } => {
            splice_anchors(&text, prefix, suffix, &block, &path_label)?
        }
    };
    let refreshed = refresh_updated_marker(&spliced, stamp);

    std::fs::write(target_file, refreshed)?;
    Ok(())
}

/// Run the full mirror. Returns the number of cards written; 0 means the
/// target was deliberately left alone.
pub async fn run(
    client: &MoltbookApiClient,
    api_key: &str,
    config: &MirrorConfig,
) -> Result<usize, CoreError> {
    let posts = fetch_posts(client, api_key).await;
    if posts.is_empty() {
        info!("Feed is empty; nothing to update");
        return Ok(0);
    }

    let ranked = rank_posts(posts, config.strategy, Utc::now(), config.limit);
    let cards: Vec<TopicCard> = ranked.iter().map(build_card).collect();

    let stamp = Local::now().format("%Y-%m-%d %H:%M").to_string();
    apply_to_target(&config.target_file, &config.region, &cards, &stamp)?;

    info!(
        "Wrote {} topics to {}",
        cards.len(),
        config.target_file.display()
    );
    for card in &cards {
        info!("  [{}] {}", card.tag, card.title);
    }
    Ok(cards.len())
}
