use clap::{Parser, Subcommand, ValueEnum};
use feed_mirror::{MirrorConfig, RankingStrategy, SpliceRegion};
use moltbook_client::MoltbookApiClient;
use moltsync_core::CoreError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const API_KEY_ENV: &str = "MOLTBOOK_API_KEY";

#[derive(Parser)]
#[command(name = "moltsync")]
#[command(version)]
#[command(about = "Sync Moltbook agent stats and mirror feed topics into the site sources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the agent's Moltbook metrics into the stats document
    Stats {
        /// Persisted stats document
        #[arg(long, default_value = "public/data/andy-updates.json")]
        data_file: PathBuf,
    },

    /// Splice ranked feed topics into the landing page source
    Feed {
        /// Target source file holding the generated region
        #[arg(long, default_value = "src/pages/Index.tsx")]
        target_file: PathBuf,

        /// How the mirrored posts are chosen
        #[arg(long, value_enum, default_value = "trending")]
        ranking: Ranking,

        /// Maximum number of topic cards
        #[arg(long, default_value = "4")]
        limit: usize,

        /// Begin marker comment token; selects marker-based splicing
        #[arg(long, requires = "end_marker")]
        begin_marker: Option<String>,

        /// End marker comment token
        #[arg(long, requires = "begin_marker")]
        end_marker: Option<String>,

        /// Structural prefix anchor (ignored when markers are given)
        #[arg(long, default_value = "const hotTopics = [")]
        prefix: String,

        /// Structural suffix anchor
        #[arg(long, default_value = "];")]
        suffix: String,
    },

    /// Check the stats document against the schema the front end expects
    Validate {
        /// Persisted stats document
        #[arg(long, default_value = "public/data/andy-updates.json")]
        data_file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Ranking {
    Trending,
    FeedOrder,
}

impl From<Ranking> for RankingStrategy {
    fn from(ranking: Ranking) -> Self {
        match ranking {
            Ranking::Trending => RankingStrategy::Trending,
            Ranking::FeedOrder => RankingStrategy::FeedOrder,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("moltsync=info,stats_sync=info,feed_mirror=info,moltbook_client=info")
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Stats { data_file } => {
            let Some(api_key) = api_key_from_env() else {
                return ExitCode::SUCCESS;
            };
            let client = MoltbookApiClient::new();
            stats_sync::run(&client, &api_key, &data_file)
                .await
                .map(|_| ())
        }
        Commands::Feed {
            target_file,
            ranking,
            limit,
            begin_marker,
            end_marker,
            prefix,
            suffix,
        } => {
            let Some(api_key) = api_key_from_env() else {
                return ExitCode::SUCCESS;
            };
            let region = match (begin_marker, end_marker) {
                (Some(begin), Some(end)) => SpliceRegion::Markers { begin, end },
                _ => SpliceRegion::Anchors { prefix, suffix },
            };
            let config = MirrorConfig {
                target_file,
                strategy: ranking.into(),
                limit,
                region,
            };
            let client = MoltbookApiClient::new();
            feed_mirror::run(&client, &api_key, &config)
                .await
                .map(|_| ())
        }
        Commands::Validate { data_file } => validate_stats_document(&data_file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// A missing credential means "nothing to do", not a failure; some
/// environments deliberately run without one.
fn api_key_from_env() -> Option<String> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Some(key),
        _ => {
            tracing::info!("{} is missing; skipping", API_KEY_ENV);
            None
        }
    }
}

fn validate_stats_document(data_file: &Path) -> Result<(), CoreError> {
    let document = stats_sync::load_document(data_file)?;
    let report = stats_sync::validate_document(&document);

    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    if !report.is_valid() {
        for error in &report.errors {
            tracing::error!("{}", error);
        }
        return Err(CoreError::InvalidInput {
            message: format!(
                "{} validation errors in {}",
                report.errors.len(),
                data_file.display()
            ),
        });
    }

    tracing::info!("Stats document validation passed: {}", data_file.display());
    Ok(())
}
