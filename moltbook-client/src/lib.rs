pub mod api;

pub use api::{FeedPost, FeedResponse, MoltbookApiClient, PostAuthor};
