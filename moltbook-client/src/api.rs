use moltsync_core::{CoreError, MoltbookApiError};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

const MOLTBOOK_API_BASE: &str = "https://www.moltbook.com/api/v1";

// The profile endpoint is slower than the feed; give it more headroom.
const PROFILE_TIMEOUT: Duration = Duration::from_secs(20);
const FEED_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub posts: Vec<FeedPost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: PostAuthor,
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub content: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostAuthor {
    pub name: Option<String>,
}

impl FeedPost {
    pub fn author_name(&self) -> &str {
        self.author.name.as_deref().unwrap_or("unknown")
    }
}

#[derive(Debug)]
pub struct MoltbookApiClient {
    http_client: Client,
    base_url: String,
}

impl Default for MoltbookApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MoltbookApiClient {
    pub fn new() -> Self {
        Self::with_base_url(MOLTBOOK_API_BASE.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let http_client = Client::builder()
            .user_agent(concat!("moltsync/", env!("CARGO_PKG_VERSION")))
            .timeout(PROFILE_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url,
        }
    }

    /// Fetch the authenticated agent's profile as loose JSON. Field names
    /// vary across API versions, so the caller extracts what it needs via
    /// alias lists rather than a fixed struct. If the payload wraps the
    /// metrics in an `agent` envelope, the envelope is unwrapped here.
    pub async fn get_agent_profile(&self, api_key: &str) -> Result<Value, CoreError> {
        let endpoint = "/agents/me";
        let request = self
            .http_client
            .get(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(api_key)
            .header("Accept", "application/json")
            .timeout(PROFILE_TIMEOUT);

        let response = self.execute(request, endpoint).await?;

        let payload: Value = response.json().await.map_err(|e| {
            error!("Failed to parse agent profile: {}", e);
            CoreError::MoltbookApi(MoltbookApiError::InvalidResponse {
                details: "Failed to parse agent profile".to_string(),
            })
        })?;

        debug!("Retrieved agent profile from {}", endpoint);
        Ok(unwrap_agent_envelope(payload))
    }

    /// Fetch the post feed, newest-first when `sort` is `Some("new")`.
    pub async fn get_feed(
        &self,
        api_key: &str,
        sort: Option<&str>,
    ) -> Result<Vec<FeedPost>, CoreError> {
        let endpoint = "/posts";
        let mut request = self
            .http_client
            .get(format!("{}{}", self.base_url, endpoint))
            .header("X-Api-Key", api_key)
            .header("Accept", "application/json")
            .timeout(FEED_TIMEOUT);

        if let Some(sort_by) = sort {
            request = request.query(&[("sort", sort_by)]);
        }

        let response = self.execute(request, endpoint).await?;

        let feed: FeedResponse = response.json().await.map_err(|e| {
            error!("Failed to parse feed posts: {}", e);
            CoreError::MoltbookApi(MoltbookApiError::InvalidResponse {
                details: "Failed to parse feed posts".to_string(),
            })
        })?;

        info!("Retrieved {} posts from the feed", feed.posts.len());
        Ok(feed.posts)
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<Response, CoreError> {
        info!("Making Moltbook API request: GET {}", endpoint);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Network error for GET {}: {}", endpoint, e);
                if e.is_timeout() {
                    return Err(CoreError::MoltbookApi(MoltbookApiError::RequestTimeout));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("Request successful: {} {}", status, endpoint);
            return Ok(response);
        }

        error!("Request failed with status: {} for {}", status, endpoint);
        match status.as_u16() {
            401 => Err(CoreError::MoltbookApi(
                MoltbookApiError::AuthenticationFailed {
                    reason: "API key rejected".to_string(),
                },
            )),
            403 => Err(CoreError::MoltbookApi(MoltbookApiError::Forbidden {
                resource: endpoint.to_string(),
            })),
            404 => Err(CoreError::MoltbookApi(MoltbookApiError::InvalidResponse {
                details: format!("Resource not found: {}", endpoint),
            })),
            code if status.is_server_error() => Err(CoreError::MoltbookApi(
                MoltbookApiError::ServerError { status_code: code },
            )),
            code => Err(CoreError::MoltbookApi(MoltbookApiError::InvalidResponse {
                details: format!("Unexpected status {} for {}", code, endpoint),
            })),
        }
    }
}

fn unwrap_agent_envelope(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.get("agent").map_or(false, Value::is_object) => map
            .remove("agent")
            .unwrap_or(Value::Object(serde_json::Map::new())),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_envelope_unwrapped() {
        let payload = json!({"agent": {"karma": 42}, "success": true});
        let agent = unwrap_agent_envelope(payload);
        assert_eq!(agent, json!({"karma": 42}));
    }

    #[test]
    fn test_bare_payload_used_directly() {
        let payload = json!({"karma": 42});
        assert_eq!(unwrap_agent_envelope(payload.clone()), payload);

        // A non-object `agent` key is not an envelope
        let payload = json!({"agent": "andy", "karma": 7});
        assert_eq!(unwrap_agent_envelope(payload.clone()), payload);
    }

    #[test]
    fn test_feed_post_defaults() {
        let post: FeedPost = serde_json::from_value(json!({
            "id": "p1",
            "title": "Hello"
        }))
        .unwrap();

        assert_eq!(post.upvotes, 0);
        assert_eq!(post.comment_count, 0);
        assert_eq!(post.content, "");
        assert_eq!(post.author_name(), "unknown");
        assert!(post.created_at.is_none());
    }

    #[test]
    fn test_feed_response_parsing() {
        let feed: FeedResponse = serde_json::from_value(json!({
            "posts": [{
                "id": "p1",
                "title": "Test Post",
                "author": {"name": "andy"},
                "upvotes": 10,
                "comment_count": 5,
                "content": "Some content",
                "created_at": "2026-08-01T10:00:00+00:00"
            }]
        }))
        .unwrap();

        assert_eq!(feed.posts.len(), 1);
        assert_eq!(feed.posts[0].author_name(), "andy");
        assert_eq!(feed.posts[0].upvotes, 10);
    }

    #[test]
    fn test_api_client_creation() {
        let client = MoltbookApiClient::new();
        assert_eq!(client.base_url, MOLTBOOK_API_BASE);

        let client = MoltbookApiClient::with_base_url("http://localhost:9999".to_string());
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
