//! Minimal typed client for the YouTube Data API v3 endpoints that deal with
//! channels, playlists and playlist items.
//!
//! Every request is authorized with a bearer token taken from an
//! [`OAuthManager`], which refreshes it when needed. The client does no retries
//! and no pagination of its own; callers follow `next_page_token` themselves.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use yt_oauth::{OAuthError, OAuthManager};

/// Production Data API address
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Largest page the list endpoints accept
pub const MAX_RESULTS: u32 = 50;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YouTube API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode YouTube API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Authorization failed: {0}")]
    Auth(#[from] OAuthError),
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<Channel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub snippet: ChannelSnippet,
    pub content_details: ChannelContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelSnippet {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedPlaylists {
    pub likes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistListResponse {
    #[serde(default)]
    pub items: Vec<Playlist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub snippet: PlaylistSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSnippet {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub id: String,
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    #[serde(default)]
    pub title: String,
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: String,
}

#[derive(Debug, Serialize)]
struct PlaylistItemInsert<'a> {
    snippet: InsertSnippet<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertSnippet<'a> {
    playlist_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<u32>,
    resource_id: InsertResourceId<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertResourceId<'a> {
    kind: &'a str,
    video_id: &'a str,
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    message: String,
}

/// Pull the human-readable message out of a Google error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<GoogleErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    auth: Mutex<OAuthManager>,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>, auth: OAuthManager) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: Mutex::new(auth),
        }
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/youtube/v3/{}", self.base_url, resource)
    }

    async fn access_token(&self) -> Result<String> {
        Ok(self.auth.lock().await.get_access_token().await?)
    }

    async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, query: &[(&str, &str)]) -> Result<T> {
        tracing::debug!(resource, ?query, "GET");
        let token = self.access_token().await?;
        let response = self
            .http
            .get(self.url(resource))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        Self::read_response(response).await
    }

    /// `channels.list` for the authorized account
    pub async fn list_my_channels(&self) -> Result<ChannelListResponse> {
        self.get(
            "channels",
            &[("part", "snippet,contentDetails"), ("mine", "true")],
        )
        .await
    }

    /// One page of `playlists.list` for the authorized account
    pub async fn list_my_playlists(&self, max_results: u32) -> Result<PlaylistListResponse> {
        let max_results = max_results.min(MAX_RESULTS).to_string();
        self.get(
            "playlists",
            &[
                ("part", "snippet,contentDetails"),
                ("mine", "true"),
                ("maxResults", max_results.as_str()),
            ],
        )
        .await
    }

    /// One page of `playlistItems.list`
    pub async fn list_playlist_items(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse> {
        let max_results = max_results.min(MAX_RESULTS).to_string();
        let mut query = vec![
            ("part", "id,snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        self.get("playlistItems", &query).await
    }

    /// `playlistItems.insert`; `position` of `None` appends to the end
    pub async fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
        position: Option<u32>,
    ) -> Result<PlaylistItem> {
        let body = PlaylistItemInsert {
            snippet: InsertSnippet {
                playlist_id,
                position,
                resource_id: InsertResourceId {
                    kind: "youtube#video",
                    video_id,
                },
            },
        };
        tracing::debug!(playlist_id, video_id, ?position, "POST playlistItems");

        let token = self.access_token().await?;
        let response = self
            .http
            .post(self.url("playlistItems"))
            .bearer_auth(token)
            .query(&[("part", "snippet")])
            .json(&body)
            .send()
            .await?;
        Self::read_response(response).await
    }
}
