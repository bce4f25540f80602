//! Runs the client against an in-process mock of the Data API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use yt_data_client::{ApiError, MAX_RESULTS, YouTubeClient};
use yt_oauth::{OAuthConfig, OAuthManager, OAuthToken};

const TOKEN: &str = "test-access-token";
const TOTAL_ITEMS: usize = 130;

#[derive(Clone, Default)]
struct MockState {
    inserted: Arc<Mutex<Vec<Value>>>,
    item_requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "code": 401, "message": "Invalid Credentials" } })),
    )
        .into_response()
}

async fn channels(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "items": [{
            "id": "UCmock",
            "snippet": { "title": "Mock channel" },
            "contentDetails": { "relatedPlaylists": { "likes": "LLmock", "uploads": "UUmock" } }
        }]
    }))
    .into_response()
}

async fn playlists(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    assert_eq!(query.get("mine").map(String::as_str), Some("true"));
    Json(json!({
        "items": [
            { "id": "PLfav", "snippet": { "title": "Favorites" } },
            { "id": "PLpub", "snippet": { "title": "liked videos (public)" } }
        ],
        "pageInfo": { "totalResults": 2, "resultsPerPage": 50 }
    }))
    .into_response()
}

async fn list_items(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    state.item_requests.lock().unwrap().push(query.clone());

    let page_size: usize = query
        .get("maxResults")
        .and_then(|v| v.parse().ok())
        .unwrap_or(5);
    let start: usize = query
        .get("pageToken")
        .and_then(|t| t.strip_prefix("page-"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);
    let end = (start + page_size).min(TOTAL_ITEMS);

    let items: Vec<Value> = (start..end)
        .map(|i| {
            json!({
                "id": format!("item{}", i),
                "snippet": {
                    "title": format!("Video {}", i),
                    "playlistId": query.get("playlistId"),
                    "position": i,
                    "resourceId": { "kind": "youtube#video", "videoId": format!("vid{}", i) }
                }
            })
        })
        .collect();

    let mut body = json!({
        "items": items,
        "pageInfo": { "totalResults": TOTAL_ITEMS, "resultsPerPage": page_size }
    });
    if end < TOTAL_ITEMS {
        body["nextPageToken"] = json!(format!("page-{}", end));
    }
    Json(body).into_response()
}

async fn insert_item(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let video_id = body["snippet"]["resourceId"]["videoId"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    if video_id == "deleted-video" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "code": 404, "message": "Video not found." } })),
        )
            .into_response();
    }

    state.inserted.lock().unwrap().push(body.clone());
    let mut snippet = body["snippet"].clone();
    snippet["title"] = json!(format!("Title of {}", video_id));
    Json(json!({ "id": format!("new-{}", video_id), "snippet": snippet })).into_response()
}

async fn spawn_mock() -> (String, MockState) {
    let state = MockState::default();
    let app = Router::new()
        .route("/youtube/v3/channels", get(channels))
        .route("/youtube/v3/playlists", get(playlists))
        .route("/youtube/v3/playlistItems", get(list_items).post(insert_item))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://{}", addr), state)
}

fn client_with_token(base_url: &str, access_token: &str) -> YouTubeClient {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let token = OAuthToken {
        access_token: access_token.to_string(),
        refresh_token: None,
        token_type: "Bearer".to_string(),
        expires_at: now + 3600,
    };
    let config = OAuthConfig::new("client".into(), "secret".into());
    YouTubeClient::new(base_url, OAuthManager::with_token(config, token))
}

#[tokio::test]
async fn lists_channel_and_playlists() {
    let (base_url, _state) = spawn_mock().await;
    let client = client_with_token(&base_url, TOKEN);

    let channels = client.list_my_channels().await.unwrap();
    assert_eq!(channels.items.len(), 1);
    let related = &channels.items[0].content_details.related_playlists;
    assert_eq!(related.likes.as_deref(), Some("LLmock"));

    let playlists = client.list_my_playlists(MAX_RESULTS).await.unwrap();
    let titles: Vec<_> = playlists
        .items
        .iter()
        .map(|p| p.snippet.title.as_str())
        .collect();
    assert_eq!(titles, ["Favorites", "liked videos (public)"]);
}

#[tokio::test]
async fn follows_page_tokens_one_page_at_a_time() {
    let (base_url, state) = spawn_mock().await;
    let client = client_with_token(&base_url, TOKEN);

    let first = client
        .list_playlist_items("LLmock", MAX_RESULTS, None)
        .await
        .unwrap();
    assert_eq!(first.items.len(), 50);
    assert_eq!(first.page_info.total_results, 130);
    assert_eq!(first.next_page_token.as_deref(), Some("page-50"));

    let last = client
        .list_playlist_items("LLmock", MAX_RESULTS, Some("page-100"))
        .await
        .unwrap();
    assert_eq!(last.items.len(), 30);
    assert!(last.next_page_token.is_none());

    let requests = state.item_requests.lock().unwrap();
    let param = |i: usize, key: &str| requests[i].get(key).cloned();
    assert_eq!(param(0, "playlistId").as_deref(), Some("LLmock"));
    assert_eq!(param(0, "maxResults").as_deref(), Some("50"));
    assert!(param(0, "pageToken").is_none());
    assert_eq!(param(1, "pageToken").as_deref(), Some("page-100"));
}

#[tokio::test]
async fn page_size_is_capped_at_api_maximum() {
    let (base_url, state) = spawn_mock().await;
    let client = client_with_token(&base_url, TOKEN);

    client
        .list_playlist_items("LLmock", 500, None)
        .await
        .unwrap();

    let requests = state.item_requests.lock().unwrap();
    let max_results = requests[0].get("maxResults").cloned();
    assert_eq!(max_results.as_deref(), Some("50"));
}

#[tokio::test]
async fn inserts_at_requested_position() {
    let (base_url, state) = spawn_mock().await;
    let client = client_with_token(&base_url, TOKEN);

    let created = client
        .insert_playlist_item("PLpub", "abc123", Some(0))
        .await
        .unwrap();
    assert_eq!(created.id, "new-abc123");
    assert_eq!(created.snippet.resource_id.video_id, "abc123");

    let inserted = state.inserted.lock().unwrap();
    assert_eq!(inserted[0]["snippet"]["playlistId"], "PLpub");
    assert_eq!(inserted[0]["snippet"]["position"], 0);
    assert_eq!(inserted[0]["snippet"]["resourceId"]["kind"], "youtube#video");
}

#[tokio::test]
async fn insert_error_carries_api_message() {
    let (base_url, _state) = spawn_mock().await;
    let client = client_with_token(&base_url, TOKEN);

    let err = client
        .insert_playlist_item("PLpub", "deleted-video", Some(0))
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Video not found.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn wrong_token_is_rejected() {
    let (base_url, _state) = spawn_mock().await;
    let client = client_with_token(&base_url, "stale-token");

    let err = client.list_my_channels().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 401, .. }));
}
