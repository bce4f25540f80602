use serde::Deserialize;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default OAuth callback port
pub const OAUTH_CALLBACK_PORT: u16 = 8080;

/// Scope needed to read playlists and insert playlist items
pub const YOUTUBE_FORCE_SSL_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Errors raised while obtaining or refreshing credentials
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("Failed to read client secrets file '{path}': {source}")]
    ReadSecrets {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse client secrets file '{path}': {reason}")]
    ParseSecrets { path: String, reason: String },

    #[error("HTTP error talking to the OAuth server: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token endpoint rejected the request (status {status}): {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("Malformed token response: {0}")]
    MalformedToken(&'static str),

    #[error("Authorization was denied: {0}")]
    Denied(String),

    #[error("OAuth authorization timeout ({0} seconds)")]
    Timeout(u64),

    #[error("Failed to start the callback server: {0}")]
    CallbackServer(#[source] std::io::Error),

    #[error("No OAuth token available")]
    NoToken,
}

pub type Result<T, E = OAuthError> = std::result::Result<T, E>;

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// OAuth 2.0 token information
#[derive(Debug, Clone)]
pub struct OAuthToken {
    /// Access token for API requests
    pub access_token: String,
    /// Refresh token for getting new access tokens
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer")
    pub token_type: String,
    /// Expiry time as Unix timestamp (seconds since epoch)
    pub expires_at: u64,
}

impl OAuthToken {
    /// Check if the token is expired or will expire soon (within 60 seconds)
    pub fn is_expired(&self) -> bool {
        unix_now() + 60 >= self.expires_at
    }

    /// Build a token from a token endpoint response.
    ///
    /// Refresh responses usually omit `refresh_token`; `previous_refresh` is kept
    /// in that case.
    pub fn from_response(
        response: &serde_json::Value,
        now: u64,
        previous_refresh: Option<String>,
    ) -> Result<Self> {
        let access_token = response
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or(OAuthError::MalformedToken("missing access_token"))?
            .to_string();

        let expires_in = response
            .get("expires_in")
            .and_then(|v| v.as_u64())
            .ok_or(OAuthError::MalformedToken("missing expires_in"))?;

        let refresh_token = response
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or(previous_refresh);

        Ok(OAuthToken {
            access_token,
            refresh_token,
            token_type: response
                .get("token_type")
                .and_then(|v| v.as_str())
                .unwrap_or("Bearer")
                .to_string(),
            expires_at: now + expires_in,
        })
    }
}

/// Client credentials as downloaded from the Google Cloud console.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Load an "installed" (desktop) or "web" client secrets JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| OAuthError::ReadSecrets {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content).map_err(|reason| OAuthError::ParseSecrets {
            path: path.display().to_string(),
            reason,
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let file: ClientSecretsFile = serde_json::from_str(content).map_err(|e| e.to_string())?;
        file.installed
            .or(file.web)
            .ok_or_else(|| "expected an \"installed\" or \"web\" section".to_string())
    }
}

/// OAuth configuration
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect URI for OAuth callback
    pub redirect_uri: String,
    /// OAuth scope(s)
    pub scope: String,
    /// Token endpoint used for code exchange and refresh
    pub token_endpoint: String,
}

impl OAuthConfig {
    /// Create new OAuth configuration with YouTube defaults
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri: format!("http://localhost:{}/oauth2callback", OAUTH_CALLBACK_PORT),
            scope: YOUTUBE_FORCE_SSL_SCOPE.to_string(),
            token_endpoint: TOKEN_ENDPOINT.to_string(),
        }
    }
}

impl From<ClientSecrets> for OAuthConfig {
    fn from(secrets: ClientSecrets) -> Self {
        Self::new(secrets.client_id, secrets.client_secret)
    }
}

/// Holds the session token in memory and refreshes it when it is about to expire.
pub struct OAuthManager {
    config: OAuthConfig,
    token: Option<OAuthToken>,
}

impl OAuthManager {
    /// Create new OAuth manager
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            token: None,
        }
    }

    /// Create a manager around an already obtained token
    pub fn with_token(config: OAuthConfig, token: OAuthToken) -> Self {
        Self {
            config,
            token: Some(token),
        }
    }

    /// Run the interactive authorization flow and keep the resulting token
    pub async fn authorize(&mut self) -> Result<()> {
        self.token = Some(start_auth_flow(&self.config).await?);
        Ok(())
    }

    /// Get valid access token, refreshing if necessary
    pub async fn get_access_token(&mut self) -> Result<String> {
        let token = self.token.as_ref().ok_or(OAuthError::NoToken)?;

        if token.is_expired() {
            tracing::info!("Access token expired, refreshing...");
            self.refresh_token().await?;
        }

        self.token
            .as_ref()
            .map(|t| t.access_token.clone())
            .ok_or(OAuthError::NoToken)
    }

    /// Refresh the access token using the refresh token
    async fn refresh_token(&mut self) -> Result<()> {
        let current_token = self.token.as_ref().ok_or(OAuthError::NoToken)?;
        let refresh_token = current_token
            .refresh_token
            .clone()
            .ok_or(OAuthError::MalformedToken("no refresh_token to refresh with"))?;

        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let endpoint = &self.config.token_endpoint;
        let refresh_response = post_token_request(endpoint, &params).await?;
        self.token = Some(OAuthToken::from_response(
            &refresh_response,
            unix_now(),
            Some(refresh_token),
        )?);

        tracing::info!("OAuth token refreshed successfully");

        Ok(())
    }
}

async fn post_token_request(endpoint: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
    let client = reqwest::Client::new();
    let response = client.post(endpoint).form(params).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await?;
        return Err(OAuthError::TokenEndpoint { status, body });
    }

    Ok(response.json().await?)
}

/// Generate PKCE verifier and challenge
pub fn generate_pkce() -> (String, String) {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use rand::Rng;
    use rand::distributions::Alphanumeric;
    use sha2::{Digest, Sha256};

    // 43-128 characters
    let verifier: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();

    // base64url(SHA256(verifier))
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    let hash = hasher.finalize();
    let challenge = URL_SAFE_NO_PAD.encode(hash);

    (verifier, challenge)
}

/// Generate authorization URL, returning it with the PKCE verifier
pub fn generate_auth_url(config: &OAuthConfig) -> (String, String) {
    let (verifier, challenge) = generate_pkce();

    let auth_url = format!(
        "{}?\
        client_id={}&\
        redirect_uri={}&\
        response_type=code&\
        scope={}&\
        code_challenge={}&\
        code_challenge_method=S256&\
        access_type=offline&\
        prompt=consent",
        AUTH_ENDPOINT,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(&config.scope),
        urlencoding::encode(&challenge),
    );

    (auth_url, verifier)
}

/// Exchange authorization code for tokens
pub async fn exchange_code(config: &OAuthConfig, code: &str, verifier: &str) -> Result<OAuthToken> {
    tracing::info!("Exchanging authorization code for tokens...");

    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("code", code),
        ("code_verifier", verifier),
        ("grant_type", "authorization_code"),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];

    let token_response = post_token_request(&config.token_endpoint, &params).await?;
    let token = OAuthToken::from_response(&token_response, unix_now(), None)?;

    tracing::info!("Successfully obtained OAuth tokens");

    Ok(token)
}

/// Start OAuth flow with local callback server
pub async fn start_auth_flow(config: &OAuthConfig) -> Result<OAuthToken> {
    use std::sync::Arc;
    use tokio::sync::Mutex;

    let (auth_url, verifier) = generate_auth_url(config);

    eprintln!("\n=================================================");
    eprintln!("OAuth 2.0 Authorization Required");
    eprintln!("=================================================");
    eprintln!("\nPlease visit the following URL to authorize the application:\n");
    eprintln!("{}\n", auth_url);
    eprintln!("Waiting for authorization...");
    eprintln!("=================================================\n");

    // Ok(code) or Err(error reported by the provider)
    let callback_result = Arc::new(Mutex::new(None::<std::result::Result<String, String>>));
    let callback_result_clone = callback_result.clone();

    use axum::{
        Router,
        extract::Query,
        response::{Html, IntoResponse},
        routing::get,
    };

    #[derive(Deserialize)]
    struct AuthCallback {
        code: Option<String>,
        error: Option<String>,
    }

    let callback_handler = move |Query(params): Query<AuthCallback>| async move {
        if let Some(error) = params.error {
            let page = Html(format!(
                "<html><body><h1>Authorization Failed</h1><p>Error: {}</p>\
                <p>You can close this window.</p></body></html>",
                error
            ));
            *callback_result_clone.lock().await = Some(Err(error));
            return page.into_response();
        }

        if let Some(code) = params.code {
            *callback_result_clone.lock().await = Some(Ok(code));
            return Html(
                "<html><body><h1>Authorization Successful!</h1>\
                <p>You can close this window and return to the application.</p></body></html>",
            )
            .into_response();
        }

        Html("<html><body><h1>Authorization Failed</h1><p>No code received</p></body></html>")
            .into_response()
    };

    let app = Router::new().route("/oauth2callback", get(callback_handler));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", OAUTH_CALLBACK_PORT))
        .await
        .map_err(OAuthError::CallbackServer)?;
    let server = axum::serve(listener, app);

    let server_handle = tokio::spawn(async move {
        server.await.ok();
    });

    const TIMEOUT_SECS: u64 = 300;
    let timeout = tokio::time::Duration::from_secs(TIMEOUT_SECS);
    let start = tokio::time::Instant::now();

    let outcome = loop {
        if start.elapsed() > timeout {
            break Err(OAuthError::Timeout(TIMEOUT_SECS));
        }

        let result = callback_result.lock().await.take();
        match result {
            Some(Ok(code)) => break Ok(code),
            Some(Err(error)) => break Err(OAuthError::Denied(error)),
            None => {}
        }

        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
    };

    server_handle.abort();

    exchange_code(config, &outcome?, &verifier).await
}
