use yt_data_client::ApiError;
use yt_oauth::OAuthError;

/// Fatal conditions that end a run
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] OAuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("The authorized account has no YouTube channel")]
    NoChannel,

    #[error("Channel \"{channel}\" does not expose a liked videos playlist")]
    NoLikedPlaylist { channel: String },

    #[error("Couldn't find a \"{name}\" playlist. Abort!")]
    TargetPlaylistNotFound { name: String },

    #[error("Playlist id must not be empty")]
    EmptyPlaylistId,

    #[error("Failed to read confirmation: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("Failed to render preview: {0}")]
    Preview(#[from] serde_json::Error),
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
