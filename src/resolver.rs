use crate::api::PlaylistApi;
use crate::error::{Result, SyncError};
use crate::model::PlaylistRef;

/// The playlists list is read as a single page of this size
pub const PLAYLISTS_PAGE_SIZE: u32 = 50;

/// Title given to the liked playlist, which the playlists endpoint never lists
pub const LIKED_PLAYLIST_TITLE: &str = "Liked videos";

#[derive(Debug, Clone)]
pub struct ResolvedPlaylists {
    pub liked: PlaylistRef,
    /// Carries the title as spelled on YouTube, not as configured
    pub target: PlaylistRef,
}

fn title_matches(title: &str, wanted: &str) -> bool {
    title.to_lowercase() == wanted.to_lowercase()
}

/// Find the account's liked playlist and the playlist named `target_name` (case-insensitive).
///
/// A missing target playlist is fatal; it is never created.
pub async fn resolve_playlists(
    api: &dyn PlaylistApi,
    target_name: &str,
) -> Result<ResolvedPlaylists> {
    tracing::info!("Fetching channel info.");
    let channel = api.my_channel().await?.ok_or(SyncError::NoChannel)?;
    let liked_id = channel
        .liked_playlist_id
        .clone()
        .ok_or_else(|| SyncError::NoLikedPlaylist {
            channel: channel.title.clone(),
        })?;

    tracing::info!("Channel \"{}\" ({})", channel.title, channel.id);
    tracing::info!("Liked videos playlist: {}", liked_id);

    let playlists = api.my_playlists(PLAYLISTS_PAGE_SIZE).await?;
    tracing::info!("Playlists on this channel:");
    for playlist in &playlists {
        tracing::info!("  \"{}\" = {}", playlist.title, playlist.id);
    }

    let target = playlists
        .into_iter()
        .find(|p| title_matches(&p.title, target_name))
        .ok_or_else(|| SyncError::TargetPlaylistNotFound {
            name: target_name.to_string(),
        })?;

    tracing::info!("Mirroring into \"{}\" ({})", target.title, target.id);

    Ok(ResolvedPlaylists {
        liked: PlaylistRef::new(liked_id, LIKED_PLAYLIST_TITLE),
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockPlaylistApi;
    use crate::model::ChannelInfo;

    fn channel(likes: Option<&str>) -> ChannelInfo {
        ChannelInfo {
            id: "UC1".into(),
            title: "Tester".into(),
            liked_playlist_id: likes.map(str::to_string),
        }
    }

    fn mock_with(playlists: Vec<PlaylistRef>) -> MockPlaylistApi {
        let mut api = MockPlaylistApi::new();
        api.expect_my_channel()
            .times(1)
            .returning(|| Ok(Some(channel(Some("LL")))));
        api.expect_my_playlists()
            .withf(|max| *max == PLAYLISTS_PAGE_SIZE)
            .times(1)
            .returning(move |_| Ok(playlists.clone()));
        api
    }

    #[tokio::test]
    async fn finds_target_case_insensitively() {
        let api = mock_with(vec![
            PlaylistRef::new("PL1", "Favorites"),
            PlaylistRef::new("PL2", "liked videos (public)"),
        ]);

        let resolved = resolve_playlists(&api, "Liked Videos (PUBLIC)")
            .await
            .unwrap();

        assert_eq!(resolved.liked.id, "LL");
        assert_eq!(
            resolved.target,
            PlaylistRef::new("PL2", "liked videos (public)")
        );
    }

    #[tokio::test]
    async fn first_match_wins() {
        let api = mock_with(vec![
            PlaylistRef::new("PL1", "Mirror"),
            PlaylistRef::new("PL2", "MIRROR"),
        ]);

        let resolved = resolve_playlists(&api, "mirror").await.unwrap();
        assert_eq!(resolved.target.id, "PL1");
    }

    #[tokio::test]
    async fn missing_target_names_expected_playlist() {
        let api = mock_with(vec![
            PlaylistRef::new("PL1", "Favorites"),
            PlaylistRef::new("PL2", "Watch Later"),
        ]);

        let err = resolve_playlists(&api, "Liked Videos (PUBLIC)")
            .await
            .unwrap_err();

        match &err {
            SyncError::TargetPlaylistNotFound { name } => {
                assert_eq!(name, "Liked Videos (PUBLIC)")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("\"Liked Videos (PUBLIC)\""));
    }

    #[tokio::test]
    async fn account_without_channel_is_fatal() {
        let mut api = MockPlaylistApi::new();
        api.expect_my_channel().returning(|| Ok(None));
        api.expect_my_playlists().never();

        let err = resolve_playlists(&api, "anything").await.unwrap_err();
        assert!(matches!(err, SyncError::NoChannel));
    }

    #[tokio::test]
    async fn channel_without_likes_is_fatal() {
        let mut api = MockPlaylistApi::new();
        api.expect_my_channel()
            .returning(|| Ok(Some(channel(None))));
        api.expect_my_playlists().never();

        let err = resolve_playlists(&api, "anything").await.unwrap_err();
        assert!(matches!(err, SyncError::NoLikedPlaylist { .. }));
    }
}
