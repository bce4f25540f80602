use yt_data_client::{ApiError, YouTubeClient};

use crate::model::{ChannelInfo, InsertPosition, PlaylistRef, VideoItem};

/// One page of a playlist's items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPage {
    pub items: Vec<VideoItem>,
    pub next_page_token: Option<String>,
    /// Item count the platform reports for the whole playlist
    pub total_results: u32,
}

/// The platform operations the sync needs.
///
/// Implemented for [`YouTubeClient`]; tests use the generated `MockPlaylistApi`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaylistApi: Send + Sync {
    /// Channel of the authorized account, `None` if it has none
    async fn my_channel(&self) -> Result<Option<ChannelInfo>, ApiError>;

    /// A single page of the account's own playlists
    async fn my_playlists(&self, max_results: u32) -> Result<Vec<PlaylistRef>, ApiError>;

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<String>,
    ) -> Result<ItemPage, ApiError>;

    async fn insert_item(
        &self,
        playlist_id: &str,
        video_id: &str,
        position: InsertPosition,
    ) -> Result<(), ApiError>;
}

#[async_trait::async_trait]
impl PlaylistApi for YouTubeClient {
    async fn my_channel(&self) -> Result<Option<ChannelInfo>, ApiError> {
        let response = self.list_my_channels().await?;
        let channel = response.items.into_iter().next();
        Ok(channel.map(|channel| ChannelInfo {
            id: channel.id,
            title: channel.snippet.title,
            liked_playlist_id: channel
                .content_details
                .related_playlists
                .likes
                .filter(|id| !id.is_empty()),
        }))
    }

    async fn my_playlists(&self, max_results: u32) -> Result<Vec<PlaylistRef>, ApiError> {
        let response = self.list_my_playlists(max_results).await?;
        Ok(response
            .items
            .into_iter()
            .map(|p| PlaylistRef::new(p.id, p.snippet.title))
            .collect())
    }

    async fn playlist_items_page(
        &self,
        playlist_id: &str,
        max_results: u32,
        page_token: Option<String>,
    ) -> Result<ItemPage, ApiError> {
        let response = self
            .list_playlist_items(playlist_id, max_results, page_token.as_deref())
            .await?;
        Ok(ItemPage {
            items: response
                .items
                .into_iter()
                .map(|item| VideoItem::new(item.snippet.resource_id.video_id, item.snippet.title))
                .collect(),
            next_page_token: response.next_page_token,
            total_results: response.page_info.total_results,
        })
    }

    async fn insert_item(
        &self,
        playlist_id: &str,
        video_id: &str,
        position: InsertPosition,
    ) -> Result<(), ApiError> {
        self.insert_playlist_item(playlist_id, video_id, position.api_position())
            .await?;
        Ok(())
    }
}
