use crate::api::PlaylistApi;
use crate::error::{Result, SyncError};
use crate::model::VideoCollection;

/// Items requested per page
pub const PAGE_SIZE: u32 = 50;

/// Collect every item of a playlist, following page tokens until the last page.
///
/// Any error from the platform aborts the fetch; there is no partial result.
#[tracing::instrument(skip(api))]
pub async fn fetch_collection(api: &dyn PlaylistApi, playlist_id: &str) -> Result<VideoCollection> {
    if playlist_id.is_empty() {
        return Err(SyncError::EmptyPlaylistId);
    }

    let mut collection = VideoCollection::new();
    let mut page_token: Option<String> = None;
    let mut reported_total: Option<u32> = None;

    loop {
        let page = api
            .playlist_items_page(playlist_id, PAGE_SIZE, page_token.take())
            .await?;

        if reported_total.is_none() {
            tracing::info!("Playlist reports {} videos", page.total_results);
            reported_total = Some(page.total_results);
        }

        for item in page.items {
            collection.insert(item.id, item.title);
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    tracing::info!("Collected {} videos", collection.len());

    // Deleted or private videos can make the two disagree
    if let Some(total) = reported_total {
        if collection.len() != total as usize {
            tracing::warn!(
                reported = total,
                collected = collection.len(),
                "Collected item count differs from the count reported by YouTube"
            );
        }
    }

    Ok(collection)
}
