use std::future::Future;
use std::time::Duration;

use crate::api::PlaylistApi;
use crate::model::{InsertPosition, PendingAdds};

/// Pause before each insert request
pub const DEFAULT_INSERT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertFailure {
    pub video_id: String,
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub attempted: usize,
    pub added: usize,
    pub failures: Vec<InsertFailure>,
    /// Stopped by a signal before every pending video was attempted
    pub interrupted: bool,
}

/// Inserts pending videos one at a time with a fixed pause between requests.
///
/// Inserting is not idempotent: a stale [`PendingAdds`] creates duplicates.
#[derive(Debug, Clone)]
pub struct SyncExecutor {
    delay: Duration,
    position: InsertPosition,
}

impl SyncExecutor {
    pub fn new(delay: Duration, position: InsertPosition) -> Self {
        Self { delay, position }
    }

    /// Insert every pending video; a failed insert is recorded and the batch goes on.
    ///
    /// Once `cancel` resolves no further insert is started. A request already in
    /// flight is allowed to finish.
    pub async fn run<F>(
        &self,
        api: &dyn PlaylistApi,
        target_playlist_id: &str,
        pending: &PendingAdds,
        cancel: F,
    ) -> SyncReport
    where
        F: Future<Output = ()>,
    {
        let mut report = SyncReport::default();
        tokio::pin!(cancel);

        for video in pending.iter() {
            tokio::select! {
                biased;
                _ = &mut cancel => {
                    report.interrupted = true;
                    break;
                }
                _ = tokio::time::sleep(self.delay) => {}
            }

            tracing::info!("Adding {} \"{}\" ...", video.id, video.title);

            report.attempted += 1;
            match api
                .insert_item(target_playlist_id, &video.id, self.position)
                .await
            {
                Ok(()) => report.added += 1,
                Err(e) => {
                    tracing::error!("Failed to add {}: {}", video.id, e);
                    report.failures.push(InsertFailure {
                        video_id: video.id.clone(),
                        title: video.title.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        report
    }
}
