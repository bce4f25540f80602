use std::future::Future;
use std::time::Duration;

use crate::api::PlaylistApi;
use crate::approval::{Approval, Approver};
use crate::diff::pending_adds;
use crate::error::Result;
use crate::fetcher::fetch_collection;
use crate::model::InsertPosition;
use crate::resolver::resolve_playlists;
use crate::shutdown::shutdown_signal;
use crate::sync::{DEFAULT_INSERT_DELAY, SyncExecutor, SyncReport};

/// Name of the public playlist the liked videos are mirrored to. Not case sensitive.
pub const DEFAULT_TARGET_PLAYLIST: &str = "Liked Videos (PUBLIC)";

const CONFIRM_PROMPT: &str = "Press Enter to continue. (Or press Ctrl+C to stop.)";

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub target_playlist: String,
    pub insert_delay: Duration,
    pub position: InsertPosition,
    /// Stop after the preview
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            target_playlist: DEFAULT_TARGET_PLAYLIST.to_string(),
            insert_delay: DEFAULT_INSERT_DELAY,
            position: InsertPosition::Head,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing to copy; no prompt, no writes
    UpToDate,
    DryRun { pending: usize },
    /// The operator declined; no writes
    Cancelled { pending: usize },
    Synced(SyncReport),
}

/// Runs one sync: resolve, fetch both playlists, diff, confirm, insert.
pub struct Driver<'a> {
    api: &'a dyn PlaylistApi,
    approver: &'a dyn Approver,
    config: SyncConfig,
}

impl<'a> Driver<'a> {
    pub fn new(api: &'a dyn PlaylistApi, approver: &'a dyn Approver, config: SyncConfig) -> Self {
        Self {
            api,
            approver,
            config,
        }
    }

    /// Run until done; SIGINT or SIGTERM during the inserts stops the batch
    pub async fn run(&self) -> Result<RunOutcome> {
        self.run_until(async {
            let signal = shutdown_signal().await;
            tracing::info!("Received {}, stopping after the current insert", signal);
        })
        .await
    }

    /// Like [`Driver::run`], with `cancel` standing in for the shutdown signals
    pub async fn run_until<F>(&self, cancel: F) -> Result<RunOutcome>
    where
        F: Future<Output = ()>,
    {
        let target_name = &self.config.target_playlist;
        let playlists = resolve_playlists(self.api, target_name).await?;
        let target = &playlists.target;

        tracing::info!("Fetching liked videos...");
        let liked = fetch_collection(self.api, &playlists.liked.id).await?;
        println!("{}", serde_json::to_string_pretty(&liked)?);

        tracing::info!("Fetching \"{}\"...", target.title);
        let public = fetch_collection(self.api, &target.id).await?;
        println!("{}", serde_json::to_string_pretty(&public)?);

        let pending = pending_adds(&liked, &public, self.config.position);

        // Nothing to confirm, so the prompt is skipped
        if pending.is_empty() {
            println!("\n\"{}\" is already up to date.", target.title);
            return Ok(RunOutcome::UpToDate);
        }

        println!(
            "\nReady to add {} videos to \"{}\"",
            pending.len(),
            target.title
        );
        println!("{}", serde_json::to_string_pretty(&pending)?);

        if self.config.dry_run {
            return Ok(RunOutcome::DryRun {
                pending: pending.len(),
            });
        }

        if self.approver.approve(CONFIRM_PROMPT).await? == Approval::Declined {
            println!("\nStopped. Nothing was added.");
            return Ok(RunOutcome::Cancelled {
                pending: pending.len(),
            });
        }

        let report = SyncExecutor::new(self.config.insert_delay, self.config.position)
            .run(self.api, &target.id, &pending, cancel)
            .await;

        if report.interrupted {
            println!(
                "\nStopped. Added {} of {} videos.",
                report.added,
                pending.len()
            );
            return Ok(RunOutcome::Synced(report));
        }

        if report.failures.is_empty() {
            tracing::info!("Added {} videos", report.added);
        } else {
            tracing::warn!(
                "Added {} of {} videos, {} failed",
                report.added,
                report.attempted,
                report.failures.len()
            );
        }
        println!("Done!");

        Ok(RunOutcome::Synced(report))
    }
}
