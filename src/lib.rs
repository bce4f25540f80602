//! Mirror a YouTube account's private "Liked videos" playlist into a public
//! playlist, copying only the videos that are not there yet.
//!
//! One run resolves both playlists, fetches them, computes the missing videos,
//! asks the operator for confirmation and inserts them one by one. Nothing is
//! kept between runs.

pub mod api;
pub mod approval;
pub mod diff;
pub mod driver;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod model;
pub mod resolver;
pub mod shutdown;
pub mod sync;

pub use api::PlaylistApi;
pub use approval::{Approval, Approver, AutoApprover, ConsoleApprover};
pub use driver::{DEFAULT_TARGET_PLAYLIST, Driver, RunOutcome, SyncConfig};
pub use error::SyncError;
pub use model::{InsertPosition, PendingAdds, PlaylistRef, VideoCollection, VideoItem};
