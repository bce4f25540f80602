use std::time::Duration;

use clap::Parser;
use yt_data_client::{DEFAULT_BASE_URL, YouTubeClient};
use yt_liked_mirror::{
    Approval, Approver, AutoApprover, ConsoleApprover, DEFAULT_TARGET_PLAYLIST, Driver,
    InsertPosition, RunOutcome, SyncConfig, SyncError, logging,
};
use yt_oauth::{ClientSecrets, OAuthConfig, OAuthManager};

/// Copy videos from your private "Liked videos" playlist into a public playlist
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Name of the public playlist to mirror into (case-insensitive)
    #[arg(long, default_value = DEFAULT_TARGET_PLAYLIST)]
    target_playlist: String,

    /// Path to the OAuth client secrets file downloaded from the Google Cloud console
    #[arg(long, default_value = "client_secret.json")]
    client_secret_path: String,

    /// Pause before each insert request, in milliseconds
    #[arg(long, default_value = "500")]
    insert_delay_ms: u64,

    /// Append new videos at the end of the playlist instead of the top
    #[arg(long)]
    append: bool,

    /// Show what would be added and exit
    #[arg(long)]
    dry_run: bool,

    /// Do not ask for confirmation (unattended runs)
    #[arg(long)]
    yes: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

async fn authenticate(client_secret_path: &str) -> Result<OAuthManager, SyncError> {
    tracing::info!("Reading client secrets from: {}", client_secret_path);
    let secrets = ClientSecrets::load(client_secret_path)?;

    tracing::info!("Attempting to authenticate...");
    let mut manager = OAuthManager::new(OAuthConfig::from(secrets));
    manager.authorize().await?;
    Ok(manager)
}

async fn run(args: Args) -> Result<RunOutcome, SyncError> {
    let auth = authenticate(&args.client_secret_path).await?;

    // Get REST API address from environment variable or use default
    let rest_api_address = std::env::var("REST_API_ADDRESS")
        .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    tracing::debug!("Using YouTube Data API at: {}", rest_api_address);
    let client = YouTubeClient::new(rest_api_address, auth);

    let approver: Box<dyn Approver> = if args.yes {
        Box::new(AutoApprover(Approval::Approved))
    } else {
        Box::new(ConsoleApprover)
    };

    let config = SyncConfig {
        target_playlist: args.target_playlist,
        insert_delay: Duration::from_millis(args.insert_delay_ms),
        position: if args.append {
            InsertPosition::Tail
        } else {
            InsertPosition::Head
        },
        dry_run: args.dry_run,
    };

    Driver::new(&client, approver.as_ref(), config).run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init_tracing(&args.log_level) {
        eprintln!("Invalid log filter '{}': {}", args.log_level, e);
        std::process::exit(2);
    }

    let code = match run(args).await {
        Ok(RunOutcome::Synced(report)) => {
            for failure in &report.failures {
                tracing::warn!(
                    "Not added: {} \"{}\": {}",
                    failure.video_id,
                    failure.title,
                    failure.error
                );
            }
            // Conventional status for a run ended by SIGINT
            if report.interrupted { 130 } else { 0 }
        }
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    // Exit directly: a declined prompt can leave the stdin reader blocked
    std::process::exit(code);
}
