//! # fpl-dl
//!
//! Concurrent data collection for the Fantasy Premier League JSON API.
//!
//! ## Design Philosophy
//!
//! fpl-dl is designed to be:
//! - **Bounded** - Fan-outs never run more than `max_workers` requests at once
//! - **Deterministic** - Aggregates come back in request order, whatever order responses arrive in
//! - **Honest about failure** - Every failed request is reported with the identifier that caused it
//! - **Library-first** - Every operation is callable from Rust; the `fpl-dl` binary is a thin shell
//!
//! ## Quick Start
//!
//! ```no_run
//! use fpl_dl::{Config, FplClient, HttpTransport, LeagueId, LeagueType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let transport = HttpTransport::anonymous(&config.api)?;
//!     let client = FplClient::new(transport, config)?;
//!
//!     // Walks every standings page in order
//!     let table = client.league_table(LeagueId(313), LeagueType::Classic).await?;
//!     println!("{} managers", table.len());
//!
//!     // Fans out over every player with at most 20 requests in flight
//!     let history = client.player_gameweek_history(None).await?;
//!     for failure in &history.failures {
//!         eprintln!("failed: {failure}");
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

use tokio_util::sync::CancellationToken;

/// Aggregation engine: bounded fan-out and sequential pagination
pub mod aggregate;
/// High-level API operations
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// CSV export and terminal tables
pub mod export;
/// Typed API payloads
pub mod records;
/// Logged-in sessions
pub mod session;
/// HTTP transport and JSON decoding
pub mod transport;
/// Identifier newtypes
pub mod types;

// Re-export commonly used types
pub use aggregate::{FanOut, FanOutReport, collect_pages};
pub use client::FplClient;
pub use config::Config;
pub use error::{Error, FetchFailure, Result};
pub use session::{Credentials, Session};
pub use transport::{HttpTransport, Transport};
pub use types::{EntryId, Gameweek, LeagueId, LeagueType, PlayerId, TeamCode};

/// Token that is cancelled on the first termination signal.
///
/// Hand it to [`FplClient::with_cancel_token`] so outstanding requests are
/// dropped instead of awaited when the user interrupts a long fan-out.
///
/// - **Unix:** listens for SIGTERM and SIGINT, falling back to `ctrl_c()` if registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Must be called from within a Tokio runtime.
pub fn cancel_on_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        on_signal.cancel();
    });
    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register signal handlers, using ctrl_c fallback");
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Received Ctrl+C signal");
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
