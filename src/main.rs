//! fpl-dl command-line entry point
//!
//! ```bash
//! # Upcoming fixtures for your squad
//! fpl-dl -e me@example.com -p secret
//!
//! # Export a league table
//! fpl-dl -o league.csv league 313 --type classic
//! ```

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::CliArgs;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    initialize_logging(args.log_level(), args.no_color);

    if let Err(e) = cli::run(args, fpl_dl::cancel_on_signal()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so printed results on stdout stay clean
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn initialize_logging(level: Level, no_color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fpl_dl={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .init();
}
