//! Command-line interface for fpl-dl
//!
//! Parses arguments, builds the client (logging in when the command needs
//! the user's own team) and prints or exports each command's result.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};

use fpl_dl::client::FixtureReport;
use fpl_dl::export::{CsvExporter, FixtureTable};
use fpl_dl::{
    Config, Credentials, EntryId, Error, FetchFailure, FplClient, Gameweek, HttpTransport,
    LeagueId, Result, Session,
};

/// Fantasy Premier League data downloader
#[derive(Parser, Debug)]
#[command(
    name = "fpl-dl",
    version,
    about = "Collect Fantasy Premier League data concurrently",
    long_about = "Collects league tables, player histories and team reports from the
Fantasy Premier League API, printing them or exporting them as delimited files."
)]
pub struct CliArgs {
    /// Account email, needed for the fixtures report
    #[arg(short = 'e', long, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Account password
    #[arg(short = 'p', long, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Configuration file path (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Maximum number of requests in flight
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Write the result to this file instead of printing it
    ///
    /// Relative paths are placed under the configured output directory.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Quiet mode (warnings and errors only)
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Command to run; defaults to the fixtures report
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for fpl-dl
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Upcoming fixtures for your squad (requires credentials)
    Fixtures {
        /// Number of gameweeks to show (defaults to the configured horizon)
        #[arg(long, value_name = "N")]
        horizon: Option<u32>,
    },

    /// Full table of a league
    League {
        /// League id
        id: LeagueId,

        /// League type (classic or h2h)
        #[arg(long = "type", value_name = "TYPE", default_value = "classic")]
        league_type: String,
    },

    /// Per-gameweek history of every player
    History {
        /// Only keep rows for this gameweek
        #[arg(short = 'g', long)]
        gameweek: Option<Gameweek>,
    },

    /// Top managers of the overall league
    Top {
        /// Number of managers
        count: usize,
    },

    /// Triple captain and bench boost usage among the top managers
    Chips {
        /// Number of managers
        count: usize,
    },

    /// Players with no chance of playing who are still transferred in
    DeadTransfers,

    /// Every player with season totals
    Players,

    /// A manager's team in a past gameweek
    Picks {
        /// Manager team id
        entry: EntryId,

        /// Gameweek
        gameweek: Gameweek,
    },

    /// The gameweek currently in play
    Gameweek,
}

impl CliArgs {
    /// Command to run, falling back to the fixtures report
    pub fn selected_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Fixtures { horizon: None })
    }

    /// Log level selected by the verbosity flags
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::WARN
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Load the config file (or defaults) and apply command-line overrides
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config_file {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };
        if let Some(workers) = self.workers {
            config.fan_out.max_workers = workers;
        }
        config.validate()?;
        Ok(config)
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials::new(email, password)),
            _ => None,
        }
    }
}

/// Run the parsed command to completion
pub async fn run(args: CliArgs, cancel: CancellationToken) -> Result<()> {
    let config = args.load_config()?;
    let command = args.selected_command();

    let transport = match (args.credentials(), &command) {
        (Some(credentials), _) => {
            info!(email = %credentials.email, "Logging in");
            Session::login(&config.api, &credentials).await?.transport()?
        }
        (None, Commands::Fixtures { .. }) => {
            return Err(Error::Auth(
                "the fixtures report needs --email and --password".to_string(),
            ));
        }
        (None, _) => HttpTransport::anonymous(&config.api)?,
    };

    let exporter = CsvExporter::new(&config.export);
    let client = FplClient::new(transport, config)?.with_cancel_token(cancel);
    let output = Output {
        exporter,
        file: args.output.clone(),
    };

    match command {
        Commands::Fixtures { horizon } => {
            let horizon = horizon.unwrap_or(client.config().report.fixture_horizon);
            let report = client.upcoming_fixtures(horizon).await?;
            report_failures("fixtures", &report.failures);
            if output.file.is_some() {
                output.emit(&fixture_rows(&report)).await?;
            } else {
                println!("{}", FixtureTable::new(!args.no_color).render(&report));
            }
        }
        Commands::League { id, league_type } => {
            let rows = client.league_table_named(id, &league_type).await?;
            output.emit(&rows).await?;
        }
        Commands::History { gameweek } => {
            let report = client.player_gameweek_history(gameweek).await?;
            report_failures("player history", &report.failures);
            if report.aborted {
                warn!("History run stopped early; rows may be incomplete");
            }
            output.emit(&report.records).await?;
        }
        Commands::Top { count } => {
            let report = client.top_managers(count).await?;
            report_failures("standings pages", &report.failures);
            output.emit(&report.records).await?;
        }
        Commands::Chips { count } => {
            let usage = client.chip_usage(count).await?;
            report_failures("manager history", &usage.failures);
            println!("Managers:       {}", usage.managers);
            println!("Triple captain: {}", usage.triple_captain);
            println!("Bench boost:    {}", usage.bench_boost);
            println!("Both:           {}", usage.both);
        }
        Commands::DeadTransfers => {
            let dead = client.dead_transfers().await?;
            output.emit(&dead).await?;
        }
        Commands::Players => {
            let players = client.players().await?;
            output.emit(&players).await?;
        }
        Commands::Picks { entry, gameweek } => {
            let team = client.manager_team(entry, gameweek).await?;
            let directory = client.player_directory().await?;
            for element in &team.elements {
                let marker = if team.captain == Some(*element) { " (C)" } else { "" };
                println!("{}{}", directory.name(*element)?, marker);
            }
        }
        Commands::Gameweek => {
            println!("{}", client.current_gameweek().await?);
        }
    }
    Ok(())
}

/// Destination for tabular results
struct Output {
    exporter: CsvExporter,
    file: Option<PathBuf>,
}

impl Output {
    /// Export to the output file if one was given, otherwise print
    async fn emit<S: Serialize>(&self, records: &[S]) -> Result<()> {
        match &self.file {
            Some(file) => {
                let path = self.exporter.write(file, records).await?;
                println!("Wrote {} records to {}", records.len(), path.display());
            }
            None => print!("{}", self.exporter.render(records)?),
        }
        Ok(())
    }
}

fn report_failures<I: std::fmt::Display>(what: &str, failures: &[FetchFailure<I>]) {
    if failures.is_empty() {
        return;
    }
    warn!(count = failures.len(), "Some {} could not be fetched", what);
    for failure in failures {
        warn!(%failure, "Fetch failed");
    }
}

/// Flatten the fixtures report into one record per player for export
fn fixture_rows(report: &FixtureReport) -> Vec<Map<String, Value>> {
    report
        .players
        .iter()
        .map(|player| {
            let mut row = Map::new();
            row.insert("player".to_string(), Value::from(player.name.clone()));
            row.insert("team".to_string(), Value::from(player.team.clone()));
            for (gameweek, opponents) in report.gameweeks.iter().zip(&player.opponents) {
                let cell = opponents
                    .iter()
                    .map(|o| format!("{} ({})", o.name, o.difficulty))
                    .collect::<Vec<_>>()
                    .join(" / ");
                row.insert(fpl_dl::client::gameweek_label(*gameweek), Value::from(cell));
            }
            row
        })
        .collect()
}
