//! High-level API operations built on the aggregation engine.
//!
//! The `FplClient` methods are organized by domain:
//! - [`players`] - gameweeks, players, clubs, per-player history
//! - [`leagues`] - league tables, overall top managers, chip usage
//! - [`managers`] - a manager's picks and the logged-in user's team
//! - [`fixtures`] - upcoming fixtures report for the logged-in user's squad

mod fixtures;
mod leagues;
mod managers;
mod players;


pub use fixtures::{FixtureReport, Opponent, PlayerFixtures, gameweek_label, upcoming_gameweeks};
pub use leagues::{ChipUsage, OVERALL_LEAGUE, STANDINGS_PAGE_SIZE};
pub use managers::ManagerTeam;
pub use players::{DeadTransfer, PlayerDirectory};

use crate::aggregate::FanOut;
use crate::config::Config;
use crate::error::Result;
use crate::transport::{Transport, fetch_json};
use serde::de::DeserializeOwned;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Client for the FPL API
///
/// Generic over the [`Transport`] so the same operations run against the
/// live API (`HttpTransport`, optionally from a logged-in `Session`) or an
/// in-memory stub in tests.
pub struct FplClient<T> {
    transport: T,
    config: Config,
    fan_out: FanOut,
}

impl<T: Transport> FplClient<T> {
    /// Create a client, validating the configuration first
    ///
    /// # Errors
    /// Returns [`crate::Error::Config`] if the configuration is invalid
    pub fn new(transport: T, config: Config) -> Result<Self> {
        config.validate()?;
        let fan_out = FanOut::new(&config.fan_out);
        Ok(Self {
            transport,
            config,
            fan_out,
        })
    }

    /// Cancel in-flight fan-outs when `token` is cancelled
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.fan_out = self.fan_out.with_cancel_token(token);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch and decode one endpoint
    ///
    /// Takes the target by value so the returned future can be handed to the
    /// fan-out runner without borrowing a temporary.
    fn fetch<D: DeserializeOwned>(&self, target: String) -> impl Future<Output = Result<D>> + '_ {
        async move { fetch_json(&self.transport, &target).await }
    }
}
