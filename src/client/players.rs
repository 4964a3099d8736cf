//! Gameweeks, players, clubs and per-player history.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::aggregate::FanOutReport;
use crate::error::{Error, Result};
use crate::records::{ElementSummary, GameweekEvent, HistoryRow, Player, Team};
use crate::transport::Transport;
use crate::types::{Gameweek, PlayerId, TeamCode};

use super::FplClient;

/// Lookup tables built from the full player list
#[derive(Clone, Debug, Default)]
pub struct PlayerDirectory {
    /// Player id to short display name
    pub names: HashMap<PlayerId, String>,
    /// Player id to club code
    pub team_codes: HashMap<PlayerId, TeamCode>,
}

impl PlayerDirectory {
    /// Build the lookup tables from a player list
    pub fn from_players(players: &[Player]) -> Self {
        let mut directory = Self::default();
        for player in players {
            directory.names.insert(player.id, player.web_name.clone());
            directory.team_codes.insert(player.id, player.team_code);
        }
        directory
    }

    /// Display name of a player
    pub fn name(&self, id: PlayerId) -> Result<&str> {
        self.names
            .get(&id)
            .map(String::as_str)
            .ok_or_else(|| Error::NotFound(format!("player {id}")))
    }

    /// Club code of a player
    pub fn team_code(&self, id: PlayerId) -> Result<TeamCode> {
        self.team_codes
            .get(&id)
            .copied()
            .ok_or_else(|| Error::NotFound(format!("player {id}")))
    }
}

/// A player transferred in this gameweek who is certain not to play
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeadTransfer {
    /// Player display name
    pub name: String,
    /// Transfers in during the current gameweek
    pub transfers_in: u64,
}

impl<T: Transport> FplClient<T> {
    /// All gameweeks of the season
    pub async fn gameweeks(&self) -> Result<Vec<GameweekEvent>> {
        self.fetch("events/".to_string()).await
    }

    /// The gameweek currently in play
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] before the season starts, when no gameweek is current
    pub async fn current_gameweek(&self) -> Result<Gameweek> {
        self.gameweeks()
            .await?
            .into_iter()
            .find(|event| event.is_current)
            .map(|event| event.id)
            .ok_or_else(|| Error::NotFound("current gameweek".to_string()))
    }

    /// Every player with season totals, club and availability
    pub async fn players(&self) -> Result<Vec<Player>> {
        self.fetch("elements/".to_string()).await
    }

    /// Player name and club lookup tables
    pub async fn player_directory(&self) -> Result<PlayerDirectory> {
        Ok(PlayerDirectory::from_players(&self.players().await?))
    }

    /// Every Premier League club
    pub async fn teams(&self) -> Result<Vec<Team>> {
        self.fetch("teams/".to_string()).await
    }

    /// Club code to club name
    pub async fn team_names(&self) -> Result<HashMap<TeamCode, String>> {
        Ok(self
            .teams()
            .await?
            .into_iter()
            .map(|team| (team.code, team.name))
            .collect())
    }

    /// Per-gameweek history of every player
    ///
    /// Fetches `element-summary/{id}` for every player concurrently. With a
    /// `gameweek`, only history rows for that round are kept. Rows are grouped
    /// by player in the order of the player list.
    ///
    /// When early abort is enabled in the config and a gameweek is given, the
    /// run stops at the first result whose earliest row is already past that
    /// gameweek. That result can arrive before slower players that do have
    /// the round, so the output is then best-effort.
    pub async fn player_gameweek_history(
        &self,
        gameweek: Option<Gameweek>,
    ) -> Result<FanOutReport<PlayerId, HistoryRow>> {
        let ids: Vec<PlayerId> = self.players().await?.into_iter().map(|p| p.id).collect();
        info!(players = ids.len(), ?gameweek, "Fetching player history");

        let fetch = |id: PlayerId| self.fetch::<ElementSummary>(format!("element-summary/{id}"));
        let select = |_: &PlayerId, summary: ElementSummary| match gameweek {
            Some(round) => summary
                .history
                .into_iter()
                .filter(|row| row.round == round)
                .collect(),
            None => summary.history,
        };

        let report = match gameweek {
            Some(round) => {
                self.fan_out
                    .collect_until(ids, fetch, select, |_, summary: &ElementSummary| {
                        summary.history.first().is_some_and(|row| row.round > round)
                    })
                    .await?
            }
            None => self.fan_out.collect(ids, fetch, select).await?,
        };

        info!(
            rows = report.records.len(),
            failures = report.failures.len(),
            "Player history collected"
        );
        Ok(report)
    }

    /// Players with no chance of playing who were still transferred in
    ///
    /// Ordered by transfers in, highest first, then by name.
    pub async fn dead_transfers(&self) -> Result<Vec<DeadTransfer>> {
        let mut dead: Vec<DeadTransfer> = self
            .players()
            .await?
            .into_iter()
            .filter(|p| p.chance_of_playing_next_round == Some(0))
            .map(|p| DeadTransfer {
                name: p.web_name,
                transfers_in: p.transfers_in_event,
            })
            .collect();

        dead.sort_by(|a, b| {
            b.transfers_in
                .cmp(&a.transfers_in)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(dead)
    }
}
