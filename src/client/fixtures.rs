//! Upcoming fixtures for the logged-in user's squad.

use std::collections::HashMap;

use tracing::info;

use crate::error::{Error, FetchFailure, Result};
use crate::records::{ElementSummary, Fixture};
use crate::transport::Transport;
use crate::types::{Gameweek, PlayerId, TeamCode};

use super::{FplClient, PlayerDirectory};

/// One opponent in a gameweek
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opponent {
    /// Opposing club
    pub name: String,
    /// Difficulty rating, 1 (easiest) to 5
    pub difficulty: u8,
}

impl From<&Fixture> for Opponent {
    fn from(fixture: &Fixture) -> Self {
        Self {
            name: fixture.opponent_name.clone(),
            difficulty: fixture.difficulty,
        }
    }
}

/// One squad player's opponents across the report's gameweeks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerFixtures {
    /// Player id
    pub player: PlayerId,
    /// Player display name
    pub name: String,
    /// Club name
    pub team: String,
    /// Opponents per gameweek, aligned with [`FixtureReport::gameweeks`]
    ///
    /// Empty for a blank gameweek, more than one for a double gameweek.
    pub opponents: Vec<Vec<Opponent>>,
}

/// Upcoming fixtures for every player in the squad
#[derive(Debug)]
pub struct FixtureReport {
    /// Gameweeks covered, starting after the current one
    pub gameweeks: Vec<Gameweek>,
    /// One row per squad player, in squad order
    pub players: Vec<PlayerFixtures>,
    /// Players whose fixtures could not be fetched
    pub failures: Vec<FetchFailure<PlayerId>>,
}

/// Label the API uses for a gameweek in `event_name`
pub fn gameweek_label(gameweek: Gameweek) -> String {
    format!("Gameweek {gameweek}")
}

/// The gameweeks after `current`, at most `horizon` of them, never past the end of the season
pub fn upcoming_gameweeks(current: Gameweek, horizon: u32, season_length: u32) -> Vec<Gameweek> {
    let first = current.get() + 1;
    let last = current.get().saturating_add(horizon).min(season_length);
    (first..=last).map(Gameweek).collect()
}

fn player_row(
    player: PlayerId,
    fixtures: &[Fixture],
    labels: &[String],
    directory: &PlayerDirectory,
    team_names: &HashMap<TeamCode, String>,
) -> Result<PlayerFixtures> {
    let code = directory.team_code(player)?;
    let team = team_names
        .get(&code)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("team {code}")))?;

    let opponents = labels
        .iter()
        .map(|label| {
            fixtures
                .iter()
                .filter(|f| &f.event_name == label)
                .map(Opponent::from)
                .collect()
        })
        .collect();

    Ok(PlayerFixtures {
        player,
        name: directory.name(player)?.to_string(),
        team,
        opponents,
    })
}

impl<T: Transport> FplClient<T> {
    /// Opponents of every squad player over the next `horizon` gameweeks
    ///
    /// Needs a transport from a logged-in session. The report never runs past
    /// the season length in [`crate::config::ReportConfig`].
    pub async fn upcoming_fixtures(&self, horizon: u32) -> Result<FixtureReport> {
        let my_team = self.my_team().await?;
        let directory = self.player_directory().await?;
        let team_names = self.team_names().await?;

        let gameweeks = upcoming_gameweeks(
            my_team.entry.current_event,
            horizon,
            self.config.report.season_length,
        );
        let labels: Vec<String> = gameweeks.iter().copied().map(gameweek_label).collect();

        let squad: Vec<PlayerId> = my_team.picks.iter().map(|p| p.element).collect();
        info!(
            players = squad.len(),
            gameweeks = gameweeks.len(),
            "Fetching upcoming fixtures"
        );

        let report = self
            .fan_out
            .collect(
                squad,
                |id| self.fetch::<ElementSummary>(format!("element-summary/{id}")),
                |id, summary: ElementSummary| vec![(*id, summary.fixtures)],
            )
            .await?;

        let players = report
            .records
            .iter()
            .map(|(id, fixtures)| player_row(*id, fixtures, &labels, &directory, &team_names))
            .collect::<Result<Vec<_>>>()?;

        Ok(FixtureReport {
            gameweeks,
            players,
            failures: report.failures,
        })
    }
}
