//! A manager's picks for a gameweek and the logged-in user's own team.

use crate::error::Result;
use crate::records::{EntryPicks, MyTeam, Pick};
use crate::transport::Transport;
use crate::types::{EntryId, Gameweek, PlayerId};

use super::FplClient;

/// The players a manager picked for one gameweek
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagerTeam {
    /// Picked players, in squad order
    pub elements: Vec<PlayerId>,
    /// The captain, if one was set
    pub captain: Option<PlayerId>,
}

impl ManagerTeam {
    /// Build from a list of picks
    pub fn from_picks(picks: &[Pick]) -> Self {
        Self {
            elements: picks.iter().map(|p| p.element).collect(),
            captain: picks.iter().find(|p| p.is_captain).map(|p| p.element),
        }
    }
}

impl<T: Transport> FplClient<T> {
    /// Raw picks of `entry` in `gameweek`
    pub async fn entry_picks(&self, entry: EntryId, gameweek: Gameweek) -> Result<EntryPicks> {
        self.fetch(format!("entry/{entry}/event/{gameweek}/picks"))
            .await
    }

    /// Team and captain picked by `entry` in a past `gameweek`
    pub async fn manager_team(&self, entry: EntryId, gameweek: Gameweek) -> Result<ManagerTeam> {
        let picks = self.entry_picks(entry, gameweek).await?;
        Ok(ManagerTeam::from_picks(&picks.picks))
    }

    /// The logged-in user's current squad
    ///
    /// Needs a transport from a logged-in [`crate::session::Session`]; without
    /// one the API rejects the request and this fails with a transport error.
    pub async fn my_team(&self) -> Result<MyTeam> {
        self.fetch("transfers".to_string()).await
    }
}
