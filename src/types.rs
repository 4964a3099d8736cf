//! Identifier newtypes and small enums shared across the crate

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Defines a transparent integer identifier with the usual conversions.
macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Get the inner value
            pub fn get(&self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

id_newtype!(
    /// Player ("element") identifier
    PlayerId
);

id_newtype!(
    /// Manager team ("entry") identifier
    EntryId
);

id_newtype!(
    /// League identifier
    LeagueId
);

id_newtype!(
    /// Premier League club code, as used by `team_code` on players
    TeamCode
);

id_newtype!(
    /// Gameweek ("event" / "round") number
    Gameweek
);

impl Gameweek {
    /// The following gameweek
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// League scoring format, which selects the standings endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeagueType {
    /// Classic (total points) league
    Classic,
    /// Head-to-head league
    H2h,
}

impl LeagueType {
    /// Relative path of the standings endpoint for this league type
    pub fn standings_path(&self) -> &'static str {
        match self {
            LeagueType::Classic => "leagues-classic-standings",
            LeagueType::H2h => "leagues-h2h-standings",
        }
    }
}

impl std::fmt::Display for LeagueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueType::Classic => write!(f, "classic"),
            LeagueType::H2h => write!(f, "h2h"),
        }
    }
}

impl std::str::FromStr for LeagueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(LeagueType::Classic),
            "h2h" => Ok(LeagueType::H2h),
            other => Err(Error::config(
                format!("league type must be 'classic' or 'h2h', got '{other}'"),
                "league_type",
            )),
        }
    }
}
