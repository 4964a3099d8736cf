//! Typed payloads for each API endpoint
//!
//! Records declared with `api_record!` read the fields the crate needs into
//! typed struct fields and keep the whole API object in `raw`, key order
//! included. Serializing such a record writes `raw` back out, so CSV exports
//! carry the full row with columns in the order the API sent them.

use crate::types::{EntryId, Gameweek, PlayerId, TeamCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A JSON object as received from the API, in server key order
pub type RawObject = Map<String, Value>;

/// Defines a record with typed fields backed by the raw API object.
///
/// Field docs come before any `#[serde(..)]` attributes, which apply to the
/// typed read only.
macro_rules! api_record {
    (
        $(#[doc = $doc:literal])*
        pub struct $name:ident {
            $(
                $(#[doc = $field_doc:literal])*
                $(#[serde($($field_attr:tt)*)])*
                pub $field:ident: $ty:ty,
            )+
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            $(
                $(#[doc = $field_doc])*
                pub $field: $ty,
            )+
            /// Every field of the API object, in server order
            pub raw: RawObject,
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                struct Fields {
                    $(
                        $(#[serde($($field_attr)*)])*
                        $field: $ty,
                    )+
                }

                let raw = RawObject::deserialize(deserializer)?;
                let fields: Fields = serde_json::from_value(Value::Object(raw.clone()))
                    .map_err(<D::Error as serde::de::Error>::custom)?;
                Ok(Self {
                    $($field: fields.$field,)+
                    raw,
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.raw.serialize(serializer)
            }
        }
    };
}

/// One server-paginated response
///
/// The paginator only needs the page's records in order and the
/// continuation flag.
pub trait Page {
    /// Record type carried by the page
    type Record;

    /// Whether the server has another page after this one
    fn has_next(&self) -> bool;

    /// Consume the page, yielding its records in server order
    fn into_records(self) -> Vec<Self::Record>;
}

api_record! {
    /// Gameweek entry from `events/`
    pub struct GameweekEvent {
        /// Gameweek number
        pub id: Gameweek,
        /// Whether this is the gameweek currently in play
        #[serde(default)]
        pub is_current: bool,
        /// Transfer deadline
        #[serde(default)]
        pub deadline_time: Option<DateTime<Utc>>,
    }
}

api_record! {
    /// Player entry from `elements/`
    pub struct Player {
        /// Player id
        pub id: PlayerId,
        /// Short display name
        pub web_name: String,
        /// Club code
        pub team_code: TeamCode,
        /// Percentage chance of playing next round; `None` means no news
        #[serde(default)]
        pub chance_of_playing_next_round: Option<u32>,
        /// Transfers in during the current gameweek
        #[serde(default)]
        pub transfers_in_event: u64,
    }
}

api_record! {
    /// Club entry from `teams/`
    pub struct Team {
        /// Club code
        pub code: TeamCode,
        /// Club name
        pub name: String,
    }
}

/// Per-player detail from `element-summary/{id}`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ElementSummary {
    /// Past gameweek stat rows
    #[serde(default)]
    pub history: Vec<HistoryRow>,
    /// Upcoming fixtures
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
}

api_record! {
    /// One gameweek of a player's history
    pub struct HistoryRow {
        /// Gameweek the row belongs to
        pub round: Gameweek,
    }
}

api_record! {
    /// One upcoming fixture for a player
    pub struct Fixture {
        /// Difficulty rating, 1 (easiest) to 5
        pub difficulty: u8,
        /// Opposing club name
        pub opponent_name: String,
        /// Gameweek label, e.g. "Gameweek 12"
        pub event_name: String,
    }
}

/// One page of league standings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StandingsPage {
    /// Standings body
    pub standings: Standings,
}

/// Standings body of a [`StandingsPage`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Standings {
    /// Rank-ordered rows on this page
    #[serde(default)]
    pub results: Vec<StandingRow>,
    /// Whether another page follows
    #[serde(default)]
    pub has_next: bool,
}

api_record! {
    /// One manager's row in a league table
    pub struct StandingRow {
        /// Manager team id
        pub entry: EntryId,
        /// Position in the league
        #[serde(default)]
        pub rank: u32,
    }
}

impl Page for StandingsPage {
    type Record = StandingRow;

    fn has_next(&self) -> bool {
        self.standings.has_next
    }

    fn into_records(self) -> Vec<StandingRow> {
        self.standings.results
    }
}

/// Response of `entry/{id}/event/{n}/picks`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryPicks {
    /// The fifteen picks
    pub picks: Vec<Pick>,
    /// Entry summary
    pub entry: EntrySummary,
}

api_record! {
    /// Entry summary embedded in picks responses
    pub struct EntrySummary {
        /// Gameweek the entry is currently on
        pub current_event: Gameweek,
    }
}

api_record! {
    /// One player pick in a manager's team
    pub struct Pick {
        /// Picked player
        pub element: PlayerId,
        /// Whether this pick is the captain
        #[serde(default)]
        pub is_captain: bool,
    }
}

/// Response of the authenticated `transfers` endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MyTeam {
    /// Current squad
    pub picks: Vec<Pick>,
    /// Entry summary
    pub entry: EntrySummary,
}

/// Response of `entry/{id}/history`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EntryHistory {
    /// Chips the manager has played
    #[serde(default)]
    pub chips: Vec<Chip>,
}

/// A played chip
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chip {
    /// Chip code, e.g. "3xc" or "bboost"
    pub name: String,
    /// Gameweek it was played in
    #[serde(default)]
    pub event: Option<Gameweek>,
}

impl Chip {
    /// Triple captain chip code
    pub const TRIPLE_CAPTAIN: &'static str = "3xc";
    /// Bench boost chip code
    pub const BENCH_BOOST: &'static str = "bboost";
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn player_keeps_unknown_fields() {
        let player: Player = serde_json::from_value(json!({
            "id": 1,
            "web_name": "Cech",
            "team_code": 3,
            "chance_of_playing_next_round": null,
            "transfers_in_event": 12,
            "total_points": 88,
            "now_cost": 50
        }))
        .unwrap();

        assert_eq!(player.id, PlayerId(1));
        assert_eq!(player.chance_of_playing_next_round, None);
        assert_eq!(player.raw["total_points"], 88);

        let back = serde_json::to_value(&player).unwrap();
        assert_eq!(back["now_cost"], 50);
        assert_eq!(back["web_name"], "Cech");
    }

    fn keys(value: &Value) -> Vec<&str> {
        value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn history_row_field_order_is_preserved() {
        let row: HistoryRow = serde_json::from_str(
            r#"{"element": 9, "fixture": 41, "total_points": 6, "round": 3, "minutes": 90}"#,
        )
        .unwrap();
        assert_eq!(row.round, Gameweek(3));

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            keys(&value),
            ["element", "fixture", "total_points", "round", "minutes"]
        );
    }

    #[test]
    fn standing_row_serializes_in_server_order() {
        let row: StandingRow = serde_json::from_str(
            r#"{"id": 7, "entry_name": "A", "rank": 1, "total": 99, "entry": 10}"#,
        )
        .unwrap();
        assert_eq!(row.entry, EntryId(10));
        assert_eq!(row.rank, 1);

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(keys(&value), ["id", "entry_name", "rank", "total", "entry"]);
        assert_eq!(value["entry"], 10);
    }

    #[test]
    fn missing_typed_field_fails_the_record() {
        let err = serde_json::from_str::<Player>(r#"{"id": 1, "team_code": 3}"#).unwrap_err();
        assert!(err.to_string().contains("web_name"), "error: {err}");
        assert!(err.is_data());
    }

    #[test]
    fn standings_page_exposes_records_and_flag() {
        let page: StandingsPage = serde_json::from_value(json!({
            "standings": {
                "has_next": true,
                "results": [
                    {"entry": 10, "rank": 1, "entry_name": "A"},
                    {"entry": 20, "rank": 2, "entry_name": "B"}
                ]
            }
        }))
        .unwrap();

        assert!(page.has_next());
        let rows = page.into_records();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].entry, EntryId(20));
    }

    #[test]
    fn gameweek_event_parses_deadline() {
        let event: GameweekEvent = serde_json::from_value(json!({
            "id": 12,
            "is_current": true,
            "deadline_time": "2017-11-18T11:00:00Z"
        }))
        .unwrap();
        assert!(event.is_current);
        assert!(event.deadline_time.is_some());
    }
}
