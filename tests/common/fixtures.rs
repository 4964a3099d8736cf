//! JSON bodies shaped like the API's responses

use serde_json::{Value, json};

/// The page served while the game is being updated
pub const MAINTENANCE_PAGE: &str =
    "<!DOCTYPE html><html><body><h1>The game is being updated.</h1></body></html>";

/// `elements/` body with players `1..=count`
pub fn players(count: u32) -> Value {
    Value::Array(
        (1..=count)
            .map(|id| {
                json!({
                    "id": id,
                    "web_name": format!("Player{id}"),
                    "team_code": 1 + id % 4,
                    "chance_of_playing_next_round": if id % 5 == 0 { json!(0) } else { Value::Null },
                    "transfers_in_event": id * 100,
                    "total_points": id * 3,
                    "now_cost": 45 + id
                })
            })
            .collect(),
    )
}

/// `element-summary/{id}` body with one history row per round
pub fn element_summary(id: u32, rounds: &[u32]) -> Value {
    json!({
        "history": rounds
            .iter()
            .map(|round| json!({
                "round": round,
                "element": id,
                "total_points": (id + round) % 12,
                "minutes": 90
            }))
            .collect::<Vec<_>>(),
        "fixtures": [
            {"difficulty": 2, "opponent_name": "Burnley", "event_name": "Gameweek 11", "is_home": true},
            {"difficulty": 4, "opponent_name": "Chelsea", "event_name": "Gameweek 12", "is_home": false}
        ]
    })
}

/// One standings page with `rows` managers starting at rank `first_rank`
pub fn standings_page(first_rank: u32, rows: u32, has_next: bool) -> Value {
    json!({
        "league": {"id": 313, "name": "Overall"},
        "standings": {
            "has_next": has_next,
            "number": (first_rank - 1) / 50 + 1,
            "results": (0..rows)
                .map(|i| {
                    let rank = first_rank + i;
                    json!({
                        "id": 500 + rank,
                        "entry_name": format!("Team {rank}"),
                        "player_name": format!("Manager {rank}"),
                        "rank": rank,
                        "total": 2_000 - rank,
                        "entry": 10_000 + rank
                    })
                })
                .collect::<Vec<_>>()
        }
    })
}
