//! End-to-end aggregation against a mock API server.
//!
//! Drives `HttpTransport` through the client operations with wiremock
//! standing in for the Fantasy Premier League API.

mod common;

use std::time::Duration;

use fpl_dl::export::CsvExporter;
use fpl_dl::{Error, Gameweek, LeagueId, LeagueType, PlayerId};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn league_table_walks_pages_until_has_next_is_false() {
    let server = MockServer::start().await;
    common::mount_standings_page(&server, 313, 1, common::standings_page(1, 50, true)).await;
    common::mount_standings_page(&server, 313, 2, common::standings_page(51, 50, true)).await;
    common::mount_standings_page(&server, 313, 3, common::standings_page(101, 17, false)).await;

    let client = common::anonymous_client(&server, 4);
    let rows = client
        .league_table(LeagueId(313), LeagueType::Classic)
        .await
        .unwrap();

    assert_eq!(rows.len(), 117);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[116].rank, 117);
    assert_eq!(rows[60].raw["entry_name"], "Team 61");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn league_table_fails_whole_when_a_page_fails() {
    let server = MockServer::start().await;
    common::mount_standings_page(&server, 313, 1, common::standings_page(1, 50, true)).await;
    Mock::given(method("GET"))
        .and(path("/drf/leagues-classic-standings/313"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(10)
        .mount(&server)
        .await;

    let client = common::anonymous_client(&server, 4);
    let err = client
        .league_table(LeagueId(313), LeagueType::Classic)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn player_history_isolates_failed_player() {
    let server = MockServer::start().await;
    common::mount_json(&server, "elements/", common::players(12)).await;
    for id in 1..=12u32 {
        if id == 7 {
            common::mount_status(&server, "element-summary/7", 500).await;
        } else {
            common::mount_json(
                &server,
                &format!("element-summary/{id}"),
                common::element_summary(id, &[1, 2, 3]),
            )
            .await;
        }
    }

    let client = common::anonymous_client(&server, 3);
    let report = client.player_gameweek_history(None).await.unwrap();

    assert_eq!(report.completed, 12);
    assert_eq!(report.records.len(), 11 * 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].id, PlayerId(7));
    assert!(matches!(
        report.failures[0].error,
        Error::HttpStatus { status: 500, .. }
    ));
}

#[tokio::test]
async fn player_history_is_grouped_by_player_despite_slow_responses() {
    let server = MockServer::start().await;
    common::mount_json(&server, "elements/", common::players(6)).await;
    for id in 1..=6u32 {
        // Earlier players answer later
        Mock::given(method("GET"))
            .and(path(format!("/drf/element-summary/{id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(common::element_summary(id, &[4, 5]))
                    .set_delay(Duration::from_millis(u64::from(7 - id) * 20)),
            )
            .mount(&server)
            .await;
    }

    let client = common::anonymous_client(&server, 6);
    let report = client
        .player_gameweek_history(Some(Gameweek(5)))
        .await
        .unwrap();

    let elements: Vec<u64> = report
        .records
        .iter()
        .map(|row| row.raw["element"].as_u64().unwrap())
        .collect();
    assert_eq!(elements, [1, 2, 3, 4, 5, 6]);
    assert!(report.records.iter().all(|row| row.round == Gameweek(5)));
}

#[tokio::test]
async fn maintenance_page_is_reported_as_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drf/events/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::MAINTENANCE_PAGE))
        .mount(&server)
        .await;

    let client = common::anonymous_client(&server, 2);
    let err = client.current_gameweek().await.unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.is_service_unavailable());
    assert!(err.to_string().contains("being updated"));
}

#[tokio::test]
async fn service_unavailable_status_is_classified() {
    let server = MockServer::start().await;
    common::mount_status(&server, "elements/", 503).await;

    let client = common::anonymous_client(&server, 2);
    let err = client.players().await.unwrap_err();

    assert!(err.is_service_unavailable());
    assert!(err.is_transport());
}

#[tokio::test]
async fn top_managers_export_keeps_api_field_order() {
    let server = MockServer::start().await;
    common::mount_standings_page(&server, 313, 1, common::standings_page(1, 50, true)).await;
    common::mount_standings_page(&server, 313, 2, common::standings_page(51, 50, true)).await;

    let client = common::anonymous_client(&server, 2);
    let report = client.top_managers(60).await.unwrap();
    assert_eq!(report.records.len(), 60);

    let temp = TempDir::new().unwrap();
    let mut export = client.config().export.clone();
    export.output_dir = temp.path().to_path_buf();
    let path = CsvExporter::new(&export)
        .write("top.csv", &report.records)
        .await
        .unwrap();

    let content = std::fs::read_to_string(path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("id\tentry_name\tplayer_name\trank\ttotal\tentry")
    );
    assert_eq!(lines.next(), Some("501\tTeam 1\tManager 1\t1\t1999\t10001"));
    assert_eq!(content.lines().count(), 61);
}

#[tokio::test]
async fn dead_transfers_over_http() {
    let server = MockServer::start().await;
    common::mount_json(&server, "elements/", common::players(12)).await;

    let client = common::anonymous_client(&server, 2);
    let dead = client.dead_transfers().await.unwrap();

    let names: Vec<&str> = dead.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Player10", "Player5"]);
    assert_eq!(dead[0].transfers_in, 1000);
}
