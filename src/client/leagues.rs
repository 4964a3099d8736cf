//! League tables, the overall top managers and chip usage among them.

use tracing::info;

use crate::aggregate::{FanOutReport, collect_pages};
use crate::error::{Error, FetchFailure, Result};
use crate::records::{Chip, EntryHistory, StandingRow, StandingsPage};
use crate::transport::Transport;
use crate::types::{EntryId, LeagueId, LeagueType};

use super::FplClient;

/// The overall league every manager is entered into
pub const OVERALL_LEAGUE: LeagueId = LeagueId(313);

/// Rows per standings page
pub const STANDINGS_PAGE_SIZE: usize = 50;

/// Chip usage among a set of managers
#[derive(Debug, Default)]
pub struct ChipUsage {
    /// Managers whose history was fetched
    pub managers: usize,
    /// Managers who played the triple captain chip
    pub triple_captain: usize,
    /// Managers who played the bench boost chip
    pub bench_boost: usize,
    /// Managers who played both
    pub both: usize,
    /// Managers whose history could not be fetched
    pub failures: Vec<FetchFailure<EntryId>>,
}

fn standings_target(league_type: LeagueType, league_id: LeagueId, page: u32) -> String {
    format!(
        "{}/{}?phase=1&le-page=1&ls-page={}",
        league_type.standings_path(),
        league_id,
        page
    )
}

impl<T: Transport> FplClient<T> {
    /// Full table of a league, in rank order
    ///
    /// Walks the standings pages one by one until the server reports the last
    /// page. Any failed page fails the whole table.
    pub async fn league_table(
        &self,
        league_id: LeagueId,
        league_type: LeagueType,
    ) -> Result<Vec<StandingRow>> {
        let rows = collect_pages(self.config.pagination.max_pages, |page| {
            self.fetch::<StandingsPage>(standings_target(league_type, league_id, page))
        })
        .await?;
        info!(league = %league_id, %league_type, rows = rows.len(), "League table collected");
        Ok(rows)
    }

    /// [`league_table`](Self::league_table) with the league type given as text
    ///
    /// # Errors
    /// Returns [`Error::Config`] without making any request unless
    /// `league_type` is "classic" or "h2h".
    pub async fn league_table_named(
        &self,
        league_id: LeagueId,
        league_type: &str,
    ) -> Result<Vec<StandingRow>> {
        let league_type: LeagueType = league_type.parse()?;
        self.league_table(league_id, league_type).await
    }

    /// The top `count` managers of the overall league, in rank order
    ///
    /// The page numbers are known up front, so pages are fetched concurrently
    /// rather than walked. Failed pages are reported in the returned failures
    /// and leave a gap in the ranking.
    pub async fn top_managers(&self, count: usize) -> Result<FanOutReport<u32, StandingRow>> {
        if count == 0 {
            return Err(Error::config("manager count must be at least 1", "count"));
        }
        let pages = u32::try_from(count.div_ceil(STANDINGS_PAGE_SIZE))
            .map_err(|_| Error::config(format!("manager count {count} is too large"), "count"))?;
        info!(count, pages, "Fetching top managers");

        let mut report = self
            .fan_out
            .collect(
                (1..=pages).collect::<Vec<u32>>(),
                |page| {
                    self.fetch::<StandingsPage>(standings_target(
                        LeagueType::Classic,
                        OVERALL_LEAGUE,
                        page,
                    ))
                },
                |_, page: StandingsPage| page.standings.results,
            )
            .await?;

        report.records.truncate(count);
        Ok(report)
    }

    /// How many of the top `count` managers have played the triple captain
    /// and bench boost chips
    pub async fn chip_usage(&self, count: usize) -> Result<ChipUsage> {
        let top = self.top_managers(count).await?;
        let entries: Vec<EntryId> = top.records.iter().map(|row| row.entry).collect();
        if entries.is_empty() {
            return Err(Error::NotFound("no managers in the overall league".to_string()));
        }

        let report = self
            .fan_out
            .collect(
                entries,
                |entry| self.fetch::<EntryHistory>(format!("entry/{entry}/history")),
                |_, history: EntryHistory| {
                    let played = |code: &str| history.chips.iter().any(|c| c.name == code);
                    vec![(played(Chip::TRIPLE_CAPTAIN), played(Chip::BENCH_BOOST))]
                },
            )
            .await?;

        let mut usage = ChipUsage {
            managers: report.records.len(),
            failures: report.failures,
            ..ChipUsage::default()
        };
        for (triple_captain, bench_boost) in report.records {
            usage.triple_captain += usize::from(triple_captain);
            usage.bench_boost += usize::from(bench_boost);
            usage.both += usize::from(triple_captain && bench_boost);
        }
        Ok(usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standings_target_matches_api_layout() {
        assert_eq!(
            standings_target(LeagueType::H2h, LeagueId(42), 3),
            "leagues-h2h-standings/42?phase=1&le-page=1&ls-page=3"
        );
    }
}
