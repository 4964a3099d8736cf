//! Terminal table for the upcoming-fixtures report

use nu_ansi_term::Color;
use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Panel, Style, object::Segment},
};

use crate::client::{FixtureReport, Opponent, gameweek_label};

/// Title shown above the table
pub const TITLE: &str = "Upcoming Fixtures";

/// Renders a [`FixtureReport`] with one row per squad player and one column
/// per gameweek
pub struct FixtureTable {
    use_colors: bool,
}

impl FixtureTable {
    /// Create a table renderer
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Render the report
    pub fn render(&self, report: &FixtureReport) -> String {
        let mut builder = Builder::default();

        let mut header = vec!["Player".to_string()];
        header.extend(report.gameweeks.iter().copied().map(gameweek_label));
        builder.push_record(header);

        for player in &report.players {
            let mut row = vec![format!("{}\n({})", player.name, player.team)];
            row.extend(player.opponents.iter().map(|gw| self.cell(gw)));
            builder.push_record(row);
        }

        let mut table = builder.build();
        self.apply_style(&mut table);
        table.to_string()
    }

    /// Opponents of one gameweek, one per line; empty for a blank gameweek
    fn cell(&self, opponents: &[Opponent]) -> String {
        opponents
            .iter()
            .map(|o| self.paint(o))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn paint(&self, opponent: &Opponent) -> String {
        if !self.use_colors {
            return opponent.name.clone();
        }
        difficulty_color(opponent.difficulty)
            .paint(opponent.name.as_str())
            .to_string()
    }

    fn apply_style(&self, table: &mut Table) {
        table
            .with(Style::modern())
            .modify(Segment::all(), Alignment::center())
            .with(Panel::header(TITLE));
    }
}

/// Colour for a difficulty rating: easy green, medium yellow, hard red
pub fn difficulty_color(difficulty: u8) -> Color {
    match difficulty {
        0..=2 => Color::Green,
        3 => Color::Yellow,
        _ => Color::Red,
    }
}
