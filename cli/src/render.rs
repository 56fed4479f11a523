//! Plain-text recap tables.

use std::fmt;

use deathrecap_core::timeline::TimelineRow;
use deathrecap_core::{DeathListEntry, PlayerSummary};
use deathrecap_types::formatting::format_amount;
use serde::Serialize;

/// Everything one replay shows, for `--json`.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub players: Vec<PlayerSummary>,
    pub deaths: Vec<DeathListEntry>,
    pub timeline: Vec<TimelineRow>,
}

pub fn render_report(report: &ReplayReport, european: bool) -> String {
    ReportText { report, european }.to_string()
}

struct ReportText<'a> {
    report: &'a ReplayReport,
    european: bool,
}

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // --- Players ---
        writeln!(f, "Players")?;
        if self.report.players.is_empty() {
            writeln!(f, "  (no deaths recorded)")?;
        }
        for player in &self.report.players {
            writeln!(
                f,
                "{} {:<20} {:>3} death(s), last {}",
                marker(player.selected),
                player.name,
                player.death_count,
                player.latest_title
            )?;
        }

        // --- Deaths ---
        if !self.report.deaths.is_empty() {
            writeln!(f, "\nDeaths")?;
            for death in &self.report.deaths {
                writeln!(
                    f,
                    "{} #{} {} ({} events)",
                    marker(death.selected),
                    death.display_index,
                    death.title,
                    death.event_count
                )?;
            }
        }

        // --- Timeline ---
        let timeline = TimelineText {
            rows: &self.report.timeline,
            european: self.european,
        };
        write!(f, "\n{}", timeline)
    }
}

struct TimelineText<'a> {
    rows: &'a [TimelineRow],
    european: bool,
}

impl fmt::Display for TimelineText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>7}  {:>10}  {:<24} {:<18} {:<26} Status Effects",
            "Time", "Amount", "Ability", "Source", "HP Before"
        )?;

        for row in self.rows {
            let statuses: Vec<&str> = row.status_effects.iter().map(|b| b.name.as_str()).collect();
            writeln!(
                f,
                "{:>7}  {:>10}  {:<24} {:<18} {:<26} {}",
                row.time_text(self.european),
                row.amount_text(self.european),
                row.ability_label(),
                row.source_label(),
                hp_cell(row, self.european),
                statuses.join(", ")
            )?;

            let tooltip = row.tooltip_lines();
            if !tooltip.is_empty() {
                writeln!(f, "{:>21}({})", "", tooltip.join("; "))?;
            }
        }
        Ok(())
    }
}

fn hp_cell(row: &TimelineRow, european: bool) -> String {
    let cell = match row.hp.max_hp {
        Some(max) => format!(
            "{}/{} ({:.0}%)",
            row.hp_text(european),
            format_amount(u64::from(max), european),
            row.hp.fraction * 100.0
        ),
        None => row.hp_text(european),
    };
    match row.hp.barrier_fraction {
        Some(barrier) => format!("{} +{:.0}%", cell, barrier * 100.0),
        None => cell,
    }
}

fn marker(selected: bool) -> &'static str {
    if selected { ">" } else { " " }
}
