//! Death episode -> display rows.

use crate::events::{CombatEvent, EventKind, StateSnapshot};
use crate::game_data::StatusLookup;
use crate::store::Death;

use super::row::{RowKind, StatusBadge, TimelineRow};

/// Build the display timeline for one death, newest event first.
///
/// Runs of consecutive heal-over-time ticks collapse into a single `Regen`
/// row that takes the newest tick's snapshot and the sum of all amounts.
/// Damage-over-time ticks are never merged.
///
/// Recomputed on every call; iterates a shared borrow of the event list so
/// edits can't interleave with aggregation.
pub fn build_timeline(death: &Death, statuses: &dyn StatusLookup) -> Vec<TimelineRow> {
    let time_of_death = death.time_of_death();
    let mut rows = Vec::with_capacity(death.events().len());
    let mut events = death.events().iter().rev().peekable();

    while let Some(event) = events.next() {
        let row = match event.kind() {
            EventKind::HealOverTime { amount } => {
                let mut total = u64::from(*amount);
                let mut merged = 1;
                while let Some(older) = events.next_if(|e| e.is_heal_over_time()) {
                    total += older.kind().amount().map_or(0, u64::from);
                    merged += 1;
                }
                TimelineRow::new(
                    event,
                    time_of_death,
                    RowKind::Regen { amount: total },
                    merged,
                    Vec::new(),
                )
            }
            EventKind::DamageOverTime { amount } => TimelineRow::new(
                event,
                time_of_death,
                RowKind::DamageOverTime { amount: *amount },
                1,
                Vec::new(),
            ),
            EventKind::DamageTaken(damage) => single_row(
                event,
                death,
                RowKind::Damage(damage.clone()),
                statuses,
            ),
            EventKind::Healed(heal) => {
                single_row(event, death, RowKind::Healed(heal.clone()), statuses)
            }
            EventKind::StatusEffectApplied(status) => single_row(
                event,
                death,
                RowKind::StatusApplied {
                    status: status.clone(),
                    info: statuses.resolve_status(status.status_id),
                },
                statuses,
            ),
        };
        rows.push(row);
    }

    rows
}

fn single_row(
    event: &CombatEvent,
    death: &Death,
    kind: RowKind,
    statuses: &dyn StatusLookup,
) -> TimelineRow {
    let badges = resolve_badges(event.snapshot(), statuses);
    TimelineRow::new(event, death.time_of_death(), kind, 1, badges)
}

/// Resolve the snapshot's active statuses for display.
///
/// Unknown ids and free company buffs are hidden; the stored snapshot keeps them.
pub fn resolve_badges(snapshot: &StateSnapshot, statuses: &dyn StatusLookup) -> Vec<StatusBadge> {
    snapshot
        .status_effects()
        .unwrap_or_default()
        .iter()
        .filter_map(|&status_id| {
            let info = statuses.resolve_status(status_id)?;
            (!info.is_fc_buff).then(|| StatusBadge {
                status_id,
                name: info.name,
                description: info.description,
                icon: info.icon,
            })
        })
        .collect()
}
