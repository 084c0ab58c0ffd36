//! Period and time-slot reconciliation.
//!
//! A leave or absence covers a set of class periods. Display works in both
//! directions: a selected period-ID set is reduced to a human-readable label
//! (a preset time-slot name, a "full day" marker, or a compacted period
//! list), and a chosen time slot expands back into its configured period IDs.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Label used when a selection covers the whole school day (or is empty).
pub const FULL_DAY_LABEL: &str = "全天";

/// Separator between tokens in a composed label.
const TOKEN_SEPARATOR: &str = "、";

lazy_static! {
    /// Matches ordinary numbered periods like "第3节"; anything else
    /// ("早读", "晚自习") is a special period and never folded into a range.
    static ref NUMBERED_PERIOD: Regex = Regex::new(r"^第(\d+)节$").unwrap();
}

/// The atomic scheduling unit of a school day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: i64,
    pub name: String,
    pub display_order: i32,
}

/// A named preset grouping of periods, e.g. "上午" covering periods 1-4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: i64,
    pub name: String,
    pub period_ids: Vec<i64>,
}

/// Result of reconciling a period-ID selection against the configured
/// periods and time slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled<'a> {
    /// The selection is exactly one configured slot's period set.
    Slot(&'a TimeSlot),
    /// The selection covers every configured period (or is empty).
    FullDay,
    /// Anything else: a compacted period listing.
    Custom(String),
}

fn id_set(ids: &[i64]) -> BTreeSet<i64> {
    ids.iter().copied().collect()
}

/// Finds the time slot whose period set equals `selection` exactly
/// (as a set: order and duplicates are ignored).
pub fn match_slot<'a>(selection: &[i64], slots: &'a [TimeSlot]) -> Option<&'a TimeSlot> {
    let wanted = id_set(selection);
    if wanted.is_empty() {
        return None;
    }
    slots.iter().find(|slot| id_set(&slot.period_ids) == wanted)
}

/// Expands a slot choice into its configured period-ID selection.
pub fn slot_selection(slot_id: i64, slots: &[TimeSlot]) -> Option<Vec<i64>> {
    slots
        .iter()
        .find(|slot| slot.id == slot_id)
        .map(|slot| slot.period_ids.clone())
}

/// Reconciles a selection: slot match first, then full-day coverage, then a
/// compacted listing. Unknown period IDs are dropped from composition.
pub fn reconcile<'a>(
    selection: &[i64],
    periods: &[Period],
    slots: &'a [TimeSlot],
) -> Reconciled<'a> {
    if selection.is_empty() {
        return Reconciled::FullDay;
    }
    if let Some(slot) = match_slot(selection, slots) {
        return Reconciled::Slot(slot);
    }

    let selected = id_set(selection);
    let all_ids: BTreeSet<i64> = periods.iter().map(|p| p.id).collect();
    if !all_ids.is_empty() && all_ids.iter().all(|id| selected.contains(id)) {
        return Reconciled::FullDay;
    }

    let mut chosen: Vec<&Period> = periods.iter().filter(|p| selected.contains(&p.id)).collect();
    if chosen.is_empty() {
        return Reconciled::FullDay;
    }
    chosen.sort_by_key(|p| p.display_order);

    Reconciled::Custom(compose_tokens(&chosen).join(TOKEN_SEPARATOR))
}

/// Display label for a selection. Slot matches render parenthesized, the way
/// the attendance views annotate preset slots.
pub fn selection_label(selection: &[i64], periods: &[Period], slots: &[TimeSlot]) -> String {
    match reconcile(selection, periods, slots) {
        Reconciled::Slot(slot) => format!("({})", slot.name),
        Reconciled::FullDay => FULL_DAY_LABEL.to_string(),
        Reconciled::Custom(label) => label,
    }
}

fn numbered(period: &Period) -> Option<u32> {
    NUMBERED_PERIOD
        .captures(&period.name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Run-length-encodes consecutive numbered periods into range tokens;
/// special periods stay as standalone tokens.
fn compose_tokens(ordered: &[&Period]) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut run: Vec<(u32, &Period)> = Vec::new();

    let mut flush = |run: &mut Vec<(u32, &Period)>, tokens: &mut Vec<String>| {
        match run.as_slice() {
            [] => {}
            [(_, only)] => tokens.push(only.name.clone()),
            [(first, _), .., (last, _)] => tokens.push(format!("第{}-{}节", first, last)),
        }
        run.clear();
    };

    for period in ordered {
        match numbered(period) {
            Some(n) => {
                if let Some(&(prev, _)) = run.last() {
                    if n != prev + 1 {
                        flush(&mut run, &mut tokens);
                    }
                }
                run.push((n, period));
            }
            None => {
                flush(&mut run, &mut tokens);
                tokens.push(period.name.clone());
            }
        }
    }
    flush(&mut run, &mut tokens);

    tokens.dedup();
    tokens
}
