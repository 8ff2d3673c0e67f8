//! Per-person timetables.
//!
//! # Algorithm
//!
//! 1. Color the line graph of the meeting graph: color = timeslot.
//! 2. Slot count = colors used, capped by an optional slot limit. Meetings
//!    colored beyond the cap are dropped and reported.
//! 3. In each slot, meetings get tables 1..k in meeting order.
//! 4. Everyone on the roster without a meeting in that slot is shuffled
//!    (seeded) and paired first half × second half onto tables k+1, k+2, …
//!    flagged as backfilled. With an odd count the last person sits out.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::coloring::{color_count, ColoringPolicy};
use super::graph::{LineGraph, MeetingGraph};
use crate::models::EntityId;

/// One person's assignment in one timeslot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEntry {
    /// Timeslot index (0-based).
    pub slot: usize,
    /// Table number (1-based); `None` when sitting out.
    pub table: Option<usize>,
    /// Who sits at the same table.
    pub counterpart: Option<EntityId>,
    /// Whether this table was filled by random pairing.
    pub backfilled: bool,
}

impl SlotEntry {
    fn seated(slot: usize, table: usize, counterpart: EntityId, backfilled: bool) -> Self {
        Self {
            slot,
            table: Some(table),
            counterpart: Some(counterpart),
            backfilled,
        }
    }

    fn idle(slot: usize) -> Self {
        Self {
            slot,
            table: None,
            counterpart: None,
            backfilled: false,
        }
    }

    /// Whether this entry is a required meeting.
    pub fn is_meeting(&self) -> bool {
        self.counterpart.is_some() && !self.backfilled
    }
}

/// Finalized schedule for every person on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    slots: usize,
    schedules: BTreeMap<EntityId, Vec<SlotEntry>>,
    dropped: Vec<(EntityId, EntityId)>,
}

impl Timetable {
    /// Schedules `graph` into timeslots.
    ///
    /// `roster` lists people who take part in backfill even when they have
    /// no required meetings; everyone in `graph` is added to it. The same
    /// `seed` always produces the same backfill pairing.
    pub fn build(
        graph: &MeetingGraph,
        coloring: &dyn ColoringPolicy,
        roster: &[EntityId],
        slot_limit: Option<usize>,
        seed: u64,
    ) -> Self {
        let line = LineGraph::of(graph);
        let colors = coloring.color(&line);
        let used = color_count(&colors);
        let slots = slot_limit.map_or(used, |limit| used.min(limit));

        let mut everyone: Vec<EntityId> = Vec::new();
        let mut seen = BTreeSet::new();
        for &p in roster.iter().chain(graph.people()) {
            if seen.insert(p) {
                everyone.push(p);
            }
        }

        let mut by_slot: Vec<Vec<(EntityId, EntityId)>> = vec![Vec::new(); slots];
        let mut dropped = Vec::new();
        for (&meeting, &color) in graph.edges().iter().zip(&colors) {
            match by_slot.get_mut(color) {
                Some(meetings) => meetings.push(meeting),
                None => dropped.push(meeting),
            }
        }
        if !dropped.is_empty() {
            tracing::warn!(
                dropped = dropped.len(),
                colors = used,
                slots,
                "meetings beyond the slot limit were dropped"
            );
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut schedules: BTreeMap<EntityId, Vec<SlotEntry>> =
            everyone.iter().map(|&p| (p, Vec::with_capacity(slots))).collect();
        let mut backfilled_tables = 0usize;

        for (slot, meetings) in by_slot.iter().enumerate() {
            let mut busy = BTreeSet::new();
            let mut table = 0usize;
            for &(a, b) in meetings {
                table += 1;
                push_entry(&mut schedules, a, SlotEntry::seated(slot, table, b, false));
                push_entry(&mut schedules, b, SlotEntry::seated(slot, table, a, false));
                busy.insert(a);
                busy.insert(b);
            }

            let mut idle: Vec<EntityId> = everyone
                .iter()
                .copied()
                .filter(|p| !busy.contains(p))
                .collect();
            idle.shuffle(&mut rng);
            let half = idle.len() / 2;
            let (first, second) = idle.split_at(half);
            for (&a, &b) in first.iter().zip(second) {
                table += 1;
                backfilled_tables += 1;
                push_entry(&mut schedules, a, SlotEntry::seated(slot, table, b, true));
                push_entry(&mut schedules, b, SlotEntry::seated(slot, table, a, true));
            }
            if let Some(&left_out) = second.get(half) {
                push_entry(&mut schedules, left_out, SlotEntry::idle(slot));
            }
        }

        for entries in schedules.values_mut() {
            entries.sort_by_key(|e| e.slot);
        }

        tracing::info!(
            coloring = coloring.name(),
            meetings = graph.edge_count(),
            slots,
            backfilled_tables,
            "timetable built"
        );

        Self {
            slots,
            schedules,
            dropped,
        }
    }

    /// Number of timeslots.
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Everyone with a schedule, ascending by id.
    pub fn people(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.schedules.keys().copied()
    }

    /// A person's entries ordered by slot.
    pub fn schedule(&self, person: EntityId) -> &[SlotEntry] {
        self.schedules.get(&person).map_or(&[], Vec::as_slice)
    }

    /// All (person, entry) pairs.
    pub fn entries(&self) -> impl Iterator<Item = (EntityId, &SlotEntry)> + '_ {
        self.schedules
            .iter()
            .flat_map(|(&p, entries)| entries.iter().map(move |e| (p, e)))
    }

    /// Meetings that did not fit within the slot limit.
    pub fn dropped(&self) -> &[(EntityId, EntityId)] {
        &self.dropped
    }

    /// Required meetings of `person`, in slot order.
    pub fn meetings_of(&self, person: EntityId) -> Vec<EntityId> {
        self.schedule(person)
            .iter()
            .filter(|e| e.is_meeting())
            .filter_map(|e| e.counterpart)
            .collect()
    }

    /// Table labels per slot joined by `|`, e.g. `"1a|3b|-"`.
    ///
    /// Slots where the person sits out show `-`.
    pub fn table_sequence(&self, person: EntityId, labels: &TableLabels) -> String {
        let entries = self.schedule(person);
        (0..self.slots)
            .map(|slot| {
                entries
                    .iter()
                    .find(|e| e.slot == slot)
                    .and_then(|e| e.table)
                    .map_or_else(|| "-".to_string(), |t| labels.label(t))
            })
            .collect::<Vec<_>>()
            .join("|")
    }
}

fn push_entry(schedules: &mut BTreeMap<EntityId, Vec<SlotEntry>>, person: EntityId, entry: SlotEntry) {
    schedules.entry(person).or_default().push(entry);
}

/// Maps table numbers onto physical labels: group number plus seat letter.
///
/// With 3 seats per group, tables 1..=6 are `1a 1b 1c 2a 2b 2c`. Tables
/// past `groups × seats` keep their plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLabels {
    groups: usize,
    seats: usize,
}

impl TableLabels {
    /// Seats per group are capped at 26.
    pub fn new(groups: usize, seats: usize) -> Self {
        Self {
            groups,
            seats: seats.min(26),
        }
    }

    /// Label of a 1-based table number.
    pub fn label(&self, table: usize) -> String {
        if table == 0 || self.seats == 0 || table > self.groups * self.seats {
            return table.to_string();
        }
        let idx = table - 1;
        let group = idx / self.seats + 1;
        let seat = (b'a' + (idx % self.seats) as u8) as char;
        format!("{group}{seat}")
    }
}

impl Default for TableLabels {
    /// Plain table numbers.
    fn default() -> Self {
        Self::new(0, 0)
    }
}
