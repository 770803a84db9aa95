use std::collections::BTreeMap;

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::timetable::{Timetable, Weekday};

/// Which rooms are free on which day at which time.
///
/// Room lists keep the order the timetables were folded in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FreeRoomTable(BTreeMap<Weekday, BTreeMap<String, Vec<String>>>);

impl FreeRoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, day: Weekday, time: &str, room: &str) {
        self.0
            .entry(day)
            .or_default()
            .entry(time.to_string())
            .or_default()
            .push(room.to_string());
    }

    pub fn rooms_free_at(&self, day: Weekday, time: &str) -> &[String] {
        self.0
            .get(&day)
            .and_then(|times| times.get(time))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn day(&self, day: Weekday) -> Option<&BTreeMap<String, Vec<String>>> {
        self.0.get(&day)
    }

    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends `other`'s rooms after this table's rooms, bucket by bucket.
    pub fn merge(mut self, other: FreeRoomTable) -> FreeRoomTable {
        for (day, times) in other.0 {
            let day_times = self.0.entry(day).or_default();
            for (time, rooms) in times {
                day_times.entry(time).or_default().extend(rooms);
            }
        }
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub timetable_count: usize,
    pub error_count: usize,
    pub empty_timetable_count: usize,
    pub free_times_count: usize,
}

impl RunSummary {
    fn record(&mut self, timetable: &Timetable) {
        self.timetable_count += 1;
        if timetable.has_error {
            self.error_count += 1;
        }
        if timetable.is_empty {
            debug!("Found empty timetable for {}", timetable.room);
            self.empty_timetable_count += 1;
        }
    }

    fn combine(self, other: RunSummary) -> RunSummary {
        RunSummary {
            timetable_count: self.timetable_count + other.timetable_count,
            error_count: self.error_count + other.error_count,
            empty_timetable_count: self.empty_timetable_count + other.empty_timetable_count,
            free_times_count: self.free_times_count + other.free_times_count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    pub table: FreeRoomTable,
    pub summary: RunSummary,
}

/// Folds per-room timetables into one [`FreeRoomTable`].
///
/// Error-flagged records are folded like any other; callers check
/// `summary.error_count` before trusting the table.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResultAggregator;

impl ResultAggregator {
    pub fn aggregate(timetables: &[Timetable]) -> AggregateReport {
        let mut report = AggregateReport::default();
        for timetable in timetables {
            Self::fold_into(&mut report, timetable);
        }
        report
    }

    /// Same result as [`ResultAggregator::aggregate`], with each record folded
    /// on the rayon pool. Partial tables are merged by record index, never by
    /// completion order.
    pub fn aggregate_parallel(timetables: &[Timetable]) -> AggregateReport {
        let partials: Vec<AggregateReport> = timetables
            .par_iter()
            .map(|timetable| {
                let mut report = AggregateReport::default();
                Self::fold_into(&mut report, timetable);
                report
            })
            .collect();

        partials
            .into_iter()
            .fold(AggregateReport::default(), |acc, partial| AggregateReport {
                table: acc.table.merge(partial.table),
                summary: acc.summary.combine(partial.summary),
            })
    }

    fn fold_into(report: &mut AggregateReport, timetable: &Timetable) {
        report.summary.record(timetable);
        for day in Weekday::ALL {
            for time in timetable.free_slots_on(day) {
                report.summary.free_times_count += 1;
                report.table.add(day, time, &timetable.room);
            }
        }
    }
}
