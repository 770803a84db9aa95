use std::collections::BTreeMap;

use serde::Serialize;

/// The five days the timetable grid covers. There are no weekend rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    /// Exact, case-sensitive match on the full day name.
    pub fn from_name(name: &str) -> Option<Weekday> {
        Self::ALL.into_iter().find(|day| day.name() == name)
    }

    pub fn next(self) -> Option<Weekday> {
        match self {
            Weekday::Monday => Some(Weekday::Tuesday),
            Weekday::Tuesday => Some(Weekday::Wednesday),
            Weekday::Wednesday => Some(Weekday::Thursday),
            Weekday::Thursday => Some(Weekday::Friday),
            Weekday::Friday => None,
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One room's week, as read from one rendered timetable page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timetable {
    pub room: String,
    pub date: String,
    pub week: String,
    pub has_error: bool,
    // Sanity check: true when no subject was booked anywhere in the grid.
    pub is_empty: bool,
    pub free_slots: BTreeMap<Weekday, Vec<String>>,
}

impl Timetable {
    pub fn new() -> Self {
        Timetable {
            room: String::new(),
            date: String::new(),
            week: String::new(),
            has_error: false,
            is_empty: true,
            free_slots: BTreeMap::new(),
        }
    }

    pub fn free_slots_on(&self, day: Weekday) -> &[String] {
        self.free_slots.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn free_slot_count(&self) -> usize {
        self.free_slots.values().map(Vec::len).sum()
    }
}

impl Default for Timetable {
    fn default() -> Self {
        Self::new()
    }
}
