use std::sync::LazyLock;

use log::{debug, error, info};
use scraper::{ElementRef, Html, Selector};

use crate::{
    text_manipulators::{first_text, space_token},
    timetable::{Timetable, Weekday},
};

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#divTT").unwrap());
static HEADER_TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table:nth-child(1)").unwrap());
static GRID_TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table:nth-child(2)").unwrap());
static HEADER_DATE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tbody > tr:nth-child(1) > td[align='Right'] > b").unwrap()
});
static HEADER_ROOM_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tbody > tr:nth-child(3) > td[align='Center'] > b").unwrap()
});
static HEADER_WEEK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tbody > tr:nth-child(3) > td[align='Right'] > b").unwrap()
});
static GRID_ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr:not(:first-child)").unwrap());
static DAY_LABEL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td[colspan='11'] > strong > font > i").unwrap());
static SUBJECT_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td:nth-of-type(5)").unwrap());
static TIME_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td:nth-of-type(1)").unwrap());

/// Which weekday the grid rows currently belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayCursor {
    /// No day-marker row seen yet.
    AwaitingDay,
    InDay(Weekday),
    /// A marker arrived after Friday.
    PastFriday,
}

impl DayCursor {
    // The label only triggers the step; the grid lists days in order, so a
    // marker always moves to the following day.
    fn advance(self) -> DayCursor {
        match self {
            DayCursor::AwaitingDay => DayCursor::InDay(Weekday::Monday),
            DayCursor::InDay(day) => day.next().map_or(DayCursor::PastFriday, DayCursor::InDay),
            DayCursor::PastFriday => DayCursor::PastFriday,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum GridRow {
    DayMarker(Weekday),
    Subject(String),
    Free(String),
}

fn classify_row(row: ElementRef) -> GridRow {
    let day_label = first_text(row, &DAY_LABEL_SELECTOR);
    if let Some(day) = Weekday::from_name(&day_label) {
        return GridRow::DayMarker(day);
    }
    let subject = first_text(row, &SUBJECT_CELL_SELECTOR);
    if !subject.is_empty() {
        return GridRow::Subject(subject);
    }
    GridRow::Free(first_text(row, &TIME_CELL_SELECTOR))
}

/// Turns one rendered room timetable page into a [`Timetable`].
///
/// Never fails: anything structurally wrong with the page is recorded as
/// `has_error` on the returned record, and whatever could still be read is kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimetableParser;

impl TimetableParser {
    pub fn parse(html: &str) -> Timetable {
        let document = Html::parse_document(html);
        Self::parse_document(&document)
    }

    pub fn parse_document(document: &Html) -> Timetable {
        let mut timetable = Timetable::new();

        let Some(container) = document.select(&CONTAINER_SELECTOR).next() else {
            error!("Timetable container div#divTT not found");
            timetable.has_error = true;
            return timetable;
        };
        debug!("Found table container");

        match container.select(&HEADER_TABLE_SELECTOR).next() {
            Some(header) => parse_header(header, &mut timetable),
            None => {
                error!("Timetable header table not found");
                timetable.has_error = true;
            }
        }

        match container.select(&GRID_TABLE_SELECTOR).next() {
            Some(grid) => parse_grid(grid, &mut timetable),
            None => {
                error!("Timetable grid not found");
                timetable.has_error = true;
            }
        }

        timetable
    }
}

fn parse_header(header: ElementRef, timetable: &mut Timetable) {
    debug!("Found header");
    let fields = [
        ("date", &*HEADER_DATE_SELECTOR, 1, &mut timetable.date),
        ("room", &*HEADER_ROOM_SELECTOR, 2, &mut timetable.room),
        ("week", &*HEADER_WEEK_SELECTOR, 2, &mut timetable.week),
    ];
    let mut has_error = false;
    for (label, selector, token_index, slot) in fields {
        let text = first_text(header, selector);
        if text.is_empty() {
            error!("Header {label} is empty");
            has_error = true;
            continue;
        }
        match space_token(&text, token_index) {
            Some(value) => *slot = value,
            None => {
                error!("Header {label} {text:?} has no token at index {token_index}");
                has_error = true;
            }
        }
    }
    timetable.has_error |= has_error;
}

fn parse_grid(grid: ElementRef, timetable: &mut Timetable) {
    info!("Found timetable, parsing...");
    let mut cursor = DayCursor::AwaitingDay;

    for row in grid.select(&GRID_ROW_SELECTOR) {
        match classify_row(row) {
            GridRow::DayMarker(label) => {
                debug!("(Skip) Row contains day {label}");
                cursor = cursor.advance();
                if cursor == DayCursor::PastFriday {
                    error!("Day marker {label} found after Friday");
                    timetable.has_error = true;
                }
            }
            GridRow::Subject(subject) => {
                debug!("(Skip) Row contains subject {subject}");
                timetable.is_empty = false;
                if cursor == DayCursor::AwaitingDay {
                    error!("Subject row {subject:?} found before any day marker");
                    timetable.has_error = true;
                }
            }
            GridRow::Free(time) => match cursor {
                DayCursor::InDay(day) => {
                    timetable.free_slots.entry(day).or_default().push(time);
                }
                DayCursor::AwaitingDay | DayCursor::PastFriday => {
                    error!("Free row {time:?} found outside a weekday");
                    timetable.has_error = true;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Row<'a> {
        Day(&'a str),
        Free(&'a str),
        Subject(&'a str, &'a str),
    }

    fn header_table(date: &str, room: &str, week: &str) -> String {
        format!(
            r#"<table>
                <tr><td align="Left"><b>Room Timetable</b></td><td align="Right"><b>{date}</b></td></tr>
                <tr><td></td></tr>
                <tr><td align="Left"><b>Semester 2</b></td><td align="Center"><b>{room}</b></td><td align="Right"><b>{week}</b></td></tr>
            </table>"#
        )
    }

    fn grid_table(rows: &[Row]) -> String {
        let mut html = String::from(
            "<table><tr><th>Time</th><th>Group</th><th>Type</th><th>Lecturer</th><th>Subject</th></tr>",
        );
        for row in rows {
            let tr = match row {
                Row::Day(day) => format!(
                    r#"<tr><td colspan="11"><strong><font color="navy"><i>{day}</i></font></strong></td></tr>"#
                ),
                Row::Free(time) => format!(
                    "<tr><td>{time}</td><td>&nbsp;</td><td></td><td></td><td>&nbsp;</td></tr>"
                ),
                Row::Subject(time, subject) => format!(
                    "<tr><td>{time}</td><td>SD2</td><td>Lecture</td><td>J Smith</td><td>{subject}</td></tr>"
                ),
            };
            html.push_str(&tr);
        }
        html.push_str("</table>");
        html
    }

    fn page(header: &str, grid: &str) -> String {
        format!(r#"<html><body><form><div id="divTT">{header}{grid}</div></form></body></html>"#)
    }

    fn standard_header() -> String {
        header_table("Date: 04/03/2024", "Room : IT101", "Week : 34")
    }

    #[test]
    fn single_day_with_subject_between_free_rows() {
        let html = page(
            &standard_header(),
            &grid_table(&[
                Row::Day("Monday"),
                Row::Free("09:15"),
                Row::Subject("10:15", "Maths"),
                Row::Free("11:15"),
            ]),
        );

        let timetable = TimetableParser::parse(&html);

        assert!(!timetable.is_empty);
        assert!(!timetable.has_error);
        assert_eq!(timetable.room, "IT101");
        assert_eq!(timetable.date, "04/03/2024");
        assert_eq!(timetable.week, "34");
        assert_eq!(timetable.free_slots.len(), 1);
        assert_eq!(
            timetable.free_slots_on(Weekday::Monday),
            ["09:15".to_string(), "11:15".to_string()]
        );
    }

    #[test]
    fn rows_follow_the_latest_day_marker() {
        let html = page(
            &standard_header(),
            &grid_table(&[
                Row::Day("Monday"),
                Row::Free("09:15"),
                Row::Day("Tuesday"),
                Row::Free("09:15"),
                Row::Free("10:15"),
                Row::Day("Wednesday"),
                Row::Day("Thursday"),
                Row::Subject("09:15", "Networks"),
                Row::Day("Friday"),
                Row::Free("17:15"),
            ]),
        );

        let timetable = TimetableParser::parse(&html);

        assert!(!timetable.has_error);
        assert_eq!(timetable.free_slots_on(Weekday::Monday), ["09:15"]);
        assert_eq!(timetable.free_slots_on(Weekday::Tuesday), ["09:15", "10:15"]);
        assert!(timetable.free_slots_on(Weekday::Wednesday).is_empty());
        assert!(timetable.free_slots_on(Weekday::Thursday).is_empty());
        assert_eq!(timetable.free_slots_on(Weekday::Friday), ["17:15"]);
        assert_eq!(timetable.free_slot_count(), 4);
        assert!(!timetable.free_slots.contains_key(&Weekday::Wednesday));
    }

    #[test]
    fn grid_without_subjects_is_flagged_empty() {
        let html = page(
            &standard_header(),
            &grid_table(&[Row::Day("Monday"), Row::Free("09:15"), Row::Free("10:15")]),
        );
        let timetable = TimetableParser::parse(&html);
        assert!(timetable.is_empty);
        assert!(!timetable.has_error);
        assert_eq!(timetable.free_slot_count(), 2);
    }

    #[test]
    fn free_row_before_any_day_marker_is_an_error() {
        let html = page(
            &standard_header(),
            &grid_table(&[Row::Free("08:15"), Row::Day("Monday"), Row::Free("09:15")]),
        );

        let timetable = TimetableParser::parse(&html);

        assert!(timetable.has_error);
        assert_eq!(timetable.free_slot_count(), 1);
        assert_eq!(timetable.free_slots_on(Weekday::Monday), ["09:15"]);
    }

    #[test]
    fn subject_row_before_any_day_marker_is_an_error() {
        let html = page(
            &standard_header(),
            &grid_table(&[Row::Subject("08:15", "Maths"), Row::Day("Monday"), Row::Free("09:15")]),
        );

        let timetable = TimetableParser::parse(&html);

        assert!(timetable.has_error);
        assert!(!timetable.is_empty);
        assert_eq!(timetable.free_slots_on(Weekday::Monday), ["09:15"]);
    }

    #[test]
    fn repeated_marker_advances_the_day() {
        let html = page(
            &standard_header(),
            &grid_table(&[
                Row::Day("Monday"),
                Row::Day("Monday"),
                Row::Free("09:15"),
            ]),
        );

        let timetable = TimetableParser::parse(&html);

        assert!(!timetable.has_error);
        assert!(timetable.free_slots_on(Weekday::Monday).is_empty());
        assert_eq!(timetable.free_slots_on(Weekday::Tuesday), ["09:15"]);
    }

    #[test]
    fn marker_after_friday_stops_recording() {
        let mut rows: Vec<Row> = Weekday::ALL.iter().map(|day| Row::Day(day.name())).collect();
        rows.push(Row::Free("09:15"));
        rows.push(Row::Day("Monday"));
        rows.push(Row::Free("10:15"));
        let html = page(&standard_header(), &grid_table(&rows));

        let timetable = TimetableParser::parse(&html);

        assert!(timetable.has_error);
        assert_eq!(timetable.free_slots_on(Weekday::Friday), ["09:15"]);
        assert_eq!(timetable.free_slot_count(), 1);
    }

    #[test]
    fn empty_header_date_keeps_room_and_week() {
        let html = page(
            &header_table("", "Room : IT101", "Week : 34"),
            &grid_table(&[Row::Day("Monday"), Row::Free("09:15")]),
        );

        let timetable = TimetableParser::parse(&html);

        assert!(timetable.has_error);
        assert_eq!(timetable.date, "");
        assert_eq!(timetable.room, "IT101");
        assert_eq!(timetable.week, "34");
        assert_eq!(timetable.free_slots_on(Weekday::Monday), ["09:15"]);
    }

    #[test]
    fn header_without_expected_token_is_an_error() {
        let html = page(
            &header_table("Date: 04/03/2024", "IT101", "Week : 34"),
            &grid_table(&[Row::Day("Monday"), Row::Free("09:15")]),
        );
        let timetable = TimetableParser::parse(&html);
        assert!(timetable.has_error);
        assert_eq!(timetable.room, "");
        assert_eq!(timetable.week, "34");
    }

    #[test]
    fn page_without_container_is_an_empty_error_record() {
        let timetable = TimetableParser::parse("<html><body><p>Session expired</p></body></html>");
        assert!(timetable.has_error);
        assert!(timetable.is_empty);
        assert!(timetable.free_slots.is_empty());
    }

    #[test]
    fn weekend_labels_are_not_day_markers() {
        let html = page(
            &standard_header(),
            &grid_table(&[Row::Day("Monday"), Row::Day("Saturday"), Row::Free("09:15")]),
        );
        let timetable = TimetableParser::parse(&html);
        // The Saturday row has no subject cell, so it reads as a free row.
        assert_eq!(timetable.free_slots_on(Weekday::Monday), ["Saturday", "09:15"]);
        assert_eq!(timetable.free_slots.len(), 1);
    }

    #[test]
    fn parsing_is_deterministic() {
        let html = page(
            &standard_header(),
            &grid_table(&[
                Row::Day("Monday"),
                Row::Free("09:15"),
                Row::Day("Tuesday"),
                Row::Subject("09:15", "Maths"),
                Row::Free("10:15"),
            ]),
        );
        assert_eq!(TimetableParser::parse(&html), TimetableParser::parse(&html));
    }

    #[test]
    fn free_slot_count_matches_free_rows_after_first_marker() {
        let rows = [
            Row::Free("08:15"),
            Row::Day("Monday"),
            Row::Free("09:15"),
            Row::Subject("10:15", "Maths"),
            Row::Free("11:15"),
            Row::Day("Tuesday"),
            Row::Free("09:15"),
        ];
        let mut seen_marker = false;
        let mut expected = 0;
        for row in &rows {
            match row {
                Row::Day(_) => seen_marker = true,
                Row::Free(_) if seen_marker => expected += 1,
                _ => {}
            }
        }
        let timetable = TimetableParser::parse(&page(&standard_header(), &grid_table(&rows)));
        assert_eq!(timetable.free_slot_count(), expected);
    }
}
