use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};

use crate::{result_aggregator::FreeRoomTable, timetable::Weekday};

/// Rows of the ASCII grid: every lecture slot start from 09:15 to 17:15.
pub const GRID_TIMES: [&str; 9] = [
    "09:15", "10:15", "11:15", "12:15", "13:15", "14:15", "15:15", "16:15", "17:15",
];

pub fn render_json(table: &FreeRoomTable) -> anyhow::Result<String> {
    serde_json::to_string_pretty(table).context("failed to serialise free room table")
}

/// Renders the table as a bordered grid: one column per weekday, one row per
/// entry of [`GRID_TIMES`]. Times outside that list are left out.
pub fn render_ascii_grid(table: &FreeRoomTable) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(GRID_TIMES.len() + 1);
    rows.push(
        std::iter::once(String::new())
            .chain(Weekday::ALL.iter().map(|day| day.name().to_uppercase()))
            .collect(),
    );
    for time in GRID_TIMES {
        let mut row = vec![time.to_string()];
        row.extend(
            Weekday::ALL
                .iter()
                .map(|day| table.rooms_free_at(*day, time).join(", ")),
        );
        rows.push(row);
    }

    for day in table.days() {
        let Some(times) = table.day(day) else {
            continue;
        };
        for time in times.keys() {
            if !GRID_TIMES.contains(&time.as_str()) {
                warn!("Free time {time} on {day} has no row in the ASCII grid");
            }
        }
    }

    let widths: Vec<usize> = (0..=Weekday::ALL.len())
        .map(|column| {
            rows.iter()
                .map(|row| row[column].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let separator = widths
        .iter()
        .fold(String::from("+"), |mut line, width| {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
            line
        });

    let mut grid = String::new();
    grid.push_str(&separator);
    grid.push('\n');
    for row in &rows {
        grid.push('|');
        for (cell, width) in row.iter().zip(&widths) {
            grid.push_str(&format!(" {cell:<width$} |"));
        }
        grid.push('\n');
        grid.push_str(&separator);
        grid.push('\n');
    }
    grid
}

/// UTC RFC 3339 timestamp usable in a file name, e.g. `2024_03_04T09_15_00Z`.
pub fn file_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
        .replace([':', '-'], "_")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub json_path: PathBuf,
    pub ascii_path: PathBuf,
}

/// Writes `<timestamp>_freeRoomTable.json` and `<timestamp>_ascii.txt` into
/// `output_dir` and prints both renderings to stdout.
pub fn write_outputs(
    table: &FreeRoomTable,
    output_dir: &Path,
    now: DateTime<Utc>,
) -> anyhow::Result<WrittenOutputs> {
    let timestamp = file_timestamp(now);

    let json = render_json(table)?;
    println!("{json}");
    let json_path = output_dir.join(format!("{timestamp}_freeRoomTable.json"));
    fs::write(&json_path, &json)
        .with_context(|| format!("failed to write {}", json_path.display()))?;
    info!("Saved free room table to {}", json_path.display());

    let ascii = render_ascii_grid(table);
    println!("{ascii}");
    let ascii_path = output_dir.join(format!("{timestamp}_ascii.txt"));
    fs::write(&ascii_path, &ascii)
        .with_context(|| format!("failed to write {}", ascii_path.display()))?;
    info!("Saved ASCII table to {}", ascii_path.display());

    Ok(WrittenOutputs {
        json_path,
        ascii_path,
    })
}
