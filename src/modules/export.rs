//! CSV export of the currently loaded page
//!
//! 'x' writes the visible (filtered, sorted) rows to a timestamped file
//! under the platform data dir and reports the location in the status line.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use directories::ProjectDirs;

use crate::core::{Action, NotifyLevel};
use crate::domain::entity::EntityRecord;

/// Get the export directory path, creating it if needed
fn export_dir() -> std::io::Result<PathBuf> {
    let export_dir = ProjectDirs::from("io", "steward", "steward")
        .map(|dirs| dirs.data_dir().join("exports"))
        .unwrap_or_else(|| PathBuf::from(".steward").join("exports"));
    fs::create_dir_all(&export_dir)?;
    Ok(export_dir)
}

/// Generate a timestamped filename from the table title
fn generate_filename(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let timestamp = Local::now().format("%Y-%m-%d-%H%M%S");
    format!("{}-{}.csv", slug.trim_matches('-'), timestamp)
}

/// Export the visible page rows to CSV
pub fn export_rows(title: &str, rows: &[&EntityRecord]) -> Action {
    if rows.is_empty() {
        return Action::Notify("No rows to export".to_string(), NotifyLevel::Warn);
    }

    let export_dir = match export_dir() {
        Ok(dir) => dir,
        Err(err) => {
            return Action::Notify(
                format!("Failed to create export directory: {}", err),
                NotifyLevel::Error,
            )
        }
    };

    let filename = generate_filename(title);
    let path = export_dir.join(&filename);

    match write_rows(&path, rows) {
        Ok(count) => Action::Notify(
            format!("Exported {} rows to {}", count, path.display()),
            NotifyLevel::Info,
        ),
        Err(err) => Action::Notify(format!("Export failed: {}", err), NotifyLevel::Error),
    }
}

fn write_rows(path: &std::path::Path, rows: &[&EntityRecord]) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["id", "code", "name", "description", "active"])?;
    for row in rows {
        writer.write_record([
            row.id.as_str(),
            row.code.as_str(),
            row.name.as_str(),
            row.description.as_str(),
            if row.active { "true" } else { "false" },
        ])?;
    }
    writer.flush()?;
    Ok(rows.len())
}
