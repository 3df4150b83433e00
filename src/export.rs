use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use log::info;

use crate::db::{helpers::format_timestamp, Database, FocusSession};
use crate::error::{TrackerError, TrackerResult};

const HEADER: [&str; 8] = [
    "timestamp",
    "application",
    "window_title",
    "duration_minutes",
    "focus_score",
    "productivity_score",
    "category",
    "screen_time_quality",
];

/// Writes sessions from the last `days` days to a timestamped CSV in `dir`.
///
/// Returns `Ok(None)` when there is nothing to export.
pub async fn export_sessions(
    db: &Database,
    days: u32,
    dir: &Path,
) -> TrackerResult<Option<PathBuf>> {
    let sessions = db.get_sessions(days).await;
    if sessions.is_empty() {
        info!("No sessions in the last {days} days; nothing to export");
        return Ok(None);
    }

    let file_name = format!(
        "focuspulse_export_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(file_name);
    write_csv(&path, &sessions).map_err(|err| TrackerError::Export(format!("{err:#}")))?;

    info!("Exported {} sessions to {}", sessions.len(), path.display());
    Ok(Some(path))
}

fn write_csv(path: &Path, sessions: &[FocusSession]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create export directory {}", parent.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", HEADER.join(","))?;
    for session in sessions {
        let row = [
            format_timestamp(&session.timestamp),
            escape_field(&session.application),
            escape_field(&session.window_title),
            format!("{:.2}", session.duration_minutes()),
            format!("{:.2}", session.focus_score),
            format!("{:.2}", session.productivity_score),
            escape_field(&session.category),
            escape_field(&session.screen_time_quality),
        ];
        writeln!(writer, "{}", row.join(","))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))
}

/// RFC 4180 quoting: wrap in quotes when the field has a comma, quote or newline.
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SeedMode;
    use tempfile::TempDir;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a, b"), "\"a, b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[tokio::test]
    async fn exports_seeded_sessions() {
        let dir = TempDir::new().unwrap();
        let db = Database::open_and_seed(dir.path().join("export.sqlite3"), SeedMode::IfEmpty)
            .await
            .unwrap();

        let export_dir = dir.path().join("exports");
        let path = export_sessions(&db, 30, &export_dir).await.unwrap().unwrap();
        assert!(path.extension().is_some_and(|ext| ext == "csv"));

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], HEADER.join(","));
        assert!(contents.contains("vscode.exe"));
        assert!(contents.contains(",70.00,96.00,98.00,Development,exceptional"));
    }

    #[tokio::test]
    async fn empty_store_exports_nothing() {
        let dir = TempDir::new().unwrap();
        let db = Database::open_and_seed(dir.path().join("empty.sqlite3"), SeedMode::Never)
            .await
            .unwrap();
        assert!(export_sessions(&db, 30, dir.path()).await.unwrap().is_none());
    }
}
