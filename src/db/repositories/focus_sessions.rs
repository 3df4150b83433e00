use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use log::error;
use rusqlite::{params, Row, Transaction};

use crate::db::{
    helpers::{format_timestamp, parse_datetime, to_i64, to_u64},
    models::FocusSession,
    Database,
};
use crate::error::{TrackerError, TrackerResult};

const SELECT_COLUMNS: &str = "id, timestamp, application, window_title, duration_seconds,
    category, subcategory, focus_score, productivity_score, distraction_score,
    typing_events, mouse_events, clicks, scrolls, app_switches,
    idle_time, active_time, peak_activity_period, energy_level, context_switches,
    memory_usage_mb, cpu_usage_percent, screen_time_quality, break_compliance";

fn count_column(row: &Row, column: &str) -> Result<u64> {
    let value: Option<i64> = row.get(column)?;
    to_u64(value.unwrap_or(0), column)
}

fn row_to_focus_session(row: &Row) -> Result<FocusSession> {
    let timestamp: String = row.get("timestamp")?;
    let break_compliance: Option<i64> = row.get("break_compliance")?;

    Ok(FocusSession {
        id: Some(row.get("id")?),
        timestamp: parse_datetime(&timestamp, "timestamp")?,
        application: row.get("application")?,
        window_title: row.get::<_, Option<String>>("window_title")?.unwrap_or_default(),
        duration_seconds: count_column(row, "duration_seconds")?,
        category: row
            .get::<_, Option<String>>("category")?
            .unwrap_or_else(|| "Uncategorized".into()),
        subcategory: row
            .get::<_, Option<String>>("subcategory")?
            .unwrap_or_else(|| "Unknown".into()),
        focus_score: row.get::<_, Option<f64>>("focus_score")?.unwrap_or(50.0),
        productivity_score: row.get::<_, Option<f64>>("productivity_score")?.unwrap_or(50.0),
        distraction_score: row.get::<_, Option<f64>>("distraction_score")?.unwrap_or(50.0),
        typing_events: count_column(row, "typing_events")?,
        mouse_events: count_column(row, "mouse_events")?,
        clicks: count_column(row, "clicks")?,
        scrolls: count_column(row, "scrolls")?,
        app_switches: count_column(row, "app_switches")?,
        context_switches: count_column(row, "context_switches")?,
        idle_time: row.get::<_, Option<f64>>("idle_time")?.unwrap_or(0.0),
        active_time: row.get::<_, Option<f64>>("active_time")?.unwrap_or(0.0),
        peak_activity_period: row
            .get::<_, Option<String>>("peak_activity_period")?
            .unwrap_or_default(),
        energy_level: row.get::<_, Option<f64>>("energy_level")?.unwrap_or(5.0),
        memory_usage_mb: row.get::<_, Option<f64>>("memory_usage_mb")?.unwrap_or(0.0),
        cpu_usage_percent: row.get::<_, Option<f64>>("cpu_usage_percent")?.unwrap_or(0.0),
        screen_time_quality: row
            .get::<_, Option<String>>("screen_time_quality")?
            .unwrap_or_else(|| "good".into()),
        break_compliance: break_compliance.unwrap_or(0) != 0,
    })
}

pub(crate) fn insert_all(tx: &Transaction<'_>, records: &[FocusSession]) -> Result<Vec<i64>> {
    let mut stmt = tx.prepare(
        "INSERT INTO sessions (
            timestamp, application, window_title, duration_seconds,
            category, subcategory, focus_score, productivity_score, distraction_score,
            typing_events, mouse_events, clicks, scrolls, app_switches,
            idle_time, active_time, peak_activity_period, energy_level, context_switches,
            memory_usage_mb, cpu_usage_percent, screen_time_quality, break_compliance
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)",
    )?;

    let mut ids = Vec::with_capacity(records.len());
    for record in records {
        stmt.execute(params![
            format_timestamp(&record.timestamp),
            record.application,
            record.window_title,
            to_i64(record.duration_seconds)?,
            record.category,
            record.subcategory,
            record.focus_score,
            record.productivity_score,
            record.distraction_score,
            to_i64(record.typing_events)?,
            to_i64(record.mouse_events)?,
            to_i64(record.clicks)?,
            to_i64(record.scrolls)?,
            to_i64(record.app_switches)?,
            record.idle_time,
            record.active_time,
            record.peak_activity_period,
            record.energy_level,
            to_i64(record.context_switches)?,
            record.memory_usage_mb,
            record.cpu_usage_percent,
            record.screen_time_quality,
            i64::from(record.break_compliance),
        ])
        .with_context(|| format!("failed to insert session for {}", record.application))?;
        ids.push(tx.last_insert_rowid());
    }

    Ok(ids)
}

fn cutoff_for(days: u32) -> DateTime<Utc> {
    Utc::now()
        .checked_sub_signed(TimeDelta::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl Database {
    /// Appends `records` in one transaction and returns their assigned ids in order.
    pub async fn insert_sessions(&self, records: &[FocusSession]) -> TrackerResult<Vec<i64>> {
        let records = records.to_vec();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            let ids = insert_all(&tx, &records)?;
            tx.commit().context("failed to commit session insert")?;
            Ok(ids)
        })
        .await
        .map_err(TrackerError::storage_write)
    }

    /// Sessions started within the last `days` days, newest first.
    pub async fn try_get_sessions(&self, days: u32) -> TrackerResult<Vec<FocusSession>> {
        self.get_sessions_since(cutoff_for(days)).await
    }

    /// Like [`Database::try_get_sessions`] but never fails: errors are logged and
    /// an empty list is returned.
    pub async fn get_sessions(&self, days: u32) -> Vec<FocusSession> {
        match self.try_get_sessions(days).await {
            Ok(sessions) => sessions,
            Err(err) => {
                error!("Error getting sessions for the last {days} days: {err}");
                Vec::new()
            }
        }
    }

    pub async fn get_sessions_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> TrackerResult<Vec<FocusSession>> {
        let cutoff = format_timestamp(&cutoff);
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS}
                 FROM sessions
                 WHERE timestamp >= ?1
                 ORDER BY timestamp DESC, id DESC"
            ))?;

            let mut rows = stmt.query(params![cutoff])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_focus_session(row)?);
            }

            Ok(sessions)
        })
        .await
        .map_err(TrackerError::storage_read)
    }

    pub async fn count_sessions(&self) -> TrackerResult<u64> {
        self.execute(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
            to_u64(count, "count")
        })
        .await
        .map_err(TrackerError::storage_read)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_session(application: &str, timestamp: DateTime<Utc>) -> FocusSession {
        FocusSession {
            id: None,
            timestamp,
            application: application.into(),
            window_title: "Unit Test Window".into(),
            duration_seconds: 1234,
            category: "Testing".into(),
            subcategory: "UnitTest".into(),
            focus_score: 99.5,
            productivity_score: 98.7,
            distraction_score: 1.1,
            typing_events: 100,
            mouse_events: 200,
            clicks: 50,
            scrolls: 10,
            app_switches: 0,
            context_switches: 2,
            idle_time: 300.0,
            active_time: 934.0,
            peak_activity_period: "afternoon".into(),
            energy_level: 8.4,
            memory_usage_mb: 512.0,
            cpu_usage_percent: 17.0,
            screen_time_quality: "excellent".into(),
            break_compliance: true,
        }
    }

    fn temp_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("sessions.sqlite3")).unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_and_reads_back() {
        let (_dir, db) = temp_db();
        let now = Utc::now();
        let records = vec![
            sample_session("first.exe", now - TimeDelta::minutes(2)),
            sample_session("second.exe", now - TimeDelta::minutes(1)),
        ];

        let ids = db.insert_sessions(&records).await.unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[1], ids[0] + 1);

        let stored = db.try_get_sessions(1).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].application, "second.exe");
        assert_eq!(stored[0].id, Some(ids[1]));
        assert_eq!(stored[1].category, "Testing");
        assert!(stored[1].break_compliance);
        assert_eq!(stored[1].duration_seconds, 1234);
    }

    #[tokio::test]
    async fn cutoff_excludes_older_rows() {
        let (_dir, db) = temp_db();
        let now = Utc::now();
        db.insert_sessions(&[
            sample_session("recent.exe", now - TimeDelta::hours(1)),
            sample_session("old.exe", now - TimeDelta::days(10)),
        ])
        .await
        .unwrap();

        let recent = db.get_sessions(2).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].application, "recent.exe");

        let all = db.get_sessions(100).await;
        assert_eq!(all.len(), 2);
        assert_eq!(db.count_sessions().await.unwrap(), 2);
        assert_eq!(db.get_sessions(u32::MAX).await.len(), 2);
    }

    #[tokio::test]
    async fn null_columns_fall_back_to_defaults() {
        let (_dir, db) = temp_db();
        let timestamp = format_timestamp(&Utc::now());
        db.execute(move |conn| {
            conn.execute(
                "INSERT INTO sessions (timestamp, application, category, focus_score, screen_time_quality, break_compliance)
                 VALUES (?1, 'bare.exe', NULL, NULL, NULL, NULL)",
                params![timestamp],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let stored = db.try_get_sessions(1).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].category, "Uncategorized");
        assert_eq!(stored[0].subcategory, "Unknown");
        assert_eq!(stored[0].focus_score, 50.0);
        assert_eq!(stored[0].screen_time_quality, "good");
        assert!(!stored[0].break_compliance);
    }

    #[tokio::test]
    async fn unreadable_rows_fail_soft() {
        let (_dir, db) = temp_db();
        db.execute(|conn| {
            conn.execute(
                "INSERT INTO sessions (timestamp, application) VALUES ('9999-not-a-date', 'broken.exe')",
                [],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        assert!(matches!(
            db.try_get_sessions(1).await,
            Err(TrackerError::StorageRead(_))
        ));
        assert!(db.get_sessions(1).await.is_empty());
    }
}
