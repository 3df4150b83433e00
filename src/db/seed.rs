//! Demo records and the policy for loading them.
//!
//! The demo set mirrors a productive two-day stretch. Timestamps are placed
//! relative to the seeding instant so a fresh database always has something
//! inside the default query windows; the rows then age out naturally.

use anyhow::Context;
use chrono::{DateTime, TimeDelta, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::db::{models::FocusSession, repositories::focus_sessions::insert_all, Database};
use crate::error::{TrackerError, TrackerResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SeedMode {
    /// Schema only.
    Never,
    /// Seed only when the sessions table is empty.
    #[default]
    IfEmpty,
    /// Delete every stored session and reseed. Destructive.
    Recreate,
}

struct DemoRecord {
    minutes_before_seed: i64,
    application: &'static str,
    window_title: &'static str,
    duration_seconds: u64,
    category: &'static str,
    subcategory: &'static str,
    scores: (f64, f64, f64),
    interactions: (u64, u64, u64, u64, u64),
    idle_time: f64,
    active_time: f64,
    peak_activity_period: &'static str,
    energy_level: f64,
    context_switches: u64,
    memory_usage_mb: f64,
    cpu_usage_percent: f64,
    screen_time_quality: &'static str,
    break_compliance: bool,
}

const DEMO_RECORDS: [DemoRecord; 5] = [
    DemoRecord {
        minutes_before_seed: 9 * 60,
        application: "vscode.exe",
        window_title: "Python Development - FocusPulse Masterpiece",
        duration_seconds: 4200,
        category: "Development",
        subcategory: "Coding",
        scores: (96.0, 98.0, 4.0),
        interactions: (220, 380, 110, 30, 1),
        idle_time: 180.0,
        active_time: 4020.0,
        peak_activity_period: "morning",
        energy_level: 9.8,
        context_switches: 1,
        memory_usage_mb: 320.0,
        cpu_usage_percent: 18.0,
        screen_time_quality: "exceptional",
        break_compliance: true,
    },
    DemoRecord {
        minutes_before_seed: 6 * 60 + 45,
        application: "figma.exe",
        window_title: "UI/UX Design - Masterpiece Interface",
        duration_seconds: 3600,
        category: "Design",
        subcategory: "UI/UX",
        scores: (94.0, 96.0, 6.0),
        interactions: (180, 320, 85, 20, 1),
        idle_time: 200.0,
        active_time: 3400.0,
        peak_activity_period: "morning",
        energy_level: 9.5,
        context_switches: 1,
        memory_usage_mb: 280.0,
        cpu_usage_percent: 22.0,
        screen_time_quality: "exceptional",
        break_compliance: true,
    },
    DemoRecord {
        minutes_before_seed: 3 * 60 + 30,
        application: "chrome.exe",
        window_title: "Research - Best Design Practices",
        duration_seconds: 2100,
        category: "Research",
        subcategory: "Web",
        scores: (88.0, 90.0, 12.0),
        interactions: (120, 240, 95, 35, 3),
        idle_time: 120.0,
        active_time: 1980.0,
        peak_activity_period: "afternoon",
        energy_level: 8.8,
        context_switches: 2,
        memory_usage_mb: 380.0,
        cpu_usage_percent: 30.0,
        screen_time_quality: "excellent",
        break_compliance: true,
    },
    DemoRecord {
        minutes_before_seed: 60 + 15,
        application: "notion.so",
        window_title: "Documentation - Technical Specs",
        duration_seconds: 2700,
        category: "Productivity",
        subcategory: "Writing",
        scores: (91.0, 93.0, 9.0),
        interactions: (160, 220, 60, 25, 1),
        idle_time: 180.0,
        active_time: 2520.0,
        peak_activity_period: "afternoon",
        energy_level: 9.1,
        context_switches: 1,
        memory_usage_mb: 340.0,
        cpu_usage_percent: 25.0,
        screen_time_quality: "exceptional",
        break_compliance: true,
    },
    DemoRecord {
        minutes_before_seed: 32 * 60,
        application: "photoshop.exe",
        window_title: "Creative Design - Brand Assets",
        duration_seconds: 3900,
        category: "Design",
        subcategory: "Graphics",
        scores: (93.0, 91.0, 8.0),
        interactions: (200, 350, 90, 35, 2),
        idle_time: 240.0,
        active_time: 3660.0,
        peak_activity_period: "morning",
        energy_level: 9.2,
        context_switches: 1,
        memory_usage_mb: 450.0,
        cpu_usage_percent: 35.0,
        screen_time_quality: "exceptional",
        break_compliance: true,
    },
];

/// The five demo sessions, timestamped relative to `seeded_at`.
pub fn demo_sessions(seeded_at: DateTime<Utc>) -> Vec<FocusSession> {
    DEMO_RECORDS
        .iter()
        .map(|demo| {
            let (focus_score, productivity_score, distraction_score) = demo.scores;
            let (typing_events, mouse_events, clicks, scrolls, app_switches) = demo.interactions;
            FocusSession {
                id: None,
                timestamp: seeded_at - TimeDelta::minutes(demo.minutes_before_seed),
                application: demo.application.into(),
                window_title: demo.window_title.into(),
                duration_seconds: demo.duration_seconds,
                category: demo.category.into(),
                subcategory: demo.subcategory.into(),
                focus_score,
                productivity_score,
                distraction_score,
                typing_events,
                mouse_events,
                clicks,
                scrolls,
                app_switches,
                context_switches: demo.context_switches,
                idle_time: demo.idle_time,
                active_time: demo.active_time,
                peak_activity_period: demo.peak_activity_period.into(),
                energy_level: demo.energy_level,
                memory_usage_mb: demo.memory_usage_mb,
                cpu_usage_percent: demo.cpu_usage_percent,
                screen_time_quality: demo.screen_time_quality.into(),
                break_compliance: demo.break_compliance,
            }
        })
        .collect()
}

impl Database {
    /// Applies `mode`; returns how many demo rows were inserted.
    pub async fn initialize(&self, mode: SeedMode) -> TrackerResult<usize> {
        if mode == SeedMode::Never {
            return Ok(0);
        }

        let records = demo_sessions(Utc::now());
        let inserted = self
            .execute(move |conn| {
                let tx = conn.transaction()?;

                if mode == SeedMode::Recreate {
                    tx.execute("DELETE FROM sessions", [])
                        .context("failed to clear sessions before reseed")?;
                } else {
                    let existing: i64 =
                        tx.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
                    if existing > 0 {
                        return Ok(0);
                    }
                }

                let ids = insert_all(&tx, &records)?;
                tx.commit().context("failed to commit demo data")?;
                Ok(ids.len())
            })
            .await
            .map_err(TrackerError::storage_init)?;

        if inserted > 0 {
            info!("Seeded {inserted} demo sessions ({mode:?})");
        }
        Ok(inserted)
    }
}
