//! Finalized focus session record.
//!
//! Written once, either from a stopped live session or from seed data, and
//! never updated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    /// Assigned by the store on insert; `None` until then.
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub application: String,
    pub window_title: String,
    pub duration_seconds: u64,
    pub category: String,
    pub subcategory: String,
    pub focus_score: f64,
    pub productivity_score: f64,
    pub distraction_score: f64,
    pub typing_events: u64,
    pub mouse_events: u64,
    pub clicks: u64,
    pub scrolls: u64,
    pub app_switches: u64,
    pub context_switches: u64,
    /// Seconds. Independent of `active_time`; the pair is not reconciled with the duration.
    pub idle_time: f64,
    pub active_time: f64,
    pub peak_activity_period: String,
    pub energy_level: f64,
    pub memory_usage_mb: f64,
    pub cpu_usage_percent: f64,
    pub screen_time_quality: String,
    pub break_compliance: bool,
}

impl FocusSession {
    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds as f64 / 60.0
    }
}
