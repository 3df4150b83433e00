use chrono::{Local, Timelike};

use crate::db::FocusSession;
use crate::live::LiveSession;
use crate::metrics::ProcessUsage;

const DEFAULT_FOCUS: f64 = 85.0;
const DEFAULT_PRODUCTIVITY: f64 = 88.0;
const BREAK_LIMIT_SECS: u64 = 90 * 60;

const SUMMARY_CATEGORY: &str = "Productivity";
const SUMMARY_SUBCATEGORY: &str = "Live Session";

/// Builds the persisted record for a finished live session.
pub fn summarize(live: &LiveSession, usage: ProcessUsage) -> FocusSession {
    let focus_score = live.focus_scores().mean().unwrap_or(DEFAULT_FOCUS);
    let productivity_score = live
        .productivity_scores()
        .mean()
        .unwrap_or(DEFAULT_PRODUCTIVITY);
    let duration_seconds = live.duration_seconds();
    let start_hour = live.started_at().with_timezone(&Local).hour();

    FocusSession {
        id: None,
        timestamp: live.started_at(),
        application: live.current_app().to_string(),
        window_title: live.current_window().to_string(),
        duration_seconds,
        category: SUMMARY_CATEGORY.into(),
        subcategory: SUMMARY_SUBCATEGORY.into(),
        focus_score,
        productivity_score,
        distraction_score: (100.0 - focus_score).max(0.0),
        typing_events: live.typing_events(),
        mouse_events: live.mouse_events(),
        clicks: 0,
        scrolls: 0,
        app_switches: 0,
        context_switches: 0,
        idle_time: 0.0,
        active_time: duration_seconds as f64,
        peak_activity_period: part_of_day(start_hour).into(),
        energy_level: focus_score / 10.0,
        memory_usage_mb: usage.memory_mb,
        cpu_usage_percent: usage.cpu_percent,
        screen_time_quality: screen_time_quality(focus_score).into(),
        break_compliance: duration_seconds <= BREAK_LIMIT_SECS,
    }
}

pub fn part_of_day(hour: u32) -> &'static str {
    match hour {
        5..=11 => "morning",
        12..=16 => "afternoon",
        17..=20 => "evening",
        _ => "night",
    }
}

pub fn screen_time_quality(focus: f64) -> &'static str {
    if focus >= 90.0 {
        "exceptional"
    } else if focus >= 85.0 {
        "excellent"
    } else if focus >= 70.0 {
        "good"
    } else {
        "fair"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::MetricSample;
    use chrono::Utc;
    use tokio::time::Instant;

    #[tokio::test]
    async fn empty_buffers_use_default_scores() {
        let live = LiveSession::new(Utc::now(), Instant::now(), "app", "window");
        let summary = summarize(&live, ProcessUsage::default());
        assert_eq!(summary.focus_score, 85.0);
        assert_eq!(summary.productivity_score, 88.0);
        assert_eq!(summary.screen_time_quality, "excellent");
        assert!(summary.id.is_none());
    }

    #[tokio::test]
    async fn averages_buffered_scores() {
        let mut live = LiveSession::new(Utc::now(), Instant::now(), "editor", "notes.md");
        for (i, (focus, productivity)) in [(60.0, 70.0), (80.0, 90.0)].into_iter().enumerate() {
            live.record_sample(Utc::now(), 6.0 * (i + 1) as f64, MetricSample { focus, productivity });
        }

        let summary = summarize(
            &live,
            ProcessUsage {
                cpu_percent: 12.5,
                memory_mb: 64.0,
            },
        );
        assert_eq!(summary.focus_score, 70.0);
        assert_eq!(summary.productivity_score, 80.0);
        assert_eq!(summary.distraction_score, 30.0);
        assert_eq!(summary.duration_seconds, 12);
        assert_eq!(summary.active_time, 12.0);
        assert_eq!(summary.application, "editor");
        assert_eq!(summary.window_title, "notes.md");
        assert_eq!(summary.screen_time_quality, "good");
        assert_eq!(summary.cpu_usage_percent, 12.5);
        assert_eq!(summary.app_switches, 0);
        assert!(summary.break_compliance);
    }

    #[test]
    fn day_parts_cover_every_hour() {
        assert_eq!(part_of_day(4), "night");
        assert_eq!(part_of_day(5), "morning");
        assert_eq!(part_of_day(12), "afternoon");
        assert_eq!(part_of_day(17), "evening");
        assert_eq!(part_of_day(23), "night");
    }
}
