//! Aggregates over stored sessions for dashboards and reports.

use serde::{Deserialize, Serialize};

use crate::db::FocusSession;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub session_count: usize,
    pub total_hours: f64,
    pub average_focus: f64,
    pub average_productivity: f64,
    pub peak_focus: f64,
    pub top_app: TopApp,
}

/// The application with the highest mean focus score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopApp {
    pub name: String,
    pub average_focus: f64,
}

impl SessionStats {
    pub fn from_sessions(sessions: &[FocusSession]) -> Option<Self> {
        if sessions.is_empty() {
            return None;
        }

        let count = sessions.len() as f64;
        let total_seconds: u64 = sessions.iter().map(|s| s.duration_seconds).sum();
        let peak_focus = sessions
            .iter()
            .map(|s| s.focus_score)
            .fold(f64::MIN, f64::max);
        let top_app = top_app(sessions)?;

        Some(Self {
            session_count: sessions.len(),
            total_hours: total_seconds as f64 / 3600.0,
            average_focus: sessions.iter().map(|s| s.focus_score).sum::<f64>() / count,
            average_productivity: sessions.iter().map(|s| s.productivity_score).sum::<f64>()
                / count,
            peak_focus,
            top_app,
        })
    }
}

/// Groups by display name and picks the best mean focus. Ties go to the app seen first.
fn top_app(sessions: &[FocusSession]) -> Option<TopApp> {
    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    for session in sessions {
        let name = app_display_name(&session.application);
        match groups.iter_mut().find(|group| group.0 == name) {
            Some((_, total, count)) => {
                *total += session.focus_score;
                *count += 1;
            }
            None => groups.push((name, session.focus_score, 1)),
        }
    }

    groups
        .into_iter()
        .map(|(name, total, count)| TopApp {
            name,
            average_focus: total / count as f64,
        })
        .fold(None, |best: Option<TopApp>, candidate| match best {
            Some(best) if best.average_focus >= candidate.average_focus => Some(best),
            _ => Some(candidate),
        })
}

/// `vscode.exe` -> `Vscode`, `notion.so` -> `Notion.So`.
pub fn app_display_name(application: &str) -> String {
    let mut name = String::with_capacity(application.len());
    let mut word_start = true;
    for ch in application.replace(".exe", "").chars() {
        if ch.is_alphabetic() {
            if word_start {
                name.extend(ch.to_uppercase());
            } else {
                name.extend(ch.to_lowercase());
            }
            word_start = false;
        } else {
            name.push(ch);
            word_start = true;
        }
    }
    name
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FocusTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl FocusTier {
    pub fn for_focus(average_focus: f64) -> Self {
        if average_focus >= 85.0 {
            FocusTier::Excellent
        } else if average_focus >= 70.0 {
            FocusTier::Good
        } else {
            FocusTier::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub tier: FocusTier,
    pub title: String,
    pub description: String,
    pub recommendation: String,
}

pub fn insights(stats: &SessionStats) -> Vec<Insight> {
    let focus = stats.average_focus;
    let tier = FocusTier::for_focus(focus);
    let insight = match tier {
        FocusTier::Excellent => Insight {
            tier,
            title: "Excellent focus".into(),
            description: format!(
                "Your focus score of {focus:.1}/100 shows exceptional concentration."
            ),
            recommendation: "Keep your current routine; it is working.".into(),
        },
        FocusTier::Good => Insight {
            tier,
            title: "Good focus".into(),
            description: format!("Your focus score of {focus:.1}/100 shows solid performance."),
            recommendation: "Try eliminating distractions to reach the next level.".into(),
        },
        FocusTier::NeedsImprovement => Insight {
            tier,
            title: "Focus improvement opportunity".into(),
            description: format!("Your focus score of {focus:.1}/100 has room for growth."),
            recommendation: "Start with 15-minute focused sessions and build up gradually."
                .into(),
        },
    };

    vec![insight]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::demo_sessions;
    use chrono::Utc;

    #[test]
    fn empty_input_has_no_stats() {
        assert!(SessionStats::from_sessions(&[]).is_none());
    }

    #[test]
    fn demo_data_stats() {
        let stats = SessionStats::from_sessions(&demo_sessions(Utc::now())).unwrap();
        assert_eq!(stats.session_count, 5);
        assert!((stats.total_hours - 16500.0 / 3600.0).abs() < 1e-9);
        assert!((stats.average_focus - 92.4).abs() < 1e-9);
        assert_eq!(stats.peak_focus, 96.0);
        assert_eq!(stats.top_app.name, "Vscode");
        assert_eq!(stats.top_app.average_focus, 96.0);

        let insights = insights(&stats);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].tier, FocusTier::Excellent);
    }

    #[test]
    fn top_app_averages_per_application() {
        let mut sessions = demo_sessions(Utc::now());
        let mut extra = sessions[0].clone();
        extra.focus_score = 80.0;
        sessions.push(extra);

        // vscode drops to 88 while figma keeps 94.
        let stats = SessionStats::from_sessions(&sessions).unwrap();
        assert_eq!(stats.top_app.name, "Figma");
        assert_eq!(stats.top_app.average_focus, 94.0);
    }

    #[test]
    fn display_names_strip_exe_and_title_case() {
        assert_eq!(app_display_name("vscode.exe"), "Vscode");
        assert_eq!(app_display_name("notion.so"), "Notion.So");
        assert_eq!(app_display_name("FocusPulse Elite"), "Focuspulse Elite");
    }

    #[test]
    fn focus_tiers() {
        assert_eq!(FocusTier::for_focus(85.0), FocusTier::Excellent);
        assert_eq!(FocusTier::for_focus(70.0), FocusTier::Good);
        assert_eq!(FocusTier::for_focus(69.9), FocusTier::NeedsImprovement);
    }
}
