use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, info};

use focuspulse_lib::{
    analytics::{insights, SessionStats},
    export::export_sessions,
    init_logging,
    settings::default_settings_path,
    utils::format::format_duration,
    Database, EngineConfig, FocusSession, SettingsStore, TrackerSnapshot, TrackingEngine,
};

#[derive(Parser, Debug)]
#[command(name = "focuspulse", version)]
#[command(about = "Track focus and productivity over a session", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true, help = "Path to the settings file")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Run a live tracking session")]
    Track {
        #[arg(long, default_value_t = 60, help = "Seconds to track before stopping")]
        seconds: u64,
    },
    #[command(about = "List stored sessions, newest first")]
    Sessions {
        #[arg(long, help = "Only sessions from the last N days")]
        days: Option<u32>,
    },
    #[command(about = "Show aggregate statistics and insights")]
    Stats {
        #[arg(long, help = "Only sessions from the last N days")]
        days: Option<u32>,
    },
    #[command(about = "Export stored sessions to CSV")]
    Export {
        #[arg(long, help = "Only sessions from the last N days")]
        days: Option<u32>,
        #[arg(long, help = "Directory to write the export into")]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    run().await.inspect_err(|e| {
        error!("focuspulse failed: {e:#}");
    })
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let store = SettingsStore::new(cli.config.unwrap_or_else(default_settings_path))?;
    let settings = store.settings();

    let db = Database::open_and_seed(settings.database_path.clone(), settings.seed_mode).await?;
    info!(
        "Using settings at {} and sessions at {}",
        store.path().display(),
        db.path().display()
    );
    let default_days = settings.analytics_days;

    match cli.command {
        Command::Track { seconds } => {
            let engine = TrackingEngine::new(EngineConfig::from(&settings))
                .with_sink(Arc::new(db.clone()));
            track(&engine, Duration::from_secs(seconds)).await?;
        }
        Command::Sessions { days } => {
            let sessions = db.get_sessions(days.unwrap_or(default_days)).await;
            if sessions.is_empty() {
                println!("No sessions recorded yet.");
            }
            for session in &sessions {
                print_session(session);
            }
        }
        Command::Stats { days } => {
            let sessions = db.get_sessions(days.unwrap_or(default_days)).await;
            match SessionStats::from_sessions(&sessions) {
                Some(stats) => {
                    println!("Sessions:      {}", stats.session_count);
                    println!("Focus time:    {:.1}h", stats.total_hours);
                    println!("Avg focus:     {:.0}/100", stats.average_focus);
                    println!("Productivity:  {:.0}/100", stats.average_productivity);
                    println!("Peak score:    {:.0}/100", stats.peak_focus);
                    println!(
                        "Top app:       {} ({:.1}/100)",
                        stats.top_app.name, stats.top_app.average_focus
                    );
                    for insight in insights(&stats) {
                        println!();
                        println!("{}", insight.title);
                        println!("  {}", insight.description);
                        println!("  {}", insight.recommendation);
                    }
                }
                None => println!("Start tracking to unlock insights."),
            }
        }
        Command::Export { days, dir } => {
            let dir = dir.unwrap_or_else(|| settings.export_dir.clone());
            match export_sessions(&db, days.unwrap_or(default_days), &dir).await? {
                Some(path) => println!("Exported to {}", path.display()),
                None => println!("No data found for export."),
            }
        }
    }

    Ok(())
}

async fn track(engine: &TrackingEngine, length: Duration) -> Result<()> {
    engine.start().await?;

    let deadline = tokio::time::sleep(length);
    tokio::pin!(deadline);
    let mut refresh = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => break,
            _ = refresh.tick() => print_live(&engine.snapshot().await),
        }
    }

    match engine.stop().await {
        Some(summary) => {
            println!();
            println!(
                "Session saved: {} at {:.1} focus / {:.1} productivity",
                format_duration(summary.duration_seconds),
                summary.focus_score,
                summary.productivity_score
            );
        }
        None => println!("\nSession too short to save."),
    }

    Ok(())
}

fn print_live(snapshot: &TrackerSnapshot) {
    let Some(session) = snapshot.session() else {
        println!("Ready to track");
        return;
    };

    let focus = session
        .latest_focus()
        .map(|v| format!("{v:.0}"))
        .unwrap_or_else(|| "--".into());
    let productivity = session
        .latest_productivity()
        .map(|v| format!("{v:.0}"))
        .unwrap_or_else(|| "--".into());

    println!(
        "Duration: {}  Focus: {}  Productivity: {}",
        format_duration(session.duration_seconds),
        focus,
        productivity
    );
}

fn print_session(session: &FocusSession) {
    println!(
        "{}  {:<16} {:>8}  focus {:>5.1}  productivity {:>5.1}  {}",
        session.timestamp.format("%Y-%m-%d %H:%M"),
        session.application,
        format_duration(session.duration_seconds),
        session.focus_score,
        session.productivity_score,
        session.category
    );
}
