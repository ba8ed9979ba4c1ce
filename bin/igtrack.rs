use anyhow::Context;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

use igtrack::{
    data,
    report::{format_date, latest_rows},
    Settings, Summarizer, WeeklyReport,
};

fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .context("Failed to initialize logger")?;

    // Load configuration
    let settings = Settings::new()
        .context("Failed to load config.yaml. Please ensure it exists and is valid")?;

    let snapshots = data::load_snapshots(&settings.data.snapshots)?;
    let posts = match &settings.data.posts {
        Some(path) => data::load_posts(path)?,
        None => Vec::new(),
    };

    // One summarizer per data load; dropped with the loaded tables
    let summarizer = Summarizer::with_settings(snapshots, &settings.summary)
        .context("Failed to build summarizer from snapshot table")?;

    // Latest-day leaderboard
    let table = summarizer.table();
    for row in latest_rows(table) {
        let snapshot = &table.rows()[row];
        info!(
            "{} {}: {} followers, {} posts",
            snapshot.date, snapshot.name, snapshot.followers_count, snapshot.media_count
        );
    }

    let report = WeeklyReport::build(&summarizer, &posts, &settings.report)
        .context("Failed to build weekly report")?;

    info!(
        "{} weekly report for {} ({} ~ {})",
        report.week,
        report.target_account,
        format_date(report.period_start),
        format_date(report.report_date)
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
