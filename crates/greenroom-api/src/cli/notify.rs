//! Manual notifier run command.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, Utc};
use console::style;

use crate::state::AppState;

/// Run the reminder fan-out for one date (default: tomorrow).
pub async fn notify(state: &AppState, date: Option<&str>, json: bool) -> Result<()> {
    let target = match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("'{raw}' is not a YYYY-MM-DD date"))?,
        None => Utc::now()
            .date_naive()
            .checked_add_days(Days::new(1))
            .context("date overflow")?,
    };

    let report = state.notifier.run(target).await?;

    if json {
        let report = serde_json::json!({
            "date": target.to_string(),
            "groups_notified": report.groups_notified,
            "pushes_sent": report.pushes_sent,
            "groups_failed": report.groups_failed,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Notified {} group(s) for {} ({} push(es) sent)",
        style("⚡").bold(),
        style(report.groups_notified).bold(),
        style(target).cyan(),
        report.pushes_sent,
    );
    if report.groups_failed > 0 {
        println!(
            "  {} {} group(s) failed and will be retried on the next run",
            style("!").yellow().bold(),
            report.groups_failed,
        );
    }
    println!();

    Ok(())
}
