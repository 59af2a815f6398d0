//! System status dashboard command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display a storage summary: row counts per entity plus the pending
/// notification backlog.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let teams = count(state, "SELECT COUNT(*) FROM teams").await?;
    let groups = count(state, "SELECT COUNT(*) FROM groups WHERE is_deleted = 0").await?;
    let places = count(state, "SELECT COUNT(*) FROM places").await?;
    let accounts = count(state, "SELECT COUNT(*) FROM accounts").await?;
    let practices = count(state, "SELECT COUNT(*) FROM practices WHERE is_deleted = 0").await?;
    let unnotified = count(
        state,
        "SELECT COUNT(*) FROM practices WHERE is_deleted = 0 AND is_notified = 0",
    )
    .await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "teams": teams,
            "groups": groups,
            "places": places,
            "accounts": accounts,
            "practices": {
                "total": practices,
                "unnotified": unnotified,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Greenroom v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("  Teams:     {}", style(teams).bold());
    println!("  Groups:    {}", style(groups).bold());
    println!("  Places:    {}", style(places).bold());
    println!("  Accounts:  {}", style(accounts).bold());
    println!("  Practices: {}", style(practices).bold());
    if unnotified > 0 {
        println!(
            "  Awaiting notification: {}",
            style(unnotified).yellow()
        );
    }
    println!();

    Ok(())
}

async fn count(state: &AppState, sql: &str) -> Result<i64> {
    let (n,): (i64,) = sqlx::query_as(sql)
        .fetch_one(&state.db_pool.reader)
        .await?;
    Ok(n)
}
