use anyhow::Result;

pub async fn show(user: &str) -> Result<()> {
    let ctx = super::context().await?;

    let statuses = ctx.ledger.status(user).await?;
    if statuses.is_empty() {
        println!("No monitored apps for user {}", user);
        return Ok(());
    }

    println!("Today's budgets for {}:", user);
    for status in statuses {
        let state = if status.blocked { "BLOCKED" } else { "ok" };
        println!(
            "  {} ({}): {}/{} min used (+{} earned), {:.0}% - {}",
            status.app_name,
            status.package_name,
            status.minutes_used_today,
            status.daily_limit_minutes,
            status.earned_minutes_today,
            status.percent_used,
            state
        );
    }

    Ok(())
}
