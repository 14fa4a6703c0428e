use anyhow::Result;

pub async fn show(days: u32) -> Result<()> {
    let ctx = super::context().await?;

    let analytics = ctx.analytics.summarize(days).await?;

    println!("Last {} days:", days);
    println!("  Total screen time: {} minutes", analytics.total_minutes_used);
    println!("  Daily average: {:.1} minutes", analytics.average_daily_minutes);
    match &analytics.most_used_app {
        Some(app) => println!("  Most used app: {}", app),
        None => println!("  Most used app: (none)"),
    }
    println!("  Challenges completed: {}", analytics.challenges_completed);
    println!("  Minutes earned: {}", analytics.minutes_earned);
    println!("  Current streak: {} days", analytics.streak_days);

    Ok(())
}
