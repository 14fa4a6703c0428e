use anyhow::Result;
use uuid::Uuid;

pub async fn record(app_id: Uuid, minutes: i64) -> Result<()> {
    let ctx = super::context().await?;

    let (session, day) = ctx.ledger.record_session(app_id, minutes).await?;
    println!("Recorded {} minutes (session {})", session.duration_minutes, session.id);
    println!("Used today: {} minutes, blocked: {}", day.minutes_used, day.blocked);
    Ok(())
}

pub async fn set(app_id: Uuid, minutes: i64) -> Result<()> {
    let ctx = super::context().await?;

    let day = ctx.ledger.set_usage(app_id, minutes).await?;
    println!("Used today: {} minutes, blocked: {}", day.minutes_used, day.blocked);
    Ok(())
}

pub async fn credit(app_id: Uuid, minutes: i64) -> Result<()> {
    let ctx = super::context().await?;

    let day = ctx.ledger.credit_reward(app_id, minutes).await?;
    println!(
        "Credited {} minutes; earned today: {}, blocked: {}",
        minutes, day.earned_minutes, day.blocked
    );
    Ok(())
}
