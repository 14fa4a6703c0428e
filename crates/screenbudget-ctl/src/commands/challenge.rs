use anyhow::{bail, Result};
use uuid::Uuid;

fn parse_history(history: Option<&str>) -> Result<Vec<bool>> {
    let Some(history) = history else {
        return Ok(Vec::new());
    };

    history
        .chars()
        .map(|c| match c {
            '1' => Ok(true),
            '0' => Ok(false),
            other => bail!("history must contain only 1s and 0s, found {:?}", other),
        })
        .collect()
}

pub async fn new(tier: &str, history: Option<&str>) -> Result<()> {
    let ctx = super::context().await?;

    let outcomes = parse_history(history)?;
    let challenge = ctx.challenges.generate(tier, &outcomes).await?;

    println!("Challenge {} ({}, worth {} minutes):", challenge.id, challenge.difficulty, challenge.reward_minutes);
    println!("  {}", challenge.question);
    Ok(())
}

pub async fn answer(challenge_id: Uuid, answer: i64) -> Result<()> {
    let ctx = super::context().await?;

    let result = ctx.challenges.submit(challenge_id, answer).await?;
    if result.correct {
        println!("Correct! Earned {} minutes.", result.reward_minutes);
        println!("Credit them to an app with: screenbudget-ctl usage credit <app-id> {}", result.reward_minutes);
    } else {
        println!("Not quite - the answer was {}.", result.correct_answer);
    }
    Ok(())
}
