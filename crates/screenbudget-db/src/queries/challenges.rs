use crate::connection::Database;
use crate::error::{DbError, Result};
use crate::models::{DbChallenge, NewChallenge};
use chrono::{DateTime, Utc};

pub struct ChallengeQueries;

impl ChallengeQueries {
    pub async fn create(db: &Database, challenge: NewChallenge) -> Result<DbChallenge> {
        let pool = db.pool()?;

        sqlx::query(
            r#"
            INSERT INTO challenges (id, question, answer, difficulty, reward_minutes, completed, correct, source, created_at)
            VALUES (?, ?, ?, ?, ?, 0, NULL, ?, ?)
            "#,
        )
        .bind(&challenge.id)
        .bind(&challenge.question)
        .bind(challenge.answer)
        .bind(&challenge.difficulty)
        .bind(challenge.reward_minutes)
        .bind(&challenge.source)
        .bind(challenge.created_at)
        .execute(pool)
        .await?;

        Self::get_by_id(db, &challenge.id).await
    }

    pub async fn get_by_id(db: &Database, id: &str) -> Result<DbChallenge> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbChallenge>("SELECT * FROM challenges WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Challenge {} not found", id)))
    }

    /// Record the first submission outcome and when it happened. Returns
    /// false if the challenge was already completed, in which case the row
    /// is untouched.
    pub async fn mark_submitted(
        db: &Database,
        id: &str,
        correct: bool,
        submitted_at: DateTime<Utc>,
    ) -> Result<bool> {
        let pool = db.pool()?;

        let result = sqlx::query(
            "UPDATE challenges SET completed = 1, correct = ?, submitted_at = ? WHERE id = ? AND completed = 0",
        )
        .bind(correct)
        .bind(submitted_at)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Distinct calendar days with at least one correctly answered
    /// challenge, newest first, keyed by when the answer was submitted.
    /// Drives the streak computation.
    pub async fn correct_answer_dates(db: &Database) -> Result<Vec<chrono::NaiveDate>> {
        let pool = db.pool()?;

        let raw: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT substr(submitted_at, 1, 10) FROM challenges \
             WHERE correct = 1 AND submitted_at IS NOT NULL ORDER BY 1 DESC",
        )
        .fetch_all(pool)
        .await?;

        raw.iter()
            .map(|s| {
                s.parse::<chrono::NaiveDate>()
                    .map_err(|e| DbError::InvalidData(format!("bad challenge date {}: {}", s, e)))
            })
            .collect()
    }

    pub async fn list_created_since(
        db: &Database,
        since: DateTime<Utc>,
    ) -> Result<Vec<DbChallenge>> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbChallenge>(
            "SELECT * FROM challenges WHERE created_at >= ? ORDER BY created_at ASC",
        )
        .bind(since)
        .fetch_all(pool)
        .await
        .map_err(DbError::Sqlx)
    }
}
