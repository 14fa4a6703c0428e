use crate::connection::Database;
use crate::error::{DbError, Result};
use crate::models::{DbBudgetDay, DbUsageSession, NewUsageSession};
use chrono::{NaiveDate, Utc};
use screenbudget_common::BudgetDay;
use sqlx::{Connection, Sqlite, SqliteConnection};

/// Budget-day writes. Every mutation of a (app, date) bucket runs inside a
/// single IMMEDIATE transaction: the write lock is taken up front, today's
/// sessions are resummed in full, and `blocked` is recomputed from the same
/// snapshot. Read-then-add from outside the transaction would lose updates
/// under concurrent writers. Dropping the transaction on any error path
/// rolls it back before the connection returns to the pool.
pub struct LedgerQueries;

impl LedgerQueries {
    /// Append a usage session and reconcile the day bucket with the
    /// authoritative session sum.
    pub async fn record_session(
        db: &Database,
        session: NewUsageSession,
        daily_limit: i64,
    ) -> Result<(DbUsageSession, DbBudgetDay)> {
        let pool = db.pool()?;
        let mut conn = pool.acquire().await?;

        let mut tx = conn.begin_with("BEGIN IMMEDIATE").await?;
        let outcome = Self::record_session_locked(&mut tx, &session, daily_limit).await?;
        tx.commit().await?;

        Ok(outcome)
    }

    async fn record_session_locked(
        conn: &mut SqliteConnection,
        session: &NewUsageSession,
        daily_limit: i64,
    ) -> Result<(DbUsageSession, DbBudgetDay)> {
        sqlx::query(
            r#"
            INSERT INTO usage_sessions (id, app_id, user_id, package_name, app_name, duration_minutes, timestamp, date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.app_id)
        .bind(&session.user_id)
        .bind(&session.package_name)
        .bind(&session.app_name)
        .bind(session.duration_minutes)
        .bind(session.timestamp)
        .bind(session.date)
        .execute(&mut *conn)
        .await?;

        // Full resum of the append-only log, not an incremental add.
        let minutes_used: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(duration_minutes), 0) FROM usage_sessions WHERE app_id = ? AND date = ?",
        )
        .bind(&session.app_id)
        .bind(session.date)
        .fetch_one(&mut *conn)
        .await?;

        let day =
            Self::write_bucket(conn, &session.app_id, session.date, minutes_used, None, daily_limit)
                .await?;

        let stored = sqlx::query_as::<Sqlite, DbUsageSession>(
            "SELECT * FROM usage_sessions WHERE id = ?",
        )
        .bind(&session.id)
        .fetch_one(&mut *conn)
        .await?;

        Ok((stored, day))
    }

    /// Overwrite the minutes-used counter for a day. Used by on-device
    /// monitors that compute totals themselves.
    pub async fn set_usage(
        db: &Database,
        app_id: &str,
        date: NaiveDate,
        minutes_used: i64,
        daily_limit: i64,
    ) -> Result<DbBudgetDay> {
        let pool = db.pool()?;
        let mut conn = pool.acquire().await?;

        let mut tx = conn.begin_with("BEGIN IMMEDIATE").await?;
        let day = Self::write_bucket(&mut tx, app_id, date, minutes_used, None, daily_limit).await?;
        tx.commit().await?;

        Ok(day)
    }

    /// Add earned minutes to a day bucket, preserving the recorded usage.
    pub async fn credit_reward(
        db: &Database,
        app_id: &str,
        date: NaiveDate,
        minutes: i64,
        daily_limit: i64,
    ) -> Result<DbBudgetDay> {
        let pool = db.pool()?;
        let mut conn = pool.acquire().await?;

        let mut tx = conn.begin_with("BEGIN IMMEDIATE").await?;

        let current = Self::read_bucket(&mut tx, app_id, date).await?;
        let (minutes_used, earned) = match &current {
            Some(day) => (day.minutes_used, day.earned_minutes + minutes),
            None => (0, minutes),
        };

        let day =
            Self::write_bucket(&mut tx, app_id, date, minutes_used, Some(earned), daily_limit)
                .await?;
        tx.commit().await?;

        Ok(day)
    }

    async fn read_bucket(
        conn: &mut SqliteConnection,
        app_id: &str,
        date: NaiveDate,
    ) -> Result<Option<DbBudgetDay>> {
        sqlx::query_as::<Sqlite, DbBudgetDay>(
            "SELECT * FROM budget_days WHERE app_id = ? AND date = ?",
        )
        .bind(app_id)
        .bind(date)
        .fetch_optional(&mut *conn)
        .await
        .map_err(DbError::Sqlx)
    }

    /// Upsert the bucket with `blocked` derived inside the same critical
    /// section. `earned` of None keeps whatever the row already holds.
    async fn write_bucket(
        conn: &mut SqliteConnection,
        app_id: &str,
        date: NaiveDate,
        minutes_used: i64,
        earned: Option<i64>,
        daily_limit: i64,
    ) -> Result<DbBudgetDay> {
        let existing_earned = match earned {
            Some(e) => e,
            None => Self::read_bucket(conn, app_id, date).await?.map_or(0, |d| d.earned_minutes),
        };

        let blocked = BudgetDay::is_blocked(minutes_used, daily_limit, existing_earned);
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO budget_days (app_id, date, minutes_used, earned_minutes, blocked, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (app_id, date) DO UPDATE SET
                minutes_used = excluded.minutes_used,
                earned_minutes = excluded.earned_minutes,
                blocked = excluded.blocked,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(app_id)
        .bind(date)
        .bind(minutes_used)
        .bind(existing_earned)
        .bind(blocked)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Self::read_bucket(conn, app_id, date)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Budget day {} / {} not found", app_id, date)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::DatabaseConfig;
    use crate::models::NewDbMonitoredApp;
    use crate::queries::MonitoredAppQueries;
    use tempfile::tempdir;

    async fn setup_test_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let config = DatabaseConfig { path: db_path.to_str().unwrap().to_string() };

        let db = Database::new(config).await.unwrap();
        db.run_migrations().await.unwrap();

        MonitoredAppQueries::create(
            &db,
            NewDbMonitoredApp {
                id: "a1".to_string(),
                user_id: "default".to_string(),
                package_name: "com.example.social".to_string(),
                app_name: "Social".to_string(),
                daily_limit_minutes: 60,
            },
        )
        .await
        .unwrap();

        (db, dir)
    }

    fn session(id: &str, duration: i64, date: NaiveDate) -> NewUsageSession {
        NewUsageSession {
            id: id.to_string(),
            app_id: "a1".to_string(),
            user_id: "default".to_string(),
            package_name: "com.example.social".to_string(),
            app_name: "Social".to_string(),
            duration_minutes: duration,
            timestamp: Utc::now(),
            date,
        }
    }

    #[tokio::test]
    async fn test_record_session_reconciles_bucket() {
        let (db, _dir) = setup_test_db().await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let (_, day) =
            LedgerQueries::record_session(&db, session("s1", 30, date), 60).await.unwrap();
        assert_eq!(day.minutes_used, 30);
        assert!(!day.blocked);

        let (_, day) =
            LedgerQueries::record_session(&db, session("s2", 35, date), 60).await.unwrap();
        assert_eq!(day.minutes_used, 65);
        assert!(day.blocked);
    }

    #[tokio::test]
    async fn test_sessions_on_other_dates_do_not_leak() {
        let (db, _dir) = setup_test_db().await;
        let yesterday = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        LedgerQueries::record_session(&db, session("s1", 50, yesterday), 60).await.unwrap();
        let (_, day) =
            LedgerQueries::record_session(&db, session("s2", 10, today), 60).await.unwrap();

        assert_eq!(day.minutes_used, 10);
        assert!(!day.blocked);
    }

    #[tokio::test]
    async fn test_credit_reward_extends_limit() {
        let (db, _dir) = setup_test_db().await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let (_, day) =
            LedgerQueries::record_session(&db, session("s1", 65, date), 60).await.unwrap();
        assert!(day.blocked);

        let day = LedgerQueries::credit_reward(&db, "a1", date, 8, 60).await.unwrap();
        assert_eq!(day.earned_minutes, 8);
        assert_eq!(day.minutes_used, 65);
        assert!(!day.blocked);
    }

    #[tokio::test]
    async fn test_set_usage_overwrites_and_keeps_earned() {
        let (db, _dir) = setup_test_db().await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        LedgerQueries::credit_reward(&db, "a1", date, 5, 60).await.unwrap();
        let day = LedgerQueries::set_usage(&db, "a1", date, 64, 60).await.unwrap();

        assert_eq!(day.minutes_used, 64);
        assert_eq!(day.earned_minutes, 5);
        assert!(!day.blocked);

        let day = LedgerQueries::set_usage(&db, "a1", date, 65, 60).await.unwrap();
        assert!(day.blocked);
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back_and_frees_the_connection() {
        let (db, _dir) = setup_test_db().await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        LedgerQueries::record_session(&db, session("s1", 30, date), 60).await.unwrap();

        // Duplicate session id fails mid-transaction after the lock is held.
        LedgerQueries::record_session(&db, session("s1", 30, date), 60).await.unwrap_err();

        // The failed write left nothing behind and later writes go through.
        let (_, day) =
            LedgerQueries::record_session(&db, session("s2", 10, date), 60).await.unwrap();
        assert_eq!(day.minutes_used, 40);
        assert!(!day.blocked);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sessions_lose_no_updates() {
        let (db, _dir) = setup_test_db().await;
        let db = std::sync::Arc::new(db);
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let mut handles = Vec::new();
        for i in 0..10 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                LedgerQueries::record_session(&db, session(&format!("s{}", i), 7, date), 60)
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let day = crate::queries::BudgetDayQueries::get(&db, "a1", date).await.unwrap().unwrap();
        assert_eq!(day.minutes_used, 70);
        assert!(day.blocked);
    }
}
