use crate::connection::Database;
use crate::error::{DbError, Result};
use crate::models::DbUsageSession;
use chrono::NaiveDate;

/// Read side of the session log. Writes go through [`LedgerQueries`] so the
/// day bucket is reconciled in the same transaction.
///
/// [`LedgerQueries`]: crate::queries::LedgerQueries
pub struct UsageSessionQueries;

impl UsageSessionQueries {
    pub async fn list_since(db: &Database, since: NaiveDate) -> Result<Vec<DbUsageSession>> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbUsageSession>(
            "SELECT * FROM usage_sessions WHERE date >= ? ORDER BY timestamp ASC",
        )
        .bind(since)
        .fetch_all(pool)
        .await
        .map_err(DbError::Sqlx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::DatabaseConfig;
    use crate::models::{NewDbMonitoredApp, NewUsageSession};
    use crate::queries::{LedgerQueries, MonitoredAppQueries};
    use chrono::Utc;
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
    async fn test_list_since_filters_by_date() {
        let (db, _dir) = setup_test_db().await;
        let early = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        LedgerQueries::record_session(&db, session("s1", 10, early), 60).await.unwrap();
        LedgerQueries::record_session(&db, session("s2", 20, late), 60).await.unwrap();

        let all = UsageSessionQueries::list_since(&db, early).await.unwrap();
        assert_eq!(all.len(), 2);

        let recent = UsageSessionQueries::list_since(&db, late).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "s2");
    }
}
