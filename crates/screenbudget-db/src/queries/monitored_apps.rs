use crate::connection::Database;
use crate::error::{DbError, Result};
use crate::models::{DbMonitoredApp, NewDbMonitoredApp};
use chrono::Utc;

pub struct MonitoredAppQueries;

impl MonitoredAppQueries {
    pub async fn create(db: &Database, app: NewDbMonitoredApp) -> Result<DbMonitoredApp> {
        let pool = db.pool()?;

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO monitored_apps (id, user_id, package_name, app_name, daily_limit_minutes, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&app.id)
        .bind(&app.user_id)
        .bind(&app.package_name)
        .bind(&app.app_name)
        .bind(app.daily_limit_minutes)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await;

        match result {
            Ok(_) => Self::get_by_id(db, &app.id).await,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(DbError::Duplicate(
                format!("App {} is already monitored for user {}", app.package_name, app.user_id),
            )),
            Err(e) => Err(DbError::Sqlx(e)),
        }
    }

    pub async fn get_by_id(db: &Database, id: &str) -> Result<DbMonitoredApp> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbMonitoredApp>("SELECT * FROM monitored_apps WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Monitored app {} not found", id)))
    }

    /// Fetch an app only if it is still actively monitored.
    pub async fn get_active_by_id(db: &Database, id: &str) -> Result<DbMonitoredApp> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbMonitoredApp>(
            "SELECT * FROM monitored_apps WHERE id = ? AND active = 1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("Monitored app {} not found", id)))
    }

    pub async fn list_active_for_user(db: &Database, user_id: &str) -> Result<Vec<DbMonitoredApp>> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbMonitoredApp>(
            "SELECT * FROM monitored_apps WHERE user_id = ? AND active = 1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(DbError::Sqlx)
    }

    /// Soft-deactivate; the row and its history are kept.
    pub async fn deactivate(db: &Database, id: &str) -> Result<()> {
        let pool = db.pool()?;

        let result =
            sqlx::query("UPDATE monitored_apps SET active = 0, updated_at = ? WHERE id = ? AND active = 1")
                .bind(Utc::now())
                .bind(id)
                .execute(pool)
                .await?;

        if result.rows_affected() == 0 {
            Err(DbError::NotFound(format!("Monitored app {} not found", id)))
        } else {
            Ok(())
        }
    }
}
