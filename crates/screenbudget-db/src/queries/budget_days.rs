use crate::connection::Database;
use crate::error::{DbError, Result};
use crate::models::DbBudgetDay;
use chrono::NaiveDate;

pub struct BudgetDayQueries;

impl BudgetDayQueries {
    pub async fn get(db: &Database, app_id: &str, date: NaiveDate) -> Result<Option<DbBudgetDay>> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbBudgetDay>(
            "SELECT * FROM budget_days WHERE app_id = ? AND date = ?",
        )
        .bind(app_id)
        .bind(date)
        .fetch_optional(pool)
        .await
        .map_err(DbError::Sqlx)
    }
}
