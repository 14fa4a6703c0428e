use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbChallenge {
    pub id: String,
    pub question: String,
    pub answer: i64,
    pub difficulty: String,
    pub reward_minutes: i64,
    pub completed: bool,
    pub correct: Option<bool>,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChallenge {
    pub id: String,
    pub question: String,
    pub answer: i64,
    pub difficulty: String,
    pub reward_minutes: i64,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbMonitoredApp {
    pub id: String,
    pub user_id: String,
    pub package_name: String,
    pub app_name: String,
    pub daily_limit_minutes: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDbMonitoredApp {
    pub id: String,
    pub user_id: String,
    pub package_name: String,
    pub app_name: String,
    pub daily_limit_minutes: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbUsageSession {
    pub id: String,
    pub app_id: String,
    pub user_id: String,
    pub package_name: String,
    pub app_name: String,
    pub duration_minutes: i64,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUsageSession {
    pub id: String,
    pub app_id: String,
    pub user_id: String,
    pub package_name: String,
    pub app_name: String,
    pub duration_minutes: i64,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbBudgetDay {
    pub app_id: String,
    pub date: NaiveDate,
    pub minutes_used: i64,
    pub earned_minutes: i64,
    pub blocked: bool,
    pub updated_at: DateTime<Utc>,
}
