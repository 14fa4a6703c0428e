use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Difficulty classification of an arithmetic challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    /// Parse a tier key, treating anything unrecognized as medium.
    pub fn from_key(key: &str) -> Tier {
        match key {
            "easy" => Tier::Easy,
            "hard" => Tier::Hard,
            _ => Tier::Medium,
        }
    }

    /// Strict parse, for callers that need to distinguish `auto` and
    /// garbage from a concrete tier.
    pub fn try_from_key(key: &str) -> Option<Tier> {
        match key {
            "easy" => Some(Tier::Easy),
            "medium" => Some(Tier::Medium),
            "hard" => Some(Tier::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a challenge came from: the curated bank or the text-generation
/// upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeSource {
    Bank,
    Generated,
}

impl ChallengeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeSource::Bank => "bank",
            ChallengeSource::Generated => "generated",
        }
    }
}

/// A single arithmetic challenge. Created by the generator, mutated exactly
/// once by the first submission, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub question: String,
    pub answer: i64,
    pub difficulty: Tier,
    /// Minutes credited on a correct answer; fixed at creation.
    pub reward_minutes: i64,
    pub completed: bool,
    pub correct: Option<bool>,
    pub source: ChallengeSource,
    pub created_at: DateTime<Utc>,
    /// When the first answer came in; unset until then.
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Outcome of answering a challenge. Advisory only: crediting the reward
/// into the ledger is a separate, explicit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub correct: bool,
    pub reward_minutes: i64,
    pub correct_answer: i64,
}

/// An application under monitoring for one user. Day-level usage state
/// lives in [`BudgetDay`], keyed by calendar date, so "today" rolls over
/// without a reset job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredApp {
    pub id: Uuid,
    pub user_id: String,
    pub package_name: String,
    pub app_name: String,
    /// Base allowance in minutes per day. Zero is legal and means the app
    /// blocks as soon as any usage is recorded.
    pub daily_limit_minutes: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for monitoring a new app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMonitoredApp {
    pub user_id: String,
    pub package_name: String,
    pub app_name: String,
    pub daily_limit_minutes: i64,
}

/// Per-(app, date) usage bucket. `blocked` is derived from the other
/// fields at write time and is never settable on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetDay {
    pub app_id: Uuid,
    pub date: NaiveDate,
    pub minutes_used: i64,
    /// Minutes credited from correctly answered challenges; extends the
    /// daily limit for this date only.
    pub earned_minutes: i64,
    pub blocked: bool,
}

impl BudgetDay {
    /// The blocking rule: usage meets or exceeds the base limit plus
    /// whatever was earned that day.
    pub fn is_blocked(minutes_used: i64, daily_limit: i64, earned_minutes: i64) -> bool {
        minutes_used >= daily_limit + earned_minutes
    }
}

/// Immutable, append-only record of one stretch of app usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSession {
    pub id: Uuid,
    pub app_id: Uuid,
    pub user_id: String,
    pub package_name: String,
    pub app_name: String,
    pub duration_minutes: i64,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
}

/// Live view of one monitored app for display surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub app_id: Uuid,
    pub package_name: String,
    pub app_name: String,
    pub daily_limit_minutes: i64,
    pub minutes_used_today: i64,
    pub earned_minutes_today: i64,
    pub blocked: bool,
    /// Usage as a share of the effective limit, capped at 100.
    pub percent_used: f64,
}

/// Read-only rollup over the ledger and challenge history. Recomputed on
/// demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub total_minutes_used: i64,
    pub average_daily_minutes: f64,
    pub most_used_app: Option<String>,
    pub challenges_completed: i64,
    pub minutes_earned: i64,
    pub streak_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_from_key_defaults_to_medium() {
        assert_eq!(Tier::from_key("easy"), Tier::Easy);
        assert_eq!(Tier::from_key("hard"), Tier::Hard);
        assert_eq!(Tier::from_key("medium"), Tier::Medium);
        assert_eq!(Tier::from_key("impossible"), Tier::Medium);
        assert_eq!(Tier::from_key(""), Tier::Medium);
    }

    #[test]
    fn tier_try_from_key_rejects_garbage() {
        assert_eq!(Tier::try_from_key("auto"), None);
        assert_eq!(Tier::try_from_key("EASY"), None);
        assert_eq!(Tier::try_from_key("medium"), Some(Tier::Medium));
    }

    #[test]
    fn blocked_rule_includes_earned_minutes() {
        assert!(BudgetDay::is_blocked(60, 60, 0));
        assert!(!BudgetDay::is_blocked(59, 60, 0));
        assert!(!BudgetDay::is_blocked(60, 60, 5));
        assert!(BudgetDay::is_blocked(65, 60, 5));
        // A zero limit blocks immediately unless minutes were earned.
        assert!(BudgetDay::is_blocked(1, 0, 0));
        assert!(BudgetDay::is_blocked(0, 0, 0));
        assert!(!BudgetDay::is_blocked(0, 0, 5));
    }
}
