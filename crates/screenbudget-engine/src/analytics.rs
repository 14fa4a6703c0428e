use chrono::{Duration, NaiveDate, NaiveTime};
use screenbudget_common::{Analytics, Clock, Result};
use screenbudget_db::queries::{ChallengeQueries, UsageSessionQueries};
use screenbudget_db::Database;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Read-only rollups over the session log and challenge history. Never
/// mutates state.
pub struct AnalyticsService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl AnalyticsService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Summarize the last `window_days` calendar days, today included.
    /// A zero-length window yields zeroed totals rather than a division
    /// error; the streak always reflects full history.
    pub async fn summarize(&self, window_days: u32) -> Result<Analytics> {
        let today = self.clock.today();
        let streak_days = self.current_streak(today).await?;

        if window_days == 0 {
            return Ok(Analytics {
                total_minutes_used: 0,
                average_daily_minutes: 0.0,
                most_used_app: None,
                challenges_completed: 0,
                minutes_earned: 0,
                streak_days,
            });
        }

        let window_start = today - Duration::days(i64::from(window_days) - 1);

        let sessions = UsageSessionQueries::list_since(&self.db, window_start).await?;
        let total_minutes_used: i64 = sessions.iter().map(|s| s.duration_minutes).sum();
        let average_daily_minutes = total_minutes_used as f64 / f64::from(window_days);
        let most_used_app = most_used(sessions.iter().map(|s| (s.app_name.as_str(), s.duration_minutes)));

        let window_start_at = window_start.and_time(NaiveTime::MIN).and_utc();
        let challenges = ChallengeQueries::list_created_since(&self.db, window_start_at).await?;
        let challenges_completed = challenges.iter().filter(|c| c.completed).count() as i64;
        let minutes_earned: i64 = challenges
            .iter()
            .filter(|c| c.correct == Some(true))
            .map(|c| c.reward_minutes)
            .sum();

        Ok(Analytics {
            total_minutes_used,
            average_daily_minutes,
            most_used_app,
            challenges_completed,
            minutes_earned,
            streak_days,
        })
    }

    /// Consecutive days with at least one correctly answered challenge,
    /// counted back from today. A streak survives until a full day passes
    /// with no correct answer, so a run ending yesterday still counts.
    async fn current_streak(&self, today: NaiveDate) -> Result<i64> {
        let dates: HashSet<NaiveDate> =
            ChallengeQueries::correct_answer_dates(&self.db).await?.into_iter().collect();

        let mut day = if dates.contains(&today) { today } else { today - Duration::days(1) };

        let mut streak = 0;
        while dates.contains(&day) {
            streak += 1;
            day -= Duration::days(1);
        }

        Ok(streak)
    }
}

/// Largest summed duration wins; ties go to the app seen first in
/// iteration order. Observable and deliberate.
fn most_used<'a>(pairs: impl Iterator<Item = (&'a str, i64)>) -> Option<String> {
    let mut totals: HashMap<&str, i64> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for (name, duration) in pairs {
        if !totals.contains_key(name) {
            order.push(name);
        }
        *totals.entry(name).or_insert(0) += duration;
    }

    let mut best: Option<(&str, i64)> = None;
    for name in order {
        let total = totals[name];
        if best.map_or(true, |(_, t)| total > t) {
            best = Some((name, total));
        }
    }

    best.map(|(name, _)| name.to_string())
}
