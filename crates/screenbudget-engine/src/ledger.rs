use screenbudget_common::{
    BudgetDay, BudgetStatus, Clock, Error, MonitoredApp, NewMonitoredApp, Result, UsageSession,
};
use screenbudget_db::queries::{BudgetDayQueries, LedgerQueries, MonitoredAppQueries};
use screenbudget_db::{Database, DbBudgetDay, DbMonitoredApp, DbUsageSession, NewDbMonitoredApp, NewUsageSession};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// The time ledger: per-app daily budgets, the append-only session log,
/// and the derived blocked state. All day-bucket writes are serialized in
/// the storage layer; this service only validates, buckets by the injected
/// clock's "today", and converts rows.
pub struct LedgerService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Start monitoring an app. One active budget per (user, package).
    pub async fn add_app(&self, new: NewMonitoredApp) -> Result<MonitoredApp> {
        if new.daily_limit_minutes < 0 {
            return Err(Error::InvalidArgument(format!(
                "daily limit must not be negative, got {}",
                new.daily_limit_minutes
            )));
        }

        let row = MonitoredAppQueries::create(
            &self.db,
            NewDbMonitoredApp {
                id: Uuid::new_v4().to_string(),
                user_id: new.user_id,
                package_name: new.package_name,
                app_name: new.app_name,
                daily_limit_minutes: new.daily_limit_minutes,
            },
        )
        .await?;

        info!("Monitoring {} for user {}", row.package_name, row.user_id);
        app_from_row(row)
    }

    /// Stop monitoring. Soft-deactivation: history stays queryable.
    pub async fn remove_app(&self, app_id: Uuid) -> Result<()> {
        MonitoredAppQueries::deactivate(&self.db, &app_id.to_string()).await?;
        info!("Stopped monitoring app {}", app_id);
        Ok(())
    }

    pub async fn list_apps(&self, user_id: &str) -> Result<Vec<MonitoredApp>> {
        let rows = MonitoredAppQueries::list_active_for_user(&self.db, user_id).await?;
        rows.into_iter().map(app_from_row).collect()
    }

    /// Append an immutable usage session and reconcile today's bucket with
    /// the full session sum.
    pub async fn record_session(
        &self,
        app_id: Uuid,
        duration_minutes: i64,
    ) -> Result<(UsageSession, BudgetDay)> {
        if duration_minutes < 0 {
            return Err(Error::InvalidArgument(format!(
                "session duration must not be negative, got {}",
                duration_minutes
            )));
        }

        let app = MonitoredAppQueries::get_active_by_id(&self.db, &app_id.to_string()).await?;

        let session = NewUsageSession {
            id: Uuid::new_v4().to_string(),
            app_id: app.id.clone(),
            user_id: app.user_id.clone(),
            package_name: app.package_name.clone(),
            app_name: app.app_name.clone(),
            duration_minutes,
            timestamp: self.clock.now(),
            date: self.clock.today(),
        };

        let (session, day) =
            LedgerQueries::record_session(&self.db, session, app.daily_limit_minutes).await?;

        Ok((session_from_row(session)?, day_from_row(day)?))
    }

    /// Direct-set path for monitors that total usage themselves.
    pub async fn set_usage(&self, app_id: Uuid, minutes_used: i64) -> Result<BudgetDay> {
        if minutes_used < 0 {
            return Err(Error::InvalidArgument(format!(
                "minutes used must not be negative, got {}",
                minutes_used
            )));
        }

        let app = MonitoredAppQueries::get_active_by_id(&self.db, &app_id.to_string()).await?;

        let day = LedgerQueries::set_usage(
            &self.db,
            &app.id,
            self.clock.today(),
            minutes_used,
            app.daily_limit_minutes,
        )
        .await?;

        day_from_row(day)
    }

    /// Credit challenge-reward minutes into today's bucket. The earned
    /// minutes extend the daily limit for this date only.
    pub async fn credit_reward(&self, app_id: Uuid, minutes: i64) -> Result<BudgetDay> {
        if minutes <= 0 {
            return Err(Error::InvalidArgument(format!(
                "credited minutes must be positive, got {}",
                minutes
            )));
        }

        let app = MonitoredAppQueries::get_active_by_id(&self.db, &app_id.to_string()).await?;

        let day = LedgerQueries::credit_reward(
            &self.db,
            &app.id,
            self.clock.today(),
            minutes,
            app.daily_limit_minutes,
        )
        .await?;

        info!("Credited {} minutes to {} for {}", minutes, app.package_name, day.date);
        day_from_row(day)
    }

    /// Live view across all active apps for one user.
    pub async fn status(&self, user_id: &str) -> Result<Vec<BudgetStatus>> {
        let apps = MonitoredAppQueries::list_active_for_user(&self.db, user_id).await?;
        let today = self.clock.today();

        let mut statuses = Vec::with_capacity(apps.len());
        for app in apps {
            let day = BudgetDayQueries::get(&self.db, &app.id, today).await?;
            statuses.push(status_from_rows(&app, day.as_ref())?);
        }

        Ok(statuses)
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|e| Error::Storage(format!("bad id {}: {}", id, e)))
}

fn app_from_row(row: DbMonitoredApp) -> Result<MonitoredApp> {
    Ok(MonitoredApp {
        id: parse_id(&row.id)?,
        user_id: row.user_id,
        package_name: row.package_name,
        app_name: row.app_name,
        daily_limit_minutes: row.daily_limit_minutes,
        active: row.active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn session_from_row(row: DbUsageSession) -> Result<UsageSession> {
    Ok(UsageSession {
        id: parse_id(&row.id)?,
        app_id: parse_id(&row.app_id)?,
        user_id: row.user_id,
        package_name: row.package_name,
        app_name: row.app_name,
        duration_minutes: row.duration_minutes,
        timestamp: row.timestamp,
        date: row.date,
    })
}

fn day_from_row(row: DbBudgetDay) -> Result<BudgetDay> {
    Ok(BudgetDay {
        app_id: parse_id(&row.app_id)?,
        date: row.date,
        minutes_used: row.minutes_used,
        earned_minutes: row.earned_minutes,
        blocked: row.blocked,
    })
}

fn status_from_rows(app: &DbMonitoredApp, day: Option<&DbBudgetDay>) -> Result<BudgetStatus> {
    let minutes_used = day.map_or(0, |d| d.minutes_used);
    let earned = day.map_or(0, |d| d.earned_minutes);

    // Days without a bucket row have seen no writes; derive the state the
    // same way a write would.
    let blocked = BudgetDay::is_blocked(minutes_used, app.daily_limit_minutes, earned);

    let effective_limit = app.daily_limit_minutes + earned;
    let percent_used = if effective_limit > 0 {
        (minutes_used as f64 / effective_limit as f64 * 100.0).min(100.0)
    } else {
        100.0
    };

    Ok(BudgetStatus {
        app_id: parse_id(&app.id)?,
        package_name: app.package_name.clone(),
        app_name: app.app_name.clone(),
        daily_limit_minutes: app.daily_limit_minutes,
        minutes_used_today: minutes_used,
        earned_minutes_today: earned,
        blocked,
        percent_used,
    })
}
