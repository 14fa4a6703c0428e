pub mod budget_days;
pub mod challenges;
pub mod ledger;
pub mod monitored_apps;
pub mod usage_sessions;

pub use budget_days::BudgetDayQueries;
pub use challenges::ChallengeQueries;
pub use ledger::LedgerQueries;
pub use monitored_apps::MonitoredAppQueries;
pub use usage_sessions::UsageSessionQueries;
