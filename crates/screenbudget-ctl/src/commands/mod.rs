pub mod app;
pub mod challenge;
pub mod stats;
pub mod status;
pub mod usage;

use anyhow::Result;
use screenbudget_common::{ServiceConfig, SystemClock};
use screenbudget_db::{Database, DatabaseConfig};
use screenbudget_engine::{
    AnalyticsService, ChallengeService, LedgerService, OllamaTextGenerator, TextGenerator,
};
use std::sync::Arc;

/// Engine services wired from the on-disk configuration.
pub struct Context {
    pub ledger: LedgerService,
    pub challenges: ChallengeService,
    pub analytics: AnalyticsService,
}

pub async fn context() -> Result<Context> {
    let config = ServiceConfig::load()?;

    let db = Arc::new(Database::new(DatabaseConfig { path: config.database.path.clone() }).await?);
    db.run_migrations().await?;

    let clock = Arc::new(SystemClock);

    let textgen: Option<Arc<dyn TextGenerator>> = if config.textgen.enabled {
        Some(Arc::new(OllamaTextGenerator::new(&config.textgen)?))
    } else {
        None
    };

    Ok(Context {
        ledger: LedgerService::new(db.clone(), clock.clone()),
        challenges: ChallengeService::new(db.clone(), clock.clone(), textgen),
        analytics: AnalyticsService::new(db, clock),
    })
}
