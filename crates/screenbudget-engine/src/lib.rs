pub mod adaptive;
pub mod analytics;
pub mod bank;
pub mod generator;
pub mod ledger;
pub mod textgen;

pub use analytics::AnalyticsService;
pub use generator::ChallengeService;
pub use ledger::LedgerService;
pub use textgen::{OllamaTextGenerator, TextGenerator};
