pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{DatabaseSettings, ServiceConfig, TextGenSettings};
pub use error::{Error, Result};
pub use types::*;
