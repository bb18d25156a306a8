pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::RaiseConfig;

pub use adapters::{FileSessionStore, MemorySessionStore};
pub use core::{
    cache::RateCache,
    fetcher::RateFetcher,
    orchestrator::{Orchestrator, OrchestratorState},
};
pub use domain::model::{Currency, Metric, RaiseReport, RaiseResult, RatePair, RateSnapshot, SalaryInput};
pub use utils::error::{CalculationError, FetchError, RaiseError, Result};
