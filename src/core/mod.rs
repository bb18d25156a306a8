pub mod cache;
pub mod calculator;
pub mod fetcher;
pub mod orchestrator;

pub use crate::domain::model::{
    Currency, Metric, RaiseReport, RaiseResult, RatePair, RateSnapshot, SalaryInput,
};
pub use crate::domain::ports::{ConfigProvider, RateSource, SessionStore};
pub use crate::utils::error::Result;
