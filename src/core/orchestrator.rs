use crate::core::cache::RateCache;
use crate::core::calculator;
use crate::domain::model::{RaiseReport, RatePair, SalaryInput};
use crate::domain::ports::{RateSource, SessionStore};
use crate::utils::error::{FetchError, RaiseError, Result};
use std::sync::RwLock;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorState {
    Idle,
    Resolving,
    Ready(RatePair),
    Failed(FetchError),
}

/// Sequences cache lookup, fetching and calculation.
///
/// Overlapping `ensure_rates` calls are serialized: while one call is
/// resolving, the others wait and then find the freshly cached pair.
pub struct Orchestrator<F: RateSource, S: SessionStore> {
    fetcher: F,
    cache: RateCache<S>,
    state: RwLock<OrchestratorState>,
    in_flight: Mutex<()>,
}

impl<F: RateSource, S: SessionStore> Orchestrator<F, S> {
    pub fn new(fetcher: F, cache: RateCache<S>) -> Self {
        Self {
            fetcher,
            cache,
            state: RwLock::new(OrchestratorState::Idle),
            in_flight: Mutex::new(()),
        }
    }

    pub fn state(&self) -> OrchestratorState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn cache(&self) -> &RateCache<S> {
        &self.cache
    }

    fn set_state(&self, state: OrchestratorState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Resolve rates from the session cache, fetching only on a miss.
    pub async fn ensure_rates(&self) -> std::result::Result<RatePair, FetchError> {
        let _guard = self.in_flight.lock().await;

        if let Some(pair) = self.cache.get() {
            tracing::info!(
                "Using session rates captured at {}",
                pair.captured_at().to_rfc3339()
            );
            self.set_state(OrchestratorState::Ready(pair.clone()));
            return Ok(pair);
        }

        self.set_state(OrchestratorState::Resolving);
        tracing::info!("No session rates, fetching from provider");

        match self.fetcher.fetch_rates().await {
            Ok(pair) => {
                // a failed write only costs a refetch next time
                if let Err(e) = self.cache.put(&pair) {
                    tracing::warn!("Session storage not available: {}", e);
                }
                tracing::info!(
                    "Rates ready: EUR/TRY {:.4} (avg {:.4}), USD/TRY {:.4} (avg {:.4})",
                    pair.eur.now,
                    pair.eur.trailing_avg,
                    pair.usd.now,
                    pair.usd.trailing_avg
                );
                self.set_state(OrchestratorState::Ready(pair.clone()));
                Ok(pair)
            }
            Err(e) => {
                tracing::error!("Rate fetch failed: {}", e);
                self.set_state(OrchestratorState::Failed(e.clone()));
                Err(e)
            }
        }
    }

    /// Drop the cached pair; the next `ensure_rates` goes to the network.
    pub async fn invalidate(&self) -> Result<()> {
        let _guard = self.in_flight.lock().await;
        self.cache.clear()?;
        self.set_state(OrchestratorState::Idle);
        Ok(())
    }

    /// Evaluate a raise against the resolved rates. Leaves the state as is.
    pub fn calculate(&self, input: &SalaryInput) -> Result<RaiseReport> {
        let rates = match self.state() {
            OrchestratorState::Ready(pair) => pair,
            _ => return Err(RaiseError::RatesNotReady),
        };

        calculator::calculate(input, Some(&rates)).map_err(|e| {
            tracing::debug!("Calculation rejected: {}", e);
            RaiseError::from(e)
        })
    }
}
