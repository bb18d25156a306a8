//! Rate acquisition from a Frankfurter-compatible FX provider.
//!
//! Two sequential GET requests are made: the latest EUR→{TRY,USD} rates and the
//! daily series for the trailing twelve months. USD→TRY is always derived as a
//! cross rate through EUR.

use crate::domain::model::{is_positive_finite, Currency, RatePair, RateSnapshot};
use crate::domain::ports::{ConfigProvider, RateSource};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use chrono::{Datelike, Months, NaiveDate, SubsecRound, Utc};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.frankfurter.app";

const BASE_CURRENCY: &str = "EUR";
const TARGET_CURRENCIES: &str = "TRY,USD";

pub struct RateFetcher {
    client: Client,
    api_base: String,
}

impl RateFetcher {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: normalize_base(api_base.into()),
        }
    }

    pub fn with_timeout(api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: normalize_base(api_base.into()),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::with_timeout(config.api_base(), config.request_timeout())
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetch and derive both snapshots as of `today`.
    pub async fn fetch_rates_on(&self, today: NaiveDate) -> std::result::Result<RatePair, FetchError> {
        let (eur_try_latest, eur_usd_latest) = self.fetch_latest().await?;
        let usd_try_latest = eur_try_latest / eur_usd_latest;

        let (start, end) = trailing_year(today);
        let history = self.fetch_history(start, end).await?;

        let samples = DailySamples::collect(&history);
        tracing::debug!(
            "Collected {} daily samples ({} skipped) between {} and {}",
            samples.len(),
            samples.skipped,
            start,
            end
        );
        if samples.skipped > 0 {
            tracing::warn!("Skipped {} days without both TRY and USD rates", samples.skipped);
        }

        let eur_avg = mean(&samples.eur_try).ok_or(FetchError::InsufficientHistory)?;
        let usd_avg = mean(&samples.usd_try).ok_or(FetchError::InsufficientHistory)?;

        // millisecond precision, matching what the session record keeps
        let captured_at = Utc::now().trunc_subsecs(3);
        Ok(RatePair::new(
            RateSnapshot::new(Currency::Eur, eur_try_latest, eur_avg, captured_at),
            RateSnapshot::new(Currency::Usd, usd_try_latest, usd_avg, captured_at),
        ))
    }

    async fn fetch_latest(&self) -> std::result::Result<(f64, f64), FetchError> {
        let url = format!("{}/latest", self.api_base);
        tracing::debug!("Requesting latest rates from: {}", url);

        let unavailable = |reason: String| FetchError::LatestUnavailable { reason };

        let response = self
            .client
            .get(&url)
            .query(&[("from", BASE_CURRENCY), ("to", TARGET_CURRENCIES)])
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        tracing::debug!("Latest rates response status: {}", response.status());
        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| unavailable(format!("invalid JSON body: {}", e)))?;

        let rates = &body["rates"];
        let eur_try = positive_rate(&rates["TRY"])
            .ok_or_else(|| unavailable("missing or non-numeric TRY rate".to_string()))?;
        let eur_usd = positive_rate(&rates["USD"])
            .ok_or_else(|| unavailable("missing or non-numeric USD rate".to_string()))?;

        Ok((eur_try, eur_usd))
    }

    async fn fetch_history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> std::result::Result<Value, FetchError> {
        let url = format!("{}/{}..{}", self.api_base, start, end);
        tracing::debug!("Requesting rate history from: {}", url);

        let unavailable = |reason: String| FetchError::HistoryUnavailable { reason };

        let response = self
            .client
            .get(&url)
            .query(&[("from", BASE_CURRENCY), ("to", TARGET_CURRENCIES)])
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        tracing::debug!("Rate history response status: {}", response.status());
        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        let mut body: Value = response
            .json()
            .await
            .map_err(|e| unavailable(format!("invalid JSON body: {}", e)))?;

        Ok(body.get_mut("rates").map(Value::take).unwrap_or(Value::Null))
    }
}

#[async_trait]
impl RateSource for RateFetcher {
    async fn fetch_rates(&self) -> std::result::Result<RatePair, FetchError> {
        self.fetch_rates_on(Utc::now().date_naive()).await
    }
}

/// Per-day TRY prices extracted from a history response.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DailySamples {
    pub eur_try: Vec<f64>,
    pub usd_try: Vec<f64>,
    pub skipped: usize,
}

impl DailySamples {
    /// Walk the `rates` object of a history response. Days lacking a numeric
    /// TRY or USD value are skipped; no re-sampling or gap filling happens.
    pub fn collect(rates: &Value) -> Self {
        let mut samples = Self::default();
        let Some(days) = rates.as_object() else {
            return samples;
        };

        for (day, values) in days {
            match (positive_rate(&values["TRY"]), positive_rate(&values["USD"])) {
                (Some(eur_try), Some(eur_usd)) => {
                    samples.eur_try.push(eur_try);
                    samples.usd_try.push(eur_try / eur_usd);
                }
                _ => {
                    tracing::trace!("Skipping {} without usable rates", day);
                    samples.skipped += 1;
                }
            }
        }

        samples
    }

    pub fn len(&self) -> usize {
        self.eur_try.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eur_try.is_empty()
    }
}

/// `(today - 1 year, today)`. Feb 29 has no counterpart in the previous
/// year, so the window rolls forward to Mar 1.
pub fn trailing_year(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = if today.month() == 2 && today.day() == 29 {
        NaiveDate::from_ymd_opt(today.year() - 1, 3, 1)
    } else {
        today.checked_sub_months(Months::new(12))
    };
    (start.unwrap_or(NaiveDate::MIN), today)
}

/// Unweighted arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn positive_rate(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| is_positive_finite(*v))
}

fn normalize_base(api_base: String) -> String {
    api_base.trim_end_matches('/').to_string()
}
