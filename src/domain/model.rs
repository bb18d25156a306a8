use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Try,
    Usd,
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Try => "TRY",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Try => "₺",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }
}

/// The three ways a raise is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Inflation,
    Usd,
    Eur,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Inflation, Metric::Usd, Metric::Eur];

    /// Currency the equivalent amounts are expressed in.
    pub fn unit(&self) -> Currency {
        match self {
            Metric::Inflation => Currency::Try,
            Metric::Usd => Currency::Usd,
            Metric::Eur => Currency::Eur,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Inflation => "Inflation",
            Metric::Usd => "USD",
            Metric::Eur => "EUR",
        }
    }
}

/// Current and 12-month average TRY price of one foreign currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub currency: Currency,
    pub now: f64,
    pub trailing_avg: f64,
    pub captured_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(currency: Currency, now: f64, trailing_avg: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            currency,
            now,
            trailing_avg,
            captured_at,
        }
    }

    /// Both rates must be positive finite numbers for the snapshot to count.
    pub fn is_valid(&self) -> bool {
        is_positive_finite(self.now) && is_positive_finite(self.trailing_avg)
    }

    /// Percentage move of the current rate against the trailing average.
    /// A positive drift means TRY lost value.
    pub fn drift_percent(&self) -> f64 {
        (self.now - self.trailing_avg) / self.trailing_avg * 100.0
    }
}

/// EUR and USD snapshots captured together. This is the whole cached state;
/// it is only ever replaced as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePair {
    pub eur: RateSnapshot,
    pub usd: RateSnapshot,
}

impl RatePair {
    pub fn new(eur: RateSnapshot, usd: RateSnapshot) -> Self {
        Self { eur, usd }
    }

    pub fn is_valid(&self) -> bool {
        self.eur.is_valid() && self.usd.is_valid()
    }

    pub fn snapshot(&self, currency: Currency) -> Option<&RateSnapshot> {
        match currency {
            Currency::Eur => Some(&self.eur),
            Currency::Usd => Some(&self.usd),
            Currency::Try => None,
        }
    }

    /// EUR→USD cross rate implied by the two TRY rates.
    pub fn cross_rate_now(&self) -> f64 {
        self.eur.now / self.usd.now
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.eur.captured_at
    }
}

/// Serialized form of [`RatePair`] kept in the session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub eur_now: f64,
    pub usd_now: f64,
    pub eur_last_avg: f64,
    pub usd_last_avg: f64,
    /// Capture time in milliseconds since the Unix epoch. Only the four
    /// rates decide whether a record is usable, so an unreadable timestamp
    /// is dropped rather than rejected.
    #[serde(default, deserialize_with = "lenient_millis")]
    pub timestamp: Option<i64>,
}

fn lenient_millis<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(millis_from_value))
}

fn millis_from_value(value: &Value) -> Option<i64> {
    let millis = match value {
        Value::Number(n) => match n.as_i64() {
            Some(ms) => return Some(ms),
            None => n.as_f64()?,
        },
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    millis.is_finite().then(|| millis.trunc() as i64)
}

impl From<&RatePair> for SessionRecord {
    fn from(pair: &RatePair) -> Self {
        Self {
            eur_now: pair.eur.now,
            usd_now: pair.usd.now,
            eur_last_avg: pair.eur.trailing_avg,
            usd_last_avg: pair.usd.trailing_avg,
            timestamp: Some(pair.captured_at().timestamp_millis()),
        }
    }
}

impl SessionRecord {
    /// Rebuild the pair; `None` when any rate violates the snapshot invariant.
    pub fn into_pair(self) -> Option<RatePair> {
        let captured_at = self
            .timestamp
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .unwrap_or_else(Utc::now);

        let pair = RatePair::new(
            RateSnapshot::new(Currency::Eur, self.eur_now, self.eur_last_avg, captured_at),
            RateSnapshot::new(Currency::Usd, self.usd_now, self.usd_last_avg, captured_at),
        );
        pair.is_valid().then_some(pair)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryInput {
    pub current_salary: f64,
    pub proposed_salary: f64,
    /// Annual inflation in percent; `None` disables the inflation metric.
    pub inflation_rate: Option<f64>,
}

impl SalaryInput {
    pub fn new(current_salary: f64, proposed_salary: f64, inflation_rate: Option<f64>) -> Self {
        Self {
            current_salary,
            proposed_salary,
            inflation_rate,
        }
    }

    pub fn has_valid_salaries(&self) -> bool {
        is_positive_finite(self.current_salary) && is_positive_finite(self.proposed_salary)
    }
}

/// One row of the evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaiseResult {
    pub metric: Metric,
    pub nominal_change_percent: f64,
    pub real_change_percent: f64,
    pub current_equivalent_amount: f64,
    pub proposed_equivalent_amount: f64,
    pub unit: Currency,
}

impl RaiseResult {
    /// True when the proposed equivalent buys more than the current one.
    pub fn is_gain(&self) -> bool {
        self.proposed_equivalent_amount > self.current_equivalent_amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaiseReport {
    pub nominal_change_percent: f64,
    /// Absent when no inflation rate was supplied.
    pub inflation: Option<RaiseResult>,
    pub usd: RaiseResult,
    pub eur: RaiseResult,
}

impl RaiseReport {
    pub fn get(&self, metric: Metric) -> Option<&RaiseResult> {
        match metric {
            Metric::Inflation => self.inflation.as_ref(),
            Metric::Usd => Some(&self.usd),
            Metric::Eur => Some(&self.eur),
        }
    }

    pub fn results(&self) -> impl Iterator<Item = &RaiseResult> {
        self.inflation
            .iter()
            .chain(std::iter::once(&self.usd))
            .chain(std::iter::once(&self.eur))
    }
}

pub fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(eur_now: f64, eur_avg: f64, usd_now: f64, usd_avg: f64) -> RatePair {
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        RatePair::new(
            RateSnapshot::new(Currency::Eur, eur_now, eur_avg, at),
            RateSnapshot::new(Currency::Usd, usd_now, usd_avg, at),
        )
    }

    #[test]
    fn test_snapshot_validity() {
        assert!(pair(35.0, 32.0, 32.5, 29.8).is_valid());
        assert!(!pair(0.0, 32.0, 32.5, 29.8).is_valid());
        assert!(!pair(35.0, f64::NAN, 32.5, 29.8).is_valid());
        assert!(!pair(35.0, 32.0, f64::INFINITY, 29.8).is_valid());
        assert!(!pair(35.0, 32.0, 32.5, -1.0).is_valid());
    }

    #[test]
    fn test_drift_and_cross_rate() {
        let p = pair(35.0, 28.0, 32.0, 30.0);
        assert!((p.eur.drift_percent() - 25.0).abs() < 1e-12);
        assert!((p.cross_rate_now() - 35.0 / 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_session_record_uses_camel_case_keys() {
        let record = SessionRecord::from(&pair(35.0, 32.0, 32.5, 29.8));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["eurNow"], 35.0);
        assert_eq!(json["usdNow"], 32.5);
        assert_eq!(json["eurLastAvg"], 32.0);
        assert_eq!(json["usdLastAvg"], 29.8);
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);
    }

    #[test]
    fn test_session_record_with_bad_rate_is_absent() {
        let record = SessionRecord {
            eur_now: 35.0,
            usd_now: 0.0,
            eur_last_avg: 32.0,
            usd_last_avg: 29.8,
            timestamp: None,
        };
        assert!(record.into_pair().is_none());
    }

    #[test]
    fn test_session_record_timestamp_is_read_leniently() {
        let parse = |timestamp: &str| {
            let raw = format!(
                r#"{{"eurNow": 35.0, "usdNow": 32.5, "eurLastAvg": 32.0, "usdLastAvg": 29.8, "timestamp": {}}}"#,
                timestamp
            );
            serde_json::from_str::<SessionRecord>(&raw).unwrap().timestamp
        };

        assert_eq!(parse("1729250000123"), Some(1_729_250_000_123));
        assert_eq!(parse("1729250000123.0"), Some(1_729_250_000_123));
        assert_eq!(parse(r#""1729250000123""#), Some(1_729_250_000_123));
        assert_eq!(parse(r#""yesterday""#), None);
        assert_eq!(parse("null"), None);
        assert_eq!(parse("{}"), None);
    }

    #[test]
    fn test_report_results_skip_missing_inflation() {
        let row = |metric: Metric| RaiseResult {
            metric,
            nominal_change_percent: 10.0,
            real_change_percent: 1.0,
            current_equivalent_amount: 1.0,
            proposed_equivalent_amount: 2.0,
            unit: metric.unit(),
        };
        let report = RaiseReport {
            nominal_change_percent: 10.0,
            inflation: None,
            usd: row(Metric::Usd),
            eur: row(Metric::Eur),
        };

        let metrics: Vec<Metric> = report.results().map(|r| r.metric).collect();
        assert_eq!(metrics, vec![Metric::Usd, Metric::Eur]);
        assert!(report.get(Metric::Inflation).is_none());
        assert!(report.usd.is_gain());
    }
}
