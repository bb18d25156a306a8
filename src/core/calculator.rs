//! Nominal and real raise arithmetic.
//!
//! Everything here is pure: salaries and rates in, percentages and equivalent
//! amounts out.

use crate::domain::model::{
    is_positive_finite, Metric, RaiseReport, RaiseResult, RatePair, RateSnapshot, SalaryInput,
};
use crate::utils::error::CalculationError;

/// `(proposed - current) / current * 100`
pub fn compute_nominal(current: f64, proposed: f64) -> f64 {
    (proposed - current) / current * 100.0
}

/// Inflation-adjusted raise by plain subtraction, not compounding.
pub fn compute_real_against_inflation(nominal_percent: f64, inflation_percent: f64) -> f64 {
    nominal_percent - inflation_percent
}

/// Salary pair converted into a foreign currency: the current salary at the
/// trailing average rate, the proposed one at today's rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyEquivalents {
    pub old_equivalent: f64,
    pub new_equivalent: f64,
}

impl CurrencyEquivalents {
    pub fn new(current: f64, proposed: f64, snapshot: &RateSnapshot) -> Self {
        Self {
            old_equivalent: current / snapshot.trailing_avg,
            new_equivalent: proposed / snapshot.now,
        }
    }

    pub fn real_change_percent(&self) -> f64 {
        (self.new_equivalent - self.old_equivalent) / self.old_equivalent * 100.0
    }
}

/// Evaluate all metrics, or none.
///
/// Salaries are checked before any rate is looked at. Without an inflation
/// rate the inflation metric is left out of the report.
pub fn calculate(
    input: &SalaryInput,
    rates: Option<&RatePair>,
) -> Result<RaiseReport, CalculationError> {
    if !input.has_valid_salaries() {
        return Err(CalculationError::InvalidSalary);
    }

    let rates = rates
        .filter(|r| r.is_valid())
        .ok_or(CalculationError::MissingRates)?;

    let nominal = compute_nominal(input.current_salary, input.proposed_salary);

    let inflation = evaluate(Metric::Inflation, input, rates, nominal);
    let usd = evaluate(Metric::Usd, input, rates, nominal).ok_or(CalculationError::MissingRates)?;
    let eur = evaluate(Metric::Eur, input, rates, nominal).ok_or(CalculationError::MissingRates)?;

    Ok(RaiseReport {
        nominal_change_percent: nominal,
        inflation,
        usd,
        eur,
    })
}

fn evaluate(
    metric: Metric,
    input: &SalaryInput,
    rates: &RatePair,
    nominal: f64,
) -> Option<RaiseResult> {
    let (real, current_amount, proposed_amount) = match metric {
        Metric::Inflation => {
            let inflation = input.inflation_rate.filter(|v| v.is_finite())?;
            (
                compute_real_against_inflation(nominal, inflation),
                input.current_salary,
                input.proposed_salary,
            )
        }
        Metric::Usd | Metric::Eur => {
            let snapshot = rates.snapshot(metric.unit())?;
            let equivalents =
                CurrencyEquivalents::new(input.current_salary, input.proposed_salary, snapshot);
            (
                equivalents.real_change_percent(),
                equivalents.old_equivalent,
                equivalents.new_equivalent,
            )
        }
    };

    Some(RaiseResult {
        metric,
        nominal_change_percent: nominal,
        real_change_percent: real,
        current_equivalent_amount: current_amount,
        proposed_equivalent_amount: proposed_amount,
        unit: metric.unit(),
    })
}

/// Salary text with thousand separators: every non-digit is dropped.
pub fn parse_salary(text: &str) -> Result<f64, CalculationError> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(CalculationError::InvalidSalary);
    }
    digits
        .parse::<f64>()
        .ok()
        .filter(|v| is_positive_finite(*v))
        .ok_or(CalculationError::InvalidSalary)
}

/// Inflation percentage; `None` for blank or unparseable text.
pub fn parse_inflation(text: &str) -> Option<f64> {
    let trimmed = text.trim().trim_start_matches('%').trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
