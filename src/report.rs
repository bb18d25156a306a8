//! Text rendering of rates and raise reports for the terminal.
//!
//! Numbers use the tr-TR convention: `.` groups thousands and `,` separates
//! decimals. An absent or non-finite value renders as `–`.

use crate::domain::model::{Metric, RaiseReport, RaiseResult, RatePair, RateSnapshot, SalaryInput};

pub const ABSENT: &str = "–";

/// Format with a fixed number of decimals in tr-TR style.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if let Some(frac_part) = frac_part {
        grouped.push(',');
        grouped.push_str(frac_part);
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return ABSENT.to_string();
    }
    format!("{} %", format_grouped(value, 1))
}

pub fn format_amount(value: f64) -> Option<String> {
    value.is_finite().then(|| format_grouped(value, 2))
}

pub fn format_rate(value: f64) -> String {
    if !value.is_finite() {
        return ABSENT.to_string();
    }
    format!("{:.4}", value)
}

/// "previous → proposed" with unit symbols, or `–` if either is unusable.
pub fn format_amount_change(previous: f64, proposed: f64, symbol: &str) -> String {
    match (format_amount(previous), format_amount(proposed)) {
        (Some(previous), Some(proposed)) => {
            format!("{} {} → {} {}", previous, symbol, proposed, symbol)
        }
        _ => ABSENT.to_string(),
    }
}

/// How the lira moved against a currency over the averaging window.
pub fn drift_text(drift_percent: f64) -> String {
    let magnitude = format_grouped(drift_percent.abs(), 2);
    if drift_percent >= 0.0 {
        format!("↓ TRY lost {} % of its value over the last 12 months", magnitude)
    } else {
        format!("↑ TRY gained {} % in value over the last 12 months", magnitude)
    }
}

pub fn render_rate_card(snapshot: &RateSnapshot) -> String {
    format!(
        "{}/TRY  now {}  12-month avg {}  {}",
        snapshot.currency.code(),
        format_rate(snapshot.now),
        format_rate(snapshot.trailing_avg),
        drift_text(snapshot.drift_percent())
    )
}

pub fn render_rates(rates: &RatePair) -> String {
    [
        render_rate_card(&rates.eur),
        render_rate_card(&rates.usd),
        format!("EUR/USD  {}", format_rate(rates.cross_rate_now())),
    ]
    .join("\n")
}

fn purchasing_power_label(metric: Metric) -> &'static str {
    match metric {
        Metric::Inflation => "Purchasing power against inflation",
        Metric::Usd => "Purchasing power against the dollar",
        Metric::Eur => "Purchasing power against the euro",
    }
}

/// Arrow badge plus the sentence explaining the real change.
pub fn describe_real_change(metric: Metric, real_percent: f64) -> (String, String) {
    let is_up = real_percent >= 0.0;
    let magnitude = format_grouped(real_percent.abs(), 1);
    let arrow = if is_up { "↑" } else { "↓" };
    let more_or_less = if is_up { "higher" } else { "lower" };

    (
        format!("{} %{}", arrow, magnitude),
        format!(
            "{} is {} % {}",
            purchasing_power_label(metric),
            magnitude,
            more_or_less
        ),
    )
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: &'static str,
    pub nominal: String,
    pub real: String,
    pub amounts: String,
    pub badge: String,
    pub helper: String,
}

impl MetricRow {
    fn from_result(result: &RaiseResult) -> Self {
        let (badge, helper) = describe_real_change(result.metric, result.real_change_percent);
        Self {
            label: result.metric.label(),
            nominal: format_percent(result.nominal_change_percent),
            real: format_percent(result.real_change_percent),
            amounts: format_amount_change(
                result.current_equivalent_amount,
                result.proposed_equivalent_amount,
                result.unit.symbol(),
            ),
            badge,
            helper,
        }
    }

    /// Inflation row when no inflation rate was given: nominal and TRY
    /// amounts only.
    fn without_inflation(report: &RaiseReport, input: &SalaryInput) -> Self {
        Self {
            label: Metric::Inflation.label(),
            nominal: format_percent(report.nominal_change_percent),
            real: ABSENT.to_string(),
            amounts: format_amount_change(
                input.current_salary,
                input.proposed_salary,
                Metric::Inflation.unit().symbol(),
            ),
            badge: ABSENT.to_string(),
            helper: "Inflation was not given, so no real change was computed".to_string(),
        }
    }
}

pub fn metric_rows(report: &RaiseReport, input: &SalaryInput) -> Vec<MetricRow> {
    Metric::ALL
        .iter()
        .map(|metric| match report.get(*metric) {
            Some(result) => MetricRow::from_result(result),
            None => MetricRow::without_inflation(report, input),
        })
        .collect()
}

pub fn render_report(report: &RaiseReport, input: &SalaryInput) -> String {
    let mut lines = vec![format!(
        "{:<10} {:>10} {:>10}  {:<40} {}",
        "Metric", "Nominal", "Real", "Amounts", "Change"
    )];
    for row in metric_rows(report, input) {
        lines.push(format!(
            "{:<10} {:>10} {:>10}  {:<40} {}  {}",
            row.label, row.nominal, row.real, row.amounts, row.badge, row.helper
        ));
    }
    lines.join("\n")
}
