use crate::utils::error::{RaiseError, Result};
use std::fmt::Display;
use url::Url;

/// Inflation is a percentage change; anything at or below -100 % would mean
/// prices vanished.
const MIN_INFLATION_PERCENT: f64 = -100.0;
const MAX_INFLATION_PERCENT: f64 = 10_000.0;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> RaiseError {
    RaiseError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Provider base URL: http or https, parseable, without query or fragment
/// since request paths are appended to it.
pub fn validate_provider_url(field: &str, raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(invalid(field, raw, "URL cannot be empty"));
    }

    let url = Url::parse(raw).map_err(|e| invalid(field, raw, format!("Invalid URL format: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            raw,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(field, raw, "URL must not carry a query or fragment"));
    }
    Ok(())
}

pub fn validate_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_min(field: &str, value: u64, min: u64) -> Result<()> {
    if value < min {
        return Err(invalid(field, value, format!("Value must be at least {}", min)));
    }
    Ok(())
}

/// Session keys name a slot in the session file, so they must have visible
/// characters.
pub fn validate_session_key(field: &str, key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(invalid(field, key, "Key cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_inflation_percent(field: &str, value: f64) -> Result<()> {
    // written so that NaN is rejected too
    if !(value > MIN_INFLATION_PERCENT && value <= MAX_INFLATION_PERCENT) {
        return Err(invalid(
            field,
            value,
            format!(
                "Inflation must be above {} % and at most {} %",
                MIN_INFLATION_PERCENT, MAX_INFLATION_PERCENT
            ),
        ));
    }
    Ok(())
}
