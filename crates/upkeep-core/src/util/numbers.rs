//! Numeric field validation.

use crate::{Error, Result};

/// Parse a duration in hours, rejecting anything that is not a finite,
/// non-negative number.
///
/// # Examples
///
/// ```
/// use upkeep_core::util::numbers::parse_hours;
///
/// assert_eq!(parse_hours("duracion_h", "2.5").unwrap(), 2.5);
/// assert!(parse_hours("duracion_h", "-1").is_err());
/// assert!(parse_hours("duracion_h", "n/a").is_err());
/// ```
pub fn parse_hours(field: &str, input: &str) -> Result<f64> {
    let s = input.trim();
    if s.is_empty() {
        return Err(Error::validation_field(field, "value is required"));
    }
    let value: f64 = s
        .parse()
        .map_err(|_| Error::validation_field(field, format!("'{s}' is not a number")))?;
    check_non_negative(field, value)
}

/// Parse an optional non-negative quantity (hours or money); empty is `None`.
pub fn parse_optional_amount(field: &str, input: &str) -> Result<Option<f64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_hours(field, input).map(Some)
}

/// Check that an already-typed quantity is finite and non-negative.
pub fn check_non_negative(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::validation_field(field, "value must be finite"));
    }
    if value < 0.0 {
        return Err(Error::validation_field(
            field,
            format!("value must not be negative (got {value})"),
        ));
    }
    Ok(value)
}

/// Format a quantity in its shortest round-trip form.
pub fn format_amount(value: f64) -> String {
    value.to_string()
}

/// Format an optional quantity; `None` becomes an empty string.
pub fn format_optional_amount(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_default()
}
