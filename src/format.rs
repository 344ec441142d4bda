//! # Value Formatting
//!
//! Turns resolved field values into display strings. The same function is
//! used for measuring and for printing, so it must stay pure: a cell's
//! height is computed from exactly the bytes that are later drawn.

use std::fmt::Write;

use serde::Deserialize;

use crate::model::FieldValue;

/// Default rendering for date values (`1/2/2024, 3:04:05 PM`).
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Per-type format specification for a column, group key or summary cell.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formats {
    #[serde(default)]
    pub number: Option<NumberFormat>,
    /// A `chrono` strftime pattern for date values.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct NumberFormat {
    /// Digits after the decimal point.
    #[serde(default)]
    pub fixed: Option<usize>,
    /// Significant digits. Takes precedence over `fixed`.
    #[serde(default)]
    pub precision: Option<usize>,
}

impl Formats {
    pub fn fixed(digits: usize) -> Self {
        Self {
            number: Some(NumberFormat {
                fixed: Some(digits),
                precision: None,
            }),
            date: None,
        }
    }

    pub fn precision(digits: usize) -> Self {
        Self {
            number: Some(NumberFormat {
                fixed: None,
                precision: Some(digits),
            }),
            date: None,
        }
    }

    pub fn date(pattern: &str) -> Self {
        Self {
            number: None,
            date: Some(pattern.to_string()),
        }
    }
}

/// Format a value for display. Absent values and empty strings render as
/// `empty`.
pub fn format_value(value: &FieldValue, formats: &Formats, empty: &str) -> String {
    match value {
        FieldValue::Number(n) => format_number(*n, formats.number.as_ref()),
        FieldValue::Date(d) => {
            let pattern = formats.date.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
            let mut out = String::new();
            // chrono reports a bad pattern as a fmt error instead of a value.
            match write!(out, "{}", d.format(pattern)) {
                Ok(()) => out,
                Err(_) => d.format(DEFAULT_DATE_FORMAT).to_string(),
            }
        }
        FieldValue::Text(s) if s.is_empty() => empty.to_string(),
        FieldValue::Text(s) => s.clone(),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Null => empty.to_string(),
        FieldValue::List(items) => items
            .iter()
            .map(|item| format_value(item, formats, empty))
            .collect::<Vec<_>>()
            .join(","),
        FieldValue::Map(_) => "[object]".to_string(),
    }
}

fn format_number(n: f64, format: Option<&NumberFormat>) -> String {
    if !n.is_finite() {
        return if n.is_nan() {
            "NaN".to_string()
        } else if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }

    match format {
        Some(NumberFormat {
            precision: Some(p), ..
        }) if *p > 0 => to_precision(n, *p),
        Some(NumberFormat { fixed: Some(f), .. }) => format!("{:.*}", *f, n),
        _ => format!("{}", n),
    }
}

/// Round to `digits` significant digits, switching to exponent notation
/// when the rounded exponent falls outside the representable fixed range.
fn to_precision(n: f64, digits: usize) -> String {
    // Round first: 9.99 at two digits is 1.0e1, not 9.9e0.
    let scientific = format!("{:.*e}", digits - 1, n);
    let Some((mantissa, exp)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exp.parse().unwrap_or(0);

    if exponent < -6 || exponent >= digits as i32 {
        // Rust writes `1.5e3`, display as `1.5e+3`.
        return if exponent < 0 {
            format!("{}e{}", mantissa, exponent)
        } else {
            format!("{}e+{}", mantissa, exponent)
        };
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    format!("{:.*}", decimals, n)
}
