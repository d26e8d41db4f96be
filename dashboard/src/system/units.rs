//! Size literal conversion (`4.7 GB`, `512MiB`, ...) into GiB.

use thiserror::Error;
use tracing::warn;

/// Decimal gigabyte expressed in binary gibibytes.
const GB_TO_GIB: f64 = 0.931323;

// Order matters: binary suffixes are tried before their decimal neighbours.
const UNITS: [(&str, f64); 4] = [
    ("GIB", 1.0),
    ("GB", GB_TO_GIB),
    ("MIB", 1.0 / 1024.0),
    ("MB", GB_TO_GIB / 1024.0),
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionWarning {
    #[error("unknown size unit in '{0}'")]
    UnknownUnit(String),

    #[error("could not parse size value from '{literal}' (extracted value: '{value}')")]
    InvalidNumber { literal: String, value: String },

    #[error("size value in '{0}' is not a finite number")]
    NonFinite(String),

    #[error("size value in '{0}' is negative")]
    Negative(String),
}

pub fn to_gib(literal: &str) -> Result<f64, ConversionWarning> {
    let normalized = literal.trim().to_uppercase();

    let (value, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, multiplier)| {
            normalized
                .strip_suffix(suffix)
                .map(|value| (value.trim(), *multiplier))
        })
        .ok_or_else(|| ConversionWarning::UnknownUnit(normalized.clone()))?;

    let parsed: f64 = value
        .parse()
        .map_err(|_| ConversionWarning::InvalidNumber {
            literal: normalized.clone(),
            value: value.to_string(),
        })?;

    // f64::from_str accepts "NAN" and "INF"
    if !parsed.is_finite() {
        return Err(ConversionWarning::NonFinite(normalized));
    }
    if parsed < 0.0 {
        return Err(ConversionWarning::Negative(normalized));
    }

    Ok(parsed * multiplier)
}

/// Best-effort conversion: anything unreadable counts as zero.
pub fn convert(literal: &str) -> f64 {
    convert_checked(literal).0
}

/// Like `convert`, but also hands back the warning (already logged) so
/// callers can count zeroed sizes.
pub fn convert_checked(literal: &str) -> (f64, Option<ConversionWarning>) {
    match to_gib(literal) {
        Ok(gib) => (gib, None),
        Err(warning) => {
            warn!(%literal, %warning, "size ignored in capacity total");
            (0.0, Some(warning))
        }
    }
}
