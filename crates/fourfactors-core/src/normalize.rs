// Per-cell unit normalization for ratings, percentages and FTA rates.
//
// Source exports write the same stat as "27.3", "27.3%" or "0.273". The
// fraction threshold decides which form a value is in.

use serde::Deserialize;
use std::fmt;

/// Upper clip bound for percentage-like fields (eFG%, ORB%, TOV%).
pub const PCT_UPPER: f64 = 1.0;

/// Upper clip bound for rate-like fields (FTAr).
pub const RATIO_UPPER: f64 = 1.5;

/// Default discriminator between "already a fraction" and "raw percentage".
pub const DEFAULT_FRACTION_THRESHOLD: f64 = 1.5;

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

/// A raw input cell: missing, already numeric, or text still to be parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

impl<'a> From<Option<&'a str>> for Cell<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Cell::Missing, Cell::Text)
    }
}

/// Why a cell could not be turned into a usable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellIssue {
    /// Non-empty text that is not a finite number.
    Unparsable,
    /// Parsed fine but fell outside the field's valid range before clipping.
    OutOfRange,
}

impl fmt::Display for CellIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellIssue::Unparsable => write!(f, "not a number"),
            CellIssue::OutOfRange => write!(f, "out of range"),
        }
    }
}

/// Parse a cell into a finite number. Text is trimmed and `%` signs are
/// dropped. Empty text is missing (`Ok(None)`), garbage is an issue.
pub fn parse_cell(cell: Cell<'_>) -> Result<Option<f64>, CellIssue> {
    let value = match cell {
        Cell::Missing => return Ok(None),
        Cell::Number(v) => v,
        Cell::Text(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != '%').collect();
            if cleaned.is_empty() {
                return Ok(None);
            }
            cleaned.parse::<f64>().map_err(|_| CellIssue::Unparsable)?
        }
    };
    if value.is_finite() {
        Ok(Some(value))
    } else if matches!(cell, Cell::Number(_)) && value.is_nan() {
        // NaN coming from a numeric source means "no data", not garbage.
        Ok(None)
    } else {
        Err(CellIssue::Unparsable)
    }
}

// ---------------------------------------------------------------------------
// Policy and configuration
// ---------------------------------------------------------------------------

/// What to do with unparsable or out-of-range cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    /// Unparsable cells become missing; out-of-range values are clipped.
    #[default]
    Clamp,
    /// Any unparsable cell or out-of-range value is an error.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeConfig {
    pub fraction_threshold: f64,
    pub policy: CoercionPolicy,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            fraction_threshold: DEFAULT_FRACTION_THRESHOLD,
            policy: CoercionPolicy::default(),
        }
    }
}

/// How a canonical stat is scaled and bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// Points per 100 possessions; parsed but never scaled or clipped.
    Rating,
    /// Percentage stored as a fraction in [0, 1].
    Percentage,
    /// Rate stored as a ratio in [0, 1.5].
    Ratio,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Applies unit conversion, bounds and the coercion policy to single cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    config: NormalizeConfig,
}

impl Normalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    /// Percentage to fraction, without clipping. Values in
    /// `[0, fraction_threshold]` are taken as fractions already.
    pub fn percentage(&self, cell: Cell<'_>) -> Option<f64> {
        self.parse_lenient(cell).map(|v| self.scale_percentage(v))
    }

    /// FTA rate to ratio, without clipping. Only values above the threshold
    /// are divided by 100.
    pub fn ratio(&self, cell: Cell<'_>) -> Option<f64> {
        self.parse_lenient(cell).map(|v| self.scale_ratio(v))
    }

    /// Full treatment for a stat of the given kind: parse, scale, bound.
    ///
    /// Under [`CoercionPolicy::Clamp`] this never fails. Under
    /// [`CoercionPolicy::Reject`] garbage text and out-of-range values are
    /// reported instead of being absorbed.
    pub fn normalize(&self, kind: StatKind, cell: Cell<'_>) -> Result<Option<f64>, CellIssue> {
        let parsed = match parse_cell(cell) {
            Ok(v) => v,
            Err(issue) => return self.absorb(issue),
        };
        let Some(raw) = parsed else {
            return Ok(None);
        };

        let (scaled, upper) = match kind {
            StatKind::Rating => return Ok(Some(raw)),
            StatKind::Percentage => (self.scale_percentage(raw), PCT_UPPER),
            StatKind::Ratio => (self.scale_ratio(raw), RATIO_UPPER),
        };

        if (0.0..=upper).contains(&scaled) {
            Ok(Some(scaled))
        } else {
            match self.config.policy {
                CoercionPolicy::Clamp => Ok(Some(scaled.clamp(0.0, upper))),
                CoercionPolicy::Reject => Err(CellIssue::OutOfRange),
            }
        }
    }

    fn absorb(&self, issue: CellIssue) -> Result<Option<f64>, CellIssue> {
        match self.config.policy {
            CoercionPolicy::Clamp => Ok(None),
            CoercionPolicy::Reject => Err(issue),
        }
    }

    fn parse_lenient(&self, cell: Cell<'_>) -> Option<f64> {
        parse_cell(cell).ok().flatten()
    }

    fn scale_percentage(&self, v: f64) -> f64 {
        if (0.0..=self.config.fraction_threshold).contains(&v) {
            v
        } else {
            v / 100.0
        }
    }

    fn scale_ratio(&self, v: f64) -> f64 {
        if v > self.config.fraction_threshold {
            v / 100.0
        } else {
            v
        }
    }
}

/// Percentage normalizer with the default threshold.
pub fn pct_to_fraction(cell: Cell<'_>) -> Option<f64> {
    Normalizer::default().percentage(cell)
}

/// FTA-rate normalizer with the default threshold.
pub fn rate_to_ratio(cell: Cell<'_>) -> Option<f64> {
    Normalizer::default().ratio(cell)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
