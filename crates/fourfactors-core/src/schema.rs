// Normalized team-factor record and the column names of processed files.

use serde::{Deserialize, Serialize};

/// Column order of every processed CSV and JSON snapshot.
pub const OUTPUT_COLUMNS: [&str; 14] = [
    "team_name",
    "team",
    "ortg",
    "drtg",
    "netrtg",
    "off_efg",
    "off_orb",
    "off_tov",
    "off_ftar",
    "def_efg",
    "def_orb",
    "def_tov",
    "def_ftar",
    "source",
];

/// Columns a processed file must carry (matched case-insensitively) for the
/// loader to accept it.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "team", "ortg", "drtg", "netrtg", "off_efg", "off_orb", "off_tov", "off_ftar", "def_efg",
    "def_orb", "def_tov", "def_ftar",
];

/// One team's Four Factors line for one snapshot date.
///
/// Percentage-like fields are fractions in `[0, 1]`; FTA rates are ratios in
/// `[0, 1.5]`. Any numeric field may be missing when the source cell was
/// empty or unparsable. `team_name` and `source` are not required columns
/// and read as empty when a processed file omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamFactorRecord {
    #[serde(default)]
    pub team_name: String,
    pub team: String,
    pub ortg: Option<f64>,
    pub drtg: Option<f64>,
    pub netrtg: Option<f64>,
    pub off_efg: Option<f64>,
    pub off_orb: Option<f64>,
    pub off_tov: Option<f64>,
    pub off_ftar: Option<f64>,
    pub def_efg: Option<f64>,
    pub def_orb: Option<f64>,
    pub def_tov: Option<f64>,
    pub def_ftar: Option<f64>,
    #[serde(default)]
    pub source: String,
}

/// Net rating from offensive and defensive rating, when both are known.
pub fn net_rating(ortg: Option<f64>, drtg: Option<f64>) -> Option<f64> {
    Some(ortg? - drtg?)
}
