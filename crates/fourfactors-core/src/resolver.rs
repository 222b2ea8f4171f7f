// Column alias resolution: maps each canonical stat to a column of the raw
// export, whatever the source happened to call it.

use std::fmt;

use tracing::debug;

/// The canonical inputs the importer needs from a raw export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Team,
    Ortg,
    Drtg,
    NetRtg,
    OffEfg,
    OffOrb,
    OffFtar,
    OffTov,
    DefEfg,
    DefOrb,
    DefFtar,
    DefTov,
}

impl CanonicalField {
    /// Name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            CanonicalField::Team => "team",
            CanonicalField::Ortg => "ORTG",
            CanonicalField::Drtg => "DRTG",
            CanonicalField::NetRtg => "NetRTG",
            CanonicalField::OffEfg => "Off_eFG",
            CanonicalField::OffOrb => "Off_ORB",
            CanonicalField::OffFtar => "Off_FTAr",
            CanonicalField::OffTov => "Off_TOV",
            CanonicalField::DefEfg => "Def_eFG",
            CanonicalField::DefOrb => "Def_ORB",
            CanonicalField::DefFtar => "Def_FTAr",
            CanonicalField::DefTov => "Def_TOV",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How one canonical field is found and treated.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: CanonicalField,
    /// Accepted source column names, highest priority first.
    pub aliases: &'static [&'static str],
    pub required: bool,
}

/// Alias table for Four Factors exports (CraftedNBA and look-alikes).
pub const FOUR_FACTOR_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        field: CanonicalField::Team,
        aliases: &["team", "Team", "TEAM", "squad", "franchise"],
        required: true,
    },
    FieldSpec {
        field: CanonicalField::Ortg,
        aliases: &["ORTG", "OffRtg", "ORtg", "Offensive Rating"],
        required: true,
    },
    FieldSpec {
        field: CanonicalField::Drtg,
        aliases: &["DRTG", "DefRtg", "DRtg", "Defensive Rating"],
        required: true,
    },
    FieldSpec {
        field: CanonicalField::NetRtg,
        aliases: &["NetRTG", "Net Rtg", "Net Rating", "Net"],
        required: false,
    },
    FieldSpec {
        field: CanonicalField::OffEfg,
        aliases: &["EFG%", "eFG%", "Off eFG%", "EFG_off", "EFG_offense", "Offense eFG%"],
        required: true,
    },
    FieldSpec {
        field: CanonicalField::OffOrb,
        aliases: &["ORB%", "Off ORB%", "ORB_off", "ORB% (Off)"],
        required: true,
    },
    FieldSpec {
        field: CanonicalField::OffFtar,
        aliases: &["FTAr", "FTA Rate", "FT Rate (Off)"],
        required: true,
    },
    FieldSpec {
        field: CanonicalField::OffTov,
        aliases: &["TO%", "TOV%", "TOV_off", "TO% (Off)", "Turnover%"],
        required: true,
    },
    FieldSpec {
        field: CanonicalField::DefEfg,
        aliases: &["EFG% (Def)", "Def eFG%", "eFG%_def", "eFG% Allowed"],
        required: true,
    },
    FieldSpec {
        field: CanonicalField::DefOrb,
        aliases: &["ORB% (Def)", "Def ORB%", "Opp ORB%", "ORB%_def"],
        required: true,
    },
    FieldSpec {
        field: CanonicalField::DefFtar,
        aliases: &["FTAr (Def)", "Def FTAr", "Opp FTAr", "FT Rate (Def)"],
        required: true,
    },
    FieldSpec {
        field: CanonicalField::DefTov,
        aliases: &["TO% (Def)", "Def TOV%", "TOV%_def", "Opp TOV% Forced"],
        required: true,
    },
];

/// Find the first column matching any alias. For each alias in order, an
/// exact match wins over a case-insensitive one (both sides trimmed).
pub fn find_column<'a, S: AsRef<str>>(columns: &'a [S], aliases: &[&str]) -> Option<&'a str> {
    let names: Vec<&'a str> = columns.iter().map(|c| c.as_ref()).collect();
    for alias in aliases {
        if let Some(name) = names.iter().find(|n| **n == *alias) {
            return Some(*name);
        }
        let wanted = alias.trim().to_lowercase();
        if let Some(name) = names.iter().find(|n| n.trim().to_lowercase() == wanted) {
            return Some(*name);
        }
    }
    None
}

/// A required canonical field that no column matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedField {
    pub field: CanonicalField,
    pub aliases: &'static [&'static str],
}

/// Resolved position of each canonical field in one particular table.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    entries: Vec<(CanonicalField, usize)>,
}

impl ColumnMap {
    pub fn index(&self, field: CanonicalField) -> Option<usize> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
    }
}

/// Resolves canonical fields against table headers using an injected,
/// immutable alias table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver {
    fields: &'static [FieldSpec],
}

impl ColumnResolver {
    pub fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// Resolve every field. Fails on the first required field that cannot be
    /// found; optional fields are simply left out of the map.
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S]) -> Result<ColumnMap, UnresolvedField> {
        let mut entries = Vec::with_capacity(self.fields.len());
        for spec in self.fields {
            let found = find_column(headers, spec.aliases)
                .and_then(|name| headers.iter().position(|h| h.as_ref() == name));
            match found {
                Some(idx) => {
                    debug!(
                        "resolved {} -> column '{}'",
                        spec.field,
                        headers[idx].as_ref()
                    );
                    entries.push((spec.field, idx));
                }
                None if spec.required => {
                    return Err(UnresolvedField {
                        field: spec.field,
                        aliases: spec.aliases,
                    });
                }
                None => debug!("optional field {} not present", spec.field),
            }
        }
        Ok(ColumnMap { entries })
    }
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new(FOUR_FACTOR_FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRAFTED_HEADERS: &[&str] = &[
        "Team", "ORtg", "DRtg", "Net Rtg", "eFG%", "ORB%", "FTAr", "TOV%", "EFG% (Def)",
        "ORB% (Def)", "FTAr (Def)", "TO% (Def)",
    ];

    #[test]
    fn exact_match_preferred_over_case_insensitive() {
        let cols = ["team", "Team"];
        assert_eq!(find_column(&cols, &["Team"]), Some("Team"));
        assert_eq!(find_column(&cols, &["TEAM"]), Some("team"));
    }

    #[test]
    fn earlier_alias_wins_even_if_case_insensitive() {
        // "ORTG" matches "ortg" case-insensitively before "OffRtg" is tried.
        let cols = ["OffRtg", "ortg"];
        assert_eq!(find_column(&cols, &["ORTG", "OffRtg"]), Some("ortg"));
    }

    #[test]
    fn padded_headers_match() {
        let cols = [" Offensive Rating "];
        assert_eq!(
            find_column(&cols, &["ORTG", "Offensive Rating"]),
            Some(" Offensive Rating ")
        );
    }

    #[test]
    fn no_match_is_none() {
        let cols = ["foo", "bar"];
        assert_eq!(find_column(&cols, &["ORTG", "OffRtg"]), None);
    }

    #[test]
    fn resolves_crafted_export() {
        let map = ColumnResolver::default().resolve(CRAFTED_HEADERS).unwrap();
        assert_eq!(map.index(CanonicalField::Team), Some(0));
        assert_eq!(map.index(CanonicalField::Ortg), Some(1));
        assert_eq!(map.index(CanonicalField::NetRtg), Some(3));
        assert_eq!(map.index(CanonicalField::OffEfg), Some(4));
        assert_eq!(map.index(CanonicalField::OffTov), Some(7));
        assert_eq!(map.index(CanonicalField::DefEfg), Some(8));
        assert_eq!(map.index(CanonicalField::DefTov), Some(11));
    }

    #[test]
    fn net_rating_is_optional() {
        let headers: Vec<&str> = CRAFTED_HEADERS
            .iter()
            .copied()
            .filter(|h| *h != "Net Rtg")
            .collect();
        let map = ColumnResolver::default().resolve(&headers).unwrap();
        assert_eq!(map.index(CanonicalField::NetRtg), None);
        assert_eq!(map.index(CanonicalField::Drtg), Some(2));
    }

    #[test]
    fn missing_required_field_names_aliases() {
        let headers: Vec<&str> = CRAFTED_HEADERS
            .iter()
            .copied()
            .filter(|h| *h != "ORtg")
            .collect();
        let err = ColumnResolver::default().resolve(&headers).unwrap_err();
        assert_eq!(err.field, CanonicalField::Ortg);
        assert!(err.aliases.contains(&"Offensive Rating"));
    }

    #[test]
    fn every_required_field_has_aliases() {
        for spec in FOUR_FACTOR_FIELDS {
            assert!(!spec.aliases.is_empty(), "{} has no aliases", spec.field);
        }
        let optional: Vec<_> = FOUR_FACTOR_FIELDS.iter().filter(|s| !s.required).collect();
        assert_eq!(optional.len(), 1);
        assert_eq!(optional[0].field, CanonicalField::NetRtg);
    }
}
