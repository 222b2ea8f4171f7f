// Import pipeline: raw export -> resolved columns -> normalized, bounded
// records -> sorted snapshot files.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::normalize::{Cell, CellIssue, Normalizer, StatKind};
use crate::resolver::{CanonicalField, ColumnMap, ColumnResolver, UnresolvedField};
use crate::schema::{net_rating, TeamFactorRecord};
use crate::snapshot::{self, SnapshotError, SnapshotPaths};
use crate::table::{Table, TableError};
use crate::teams::TeamDirectory;

/// Number of team codes echoed back in an [`ImportSummary`].
const SAMPLE_TEAMS: usize = 5;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("missing required column for {canonical}; acceptable aliases: {aliases:?}")]
    MissingColumn {
        canonical: &'static str,
        aliases: &'static [&'static str],
    },

    #[error("row {row}: invalid value {raw:?} for {field} ({issue})")]
    InvalidValue {
        row: usize,
        field: &'static str,
        raw: String,
        issue: CellIssue,
    },

    #[error(transparent)]
    Read(#[from] TableError),

    #[error(transparent)]
    Write(#[from] SnapshotError),
}

impl From<UnresolvedField> for ImportError {
    fn from(u: UnresolvedField) -> Self {
        ImportError::MissingColumn {
            canonical: u.field.label(),
            aliases: u.aliases,
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// What one successful import produced.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub date: NaiveDate,
    pub rows: usize,
    pub sample_teams: Vec<String>,
    pub paths: SnapshotPaths,
}

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

/// Turns raw team exports into normalized [`TeamFactorRecord`]s.
///
/// Alias table and team directory are injected at construction and never
/// change afterwards.
#[derive(Debug, Clone)]
pub struct Importer {
    resolver: ColumnResolver,
    teams: TeamDirectory,
    normalizer: Normalizer,
    source: String,
}

impl Importer {
    pub fn new(
        resolver: ColumnResolver,
        teams: TeamDirectory,
        normalizer: Normalizer,
        source: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            teams,
            normalizer,
            source: source.into(),
        }
    }

    /// Importer for NBA Four Factors exports using the given config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ColumnResolver::default(),
            TeamDirectory::nba(),
            Normalizer::new(config.normalize),
            config.source.clone(),
        )
    }

    /// Normalize every row of `table`, sorted by team code.
    ///
    /// Column resolution happens before any row is touched, so a missing
    /// required column fails without partial output.
    pub fn normalize_table(&self, table: &Table) -> Result<Vec<TeamFactorRecord>, ImportError> {
        let columns = self.resolver.resolve(table.headers())?;

        let mut records = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            records.push(self.normalize_row(table, &columns, row)?);
        }

        records.sort_by(|a, b| a.team.cmp(&b.team));

        let mut seen = HashSet::new();
        for r in &records {
            if !seen.insert(r.team.as_str()) {
                warn!("duplicate team code '{}' in export", r.team);
            }
        }

        Ok(records)
    }

    /// Read and normalize a raw export file.
    pub fn load_and_normalize(&self, path: &Path) -> Result<Vec<TeamFactorRecord>, ImportError> {
        let table = Table::from_path(path)?;
        info!(
            "read {} rows, {} columns from {}",
            table.len(),
            table.headers().len(),
            path.display()
        );
        self.normalize_table(&table)
    }

    /// Full run: read `input`, normalize, and write the snapshot set for
    /// `date` under `outdir/processed`. Nothing is written unless the whole
    /// export normalizes cleanly.
    pub fn import_file(
        &self,
        input: &Path,
        outdir: &Path,
        date: NaiveDate,
    ) -> Result<ImportSummary, ImportError> {
        let records = self.load_and_normalize(input)?;
        let paths = snapshot::write_snapshot(outdir, date, &records)?;

        Ok(ImportSummary {
            date,
            rows: records.len(),
            sample_teams: records
                .iter()
                .take(SAMPLE_TEAMS)
                .map(|r| r.team.clone())
                .collect(),
            paths,
        })
    }

    fn normalize_row(
        &self,
        table: &Table,
        columns: &ColumnMap,
        row: usize,
    ) -> Result<TeamFactorRecord, ImportError> {
        let text = |field: CanonicalField| columns.index(field).and_then(|c| table.cell(row, c));

        let stat = |field: CanonicalField, kind: StatKind| -> Result<Option<f64>, ImportError> {
            let raw = text(field);
            self.normalizer
                .normalize(kind, Cell::from(raw))
                .map_err(|issue| ImportError::InvalidValue {
                    row: row + 1,
                    field: field.label(),
                    raw: raw.unwrap_or_default().to_string(),
                    issue,
                })
        };

        let team_name = text(CanonicalField::Team).unwrap_or_default().to_string();
        let team = self.teams.code_or_passthrough(&team_name);
        if team.is_empty() {
            warn!("row {}: empty team name", row + 1);
        } else if self.teams.code(&team_name).is_none() {
            warn!("unmapped team name '{}', keeping as-is", team);
        }

        let ortg = stat(CanonicalField::Ortg, StatKind::Rating)?;
        let drtg = stat(CanonicalField::Drtg, StatKind::Rating)?;
        let netrtg = if columns.index(CanonicalField::NetRtg).is_some() {
            stat(CanonicalField::NetRtg, StatKind::Rating)?
        } else {
            net_rating(ortg, drtg)
        };

        Ok(TeamFactorRecord {
            team_name,
            team,
            ortg,
            drtg,
            netrtg,
            off_efg: stat(CanonicalField::OffEfg, StatKind::Percentage)?,
            off_orb: stat(CanonicalField::OffOrb, StatKind::Percentage)?,
            off_tov: stat(CanonicalField::OffTov, StatKind::Percentage)?,
            off_ftar: stat(CanonicalField::OffFtar, StatKind::Ratio)?,
            def_efg: stat(CanonicalField::DefEfg, StatKind::Percentage)?,
            def_orb: stat(CanonicalField::DefOrb, StatKind::Percentage)?,
            def_tov: stat(CanonicalField::DefTov, StatKind::Percentage)?,
            def_ftar: stat(CanonicalField::DefFtar, StatKind::Ratio)?,
            source: self.source.clone(),
        })
    }
}

impl Default for Importer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Convenience: import with default config into `outdir`.
pub fn import_team_factors(
    input: &Path,
    outdir: &Path,
    date: NaiveDate,
) -> Result<ImportSummary, ImportError> {
    Importer::default().import_file(input, outdir, date)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{CoercionPolicy, NormalizeConfig};

    const CRAFTED: &str = "\
Team,ORtg,DRtg,Net Rtg,eFG%,ORB%,FTAr,TOV%,EFG% (Def),ORB% (Def),FTAr (Def),TO% (Def)
Los Angeles Lakers,116.1,114.9,1.2,55.9,24.1,27.3,12.8,54.2,26.0,21.0,13.1
Boston Celtics,122.2,110.6,11.6,0.566,0.275,0.201,0.119,0.523,0.262,0.176,0.134
Atlanta Hawks,115.0,118.9,-3.9,53.1%,27.8%,22.5,13.0%,55.8%,28.1%,24.0,12.2%";

    fn table(text: &str) -> Table {
        Table::from_reader(text.as_bytes()).unwrap()
    }

    fn approx(v: Option<f64>, expected: f64) {
        let v = v.expect("value should be present");
        assert!((v - expected).abs() < 1e-9, "expected {expected}, got {v}");
    }

    #[test]
    fn normalizes_mixed_units_and_sorts_by_team() {
        let records = Importer::default().normalize_table(&table(CRAFTED)).unwrap();
        let teams: Vec<&str> = records.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, vec!["ATL", "BOS", "LAL"]);

        let lal = &records[2];
        assert_eq!(lal.team_name, "Los Angeles Lakers");
        approx(lal.off_efg, 0.559);
        approx(lal.off_ftar, 0.273);
        approx(lal.def_ftar, 0.21);
        approx(lal.netrtg, 1.2);

        let atl = &records[0];
        approx(atl.off_efg, 0.531);
        approx(atl.off_tov, 0.13);
        approx(atl.netrtg, -3.9);

        let bos = &records[1];
        approx(bos.off_efg, 0.566);
        approx(bos.def_ftar, 0.176);
        assert_eq!(bos.source, "CraftedNBA");
    }

    #[test]
    fn net_rating_computed_when_absent() {
        let text = "\
team,ORTG,DRTG,EFG%,ORB%,FTAr,TOV%,Def eFG%,Def ORB%,Def FTAr,Def TOV%
Miami Heat,114.0,111.5,0.54,0.25,0.24,0.12,0.53,0.27,0.22,0.14";
        let records = Importer::default().normalize_table(&table(text)).unwrap();
        approx(records[0].netrtg, 2.5);
        assert_eq!(records[0].team, "MIA");
    }

    #[test]
    fn missing_rating_leaves_net_rating_missing() {
        let text = "\
team,ORTG,DRTG,EFG%,ORB%,FTAr,TOV%,Def eFG%,Def ORB%,Def FTAr,Def TOV%
Miami Heat,,111.5,0.54,0.25,0.24,0.12,0.53,0.27,0.22,0.14";
        let records = Importer::default().normalize_table(&table(text)).unwrap();
        assert_eq!(records[0].ortg, None);
        assert_eq!(records[0].netrtg, None);
    }

    #[test]
    fn unknown_team_passes_through() {
        let text = "\
team,ORTG,DRTG,EFG%,ORB%,FTAr,TOV%,Def eFG%,Def ORB%,Def FTAr,Def TOV%
Seattle SuperSonics,110,110,0.5,0.25,0.2,0.13,0.5,0.25,0.2,0.13";
        let records = Importer::default().normalize_table(&table(text)).unwrap();
        assert_eq!(records[0].team, "Seattle SuperSonics");
        assert_eq!(records[0].team_name, "Seattle SuperSonics");
    }

    #[test]
    fn padded_team_name_maps_but_is_stored_verbatim() {
        let text = "\
team,ORTG,DRTG,EFG%,ORB%,FTAr,TOV%,Def eFG%,Def ORB%,Def FTAr,Def TOV%
 Miami Heat ,114,111.5,0.54,0.25,0.24,0.12,0.53,0.27,0.22,0.14";
        let records = Importer::default().normalize_table(&table(text)).unwrap();
        assert_eq!(records[0].team, "MIA");
        assert_eq!(records[0].team_name, " Miami Heat ");
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let text = "\
team,ORTG,DRTG,EFG%,ORB%,FTAr,TOV%,Def eFG%,Def ORB%,Def FTAr,Def TOV%
Utah Jazz,110,110,120,0.25,-0.1,0.13,0.5,0.25,160,0.13";
        let records = Importer::default().normalize_table(&table(text)).unwrap();
        assert_eq!(records[0].off_efg, Some(1.0));
        assert_eq!(records[0].off_ftar, Some(0.0));
        assert_eq!(records[0].def_ftar, Some(1.5));
    }

    #[test]
    fn garbage_cells_become_missing_under_clamp() {
        let text = "\
team,ORTG,DRTG,EFG%,ORB%,FTAr,TOV%,Def eFG%,Def ORB%,Def FTAr,Def TOV%
Utah Jazz,abc,110,--,0.25,n/a,0.13,0.5,0.25,0.2,0.13";
        let records = Importer::default().normalize_table(&table(text)).unwrap();
        assert_eq!(records[0].ortg, None);
        assert_eq!(records[0].off_efg, None);
        assert_eq!(records[0].off_ftar, None);
    }

    #[test]
    fn reject_policy_names_row_and_field() {
        let config = Config {
            normalize: NormalizeConfig {
                policy: CoercionPolicy::Reject,
                ..NormalizeConfig::default()
            },
            ..Config::default()
        };
        let text = "\
team,ORTG,DRTG,EFG%,ORB%,FTAr,TOV%,Def eFG%,Def ORB%,Def FTAr,Def TOV%
Utah Jazz,110,110,0.5,0.25,0.2,0.13,0.5,0.25,0.2,0.13
Miami Heat,110,110,0.5,oops,0.2,0.13,0.5,0.25,0.2,0.13";
        let err = Importer::from_config(&config)
            .normalize_table(&table(text))
            .unwrap_err();
        match err {
            ImportError::InvalidValue { row, field, raw, issue } => {
                assert_eq!(row, 2);
                assert_eq!(field, "Off_ORB");
                assert_eq!(raw, "oops");
                assert_eq!(issue, CellIssue::Unparsable);
            }
            other => panic!("expected InvalidValue, got: {other}"),
        }
    }

    #[test]
    fn missing_required_column_is_reported() {
        let text = "team,DRTG,EFG%\nUtah Jazz,110,0.5";
        let err = Importer::default().normalize_table(&table(text)).unwrap_err();
        match &err {
            ImportError::MissingColumn { canonical, aliases } => {
                assert_eq!(*canonical, "ORTG");
                assert!(aliases.contains(&"OffRtg"));
                assert!(err.to_string().contains("Offensive Rating"));
            }
            other => panic!("expected MissingColumn, got: {other}"),
        }
    }

    #[test]
    fn custom_source_tag() {
        let importer = Importer::new(
            ColumnResolver::default(),
            TeamDirectory::nba(),
            Normalizer::default(),
            "BBRef",
        );
        let records = importer.normalize_table(&table(CRAFTED)).unwrap();
        assert!(records.iter().all(|r| r.source == "BBRef"));
    }
}
