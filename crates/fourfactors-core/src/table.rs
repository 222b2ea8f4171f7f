// In-memory string table read from a CSV export or processed snapshot.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use thiserror::Error;

use crate::schema::TeamFactorRecord;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// A header row plus data rows, kept as text exactly as read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl Table {
    /// Read a table from any CSV source. Short rows are allowed; missing
    /// trailing cells read as absent.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self { headers, rows })
    }

    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path).map_err(|e| TableError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_reader(file).map_err(|e| TableError::Csv {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column whose trimmed name equals `name` ignoring case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }

    /// Cell text at `(row, col)`, or `None` when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All cells of the named column (case-insensitive), top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.get(idx).unwrap_or(""))
                .collect(),
        )
    }

    /// Deserialize rows into typed records, matching headers to field names
    /// case-insensitively.
    pub fn to_records(&self) -> Result<Vec<TeamFactorRecord>, csv::Error> {
        let lowered: StringRecord = self
            .headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        self.rows
            .iter()
            .map(|row| row.deserialize::<TeamFactorRecord>(Some(&lowered)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROCESSED: &str = "\
team_name,team,ortg,drtg,netrtg,off_efg,off_orb,off_tov,off_ftar,def_efg,def_orb,def_tov,def_ftar,source
Boston Celtics,BOS,122.2,110.6,11.6,0.566,0.275,0.119,0.201,0.523,0.262,0.134,0.176,CraftedNBA
Denver Nuggets,DEN,117.8,112.3,,0.561,0.289,0.128,,0.536,0.254,0.137,0.205,CraftedNBA";

    #[test]
    fn reads_headers_and_rows() {
        let table = Table::from_reader(PROCESSED.as_bytes()).unwrap();
        assert_eq!(table.headers().len(), 14);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), Some("BOS"));
        assert_eq!(table.cell(5, 1), None);
    }

    #[test]
    fn column_lookup_ignores_case_and_padding() {
        let table = Table::from_reader("  Team ,ORtg\nBOS,122.2".as_bytes()).unwrap();
        assert_eq!(table.column_index("team"), Some(0));
        assert_eq!(table.column_index("ortg"), Some(1));
        assert_eq!(table.column("TEAM"), Some(vec!["BOS"]));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let table = Table::from_reader("a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.cell(0, 2), None);
        assert_eq!(table.column("c"), Some(vec![""]));
    }

    #[test]
    fn to_records_maps_empty_cells_to_none() {
        let table = Table::from_reader(PROCESSED.as_bytes()).unwrap();
        let records = table.to_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].team, "BOS");
        assert_eq!(records[0].netrtg, Some(11.6));
        assert_eq!(records[1].netrtg, None);
        assert_eq!(records[1].off_ftar, None);
        assert_eq!(records[1].source, "CraftedNBA");
    }

    #[test]
    fn to_records_accepts_uppercase_headers() {
        let upper = PROCESSED.replacen("team_name,team,ortg", "TEAM_NAME,TEAM,ORTG", 1);
        let table = Table::from_reader(upper.as_bytes()).unwrap();
        let records = table.to_records().unwrap();
        assert_eq!(records[0].ortg, Some(122.2));
    }

    #[test]
    fn to_records_without_name_and_source_columns() {
        let text = "\
team,ortg,drtg,netrtg,off_efg,off_orb,off_tov,off_ftar,def_efg,def_orb,def_tov,def_ftar
MIA,114.0,111.5,2.5,0.54,0.251,0.122,0.24,0.533,0.27,0.14,0.22";
        let table = Table::from_reader(text.as_bytes()).unwrap();
        let records = table.to_records().unwrap();
        assert_eq!(records[0].team, "MIA");
        assert_eq!(records[0].team_name, "");
        assert_eq!(records[0].source, "");
        assert_eq!(records[0].netrtg, Some(2.5));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Table::from_path(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }
}
