//! In-memory table model with CSV reading and writing.
//!
//! The whole file is held in memory at once: the target datasets are bounded
//! (tens of thousands of rows, tens of columns), so no streaming is needed.
//! Each row is a JSON object keyed by column name; column order is tracked
//! separately in [`Table::columns`], so row maps never decide output order.
//!
//! Reading auto-detects the source encoding (raw Scorecard releases ship as
//! UTF-8 or latin-1 depending on vintage) before handing the decoded text to
//! the CSV parser.

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::{TableError, TableResult};

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _, _) = chardet::detect(bytes);

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the detected encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding {
        "iso-8859-1" => encoding_rs::ISO_8859_15.decode(bytes).0.into_owned(),
        "windows-1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// An in-memory record table.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl Table {
    /// Create a table from parts.
    pub fn new(columns: Vec<String>, rows: Vec<Map<String, Value>>) -> Self {
        Self { columns, rows }
    }

    /// Ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows, in order.
    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    /// Mutable access to the rows.
    pub fn rows_mut(&mut self) -> &mut [Map<String, Value>] {
        &mut self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a column with this exact name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Project the table onto a set of columns, renaming as it goes.
    ///
    /// `mapping` pairs the new column name with the source column to copy
    /// from; output column order follows the mapping order. Cells whose
    /// source column is absent from a row are simply left out.
    pub fn select(&self, mapping: &[(&'static str, String)]) -> Table {
        let columns: Vec<String> = mapping.iter().map(|(name, _)| name.to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = Map::new();
                for (name, source) in mapping {
                    if let Some(value) = row.get(source.as_str()) {
                        out.insert(name.to_string(), value.clone());
                    }
                }
                out
            })
            .collect();
        Table { columns, rows }
    }

    /// Rename a column, in both the column list and every row.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(slot) = self.columns.iter_mut().find(|c| c.as_str() == from) {
            *slot = to.to_string();
        }
        for row in &mut self.rows {
            if let Some(value) = row.remove(from) {
                row.insert(to.to_string(), value);
            }
        }
    }

    /// Keep only the rows matching the predicate, preserving order.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Map<String, Value>) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Sort rows with a comparator. Stable: equal rows keep their relative order.
    pub fn sort_rows_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Map<String, Value>, &Map<String, Value>) -> std::cmp::Ordering,
    {
        self.rows.sort_by(compare);
    }

    /// Reorder columns: those in `preferred` first (in that order), then any
    /// remaining columns in their current order. No column is dropped.
    pub fn reorder_columns(&mut self, preferred: &[&str]) {
        let mut ordered: Vec<String> = preferred
            .iter()
            .filter(|name| self.has_column(name))
            .map(|name| name.to_string())
            .collect();
        for column in &self.columns {
            if !ordered.iter().any(|c| c == column) {
                ordered.push(column.clone());
            }
        }
        self.columns = ordered;
    }

    /// Read a CSV file into a table.
    ///
    /// The header row becomes the column list; every cell is stored as a
    /// trimmed string. Rows that are entirely blank are skipped.
    pub fn read_csv(path: &Path) -> TableResult<Table> {
        let bytes = fs::read(path)?;
        if bytes.is_empty() {
            return Err(TableError::EmptyFile);
        }

        let encoding = detect_encoding(&bytes);
        let content = decode_content(&bytes, &encoding);

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
            return Err(TableError::NoHeaders);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            let mut row = Map::new();
            for (i, name) in columns.iter().enumerate() {
                let value = record.get(i).map(str::trim).unwrap_or("");
                row.insert(name.clone(), Value::String(value.to_string()));
            }
            rows.push(row);
        }

        Ok(Table { columns, rows })
    }

    /// Write the table as a comma-delimited UTF-8 CSV, creating the parent
    /// directory if needed and overwriting any existing file.
    pub fn write_csv(&self, path: &Path) -> TableResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|column| cell_text(row.get(column.as_str())))
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Render a cell for CSV output. Missing values become empty cells.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_temp(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_read_simple_csv() {
        let (_dir, path) = write_temp("a,b\n1,2\n3,4\n");
        let table = Table::read_csv(&path).unwrap();
        assert_eq!(table.columns(), &["a", "b"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0]["a"], json!("1"));
        assert_eq!(table.rows()[1]["b"], json!("4"));
    }

    #[test]
    fn test_read_quoted_values() {
        let (_dir, path) = write_temp("name,city\n\"College, The\",Baltimore\n");
        let table = Table::read_csv(&path).unwrap();
        assert_eq!(table.rows()[0]["name"], json!("College, The"));
    }

    #[test]
    fn test_read_short_rows_padded() {
        let (_dir, path) = write_temp("a,b,c\n1,2\n");
        let table = Table::read_csv(&path).unwrap();
        assert_eq!(table.rows()[0]["c"], json!(""));
    }

    #[test]
    fn test_read_empty_file_error() {
        let (_dir, path) = write_temp("");
        assert!(matches!(Table::read_csv(&path), Err(TableError::EmptyFile)));
    }

    #[test]
    fn test_detect_encoding_ascii_is_utf8() {
        assert_eq!(detect_encoding(b"plain text"), "utf-8");
    }

    #[test]
    fn test_decode_latin1() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert!(decoded.starts_with("Soci"));
        assert_eq!(decoded.chars().count(), 7);
    }

    #[test]
    fn test_select_renames_and_projects() {
        let (_dir, path) = write_temp("Unitid,instnm,extra\n1,College A,x\n");
        let table = Table::read_csv(&path).unwrap();
        let selected = table.select(&[
            ("UNITID", "Unitid".to_string()),
            ("INSTNM", "instnm".to_string()),
        ]);
        assert_eq!(selected.columns(), &["UNITID", "INSTNM"]);
        assert_eq!(selected.rows()[0]["INSTNM"], json!("College A"));
        assert!(selected.rows()[0].get("extra").is_none());
    }

    #[test]
    fn test_rename_column() {
        let (_dir, path) = write_temp("PCT_PELL\n0.4\n");
        let mut table = Table::read_csv(&path).unwrap();
        table.rename_column("PCT_PELL", "PELL_SHARE");
        assert!(table.has_column("PELL_SHARE"));
        assert!(!table.has_column("PCT_PELL"));
        assert_eq!(table.rows()[0]["PELL_SHARE"], json!("0.4"));
    }

    #[test]
    fn test_reorder_appends_leftovers() {
        let (_dir, path) = write_temp("c,a,b\n1,2,3\n");
        let mut table = Table::read_csv(&path).unwrap();
        table.reorder_columns(&["a", "missing", "b"]);
        assert_eq!(table.columns(), &["a", "b", "c"]);
    }

    #[test]
    fn test_write_and_reread_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        let mut row = Map::new();
        row.insert("NAME".to_string(), json!("College, The"));
        row.insert("RATE".to_string(), json!(0.65));
        row.insert("EMPTY".to_string(), Value::Null);
        let table = Table::new(
            vec!["NAME".to_string(), "RATE".to_string(), "EMPTY".to_string()],
            vec![row],
        );

        table.write_csv(&path).unwrap();
        let reread = Table::read_csv(&path).unwrap();
        assert_eq!(reread.rows()[0]["NAME"], json!("College, The"));
        assert_eq!(reread.rows()[0]["RATE"], json!("0.65"));
        assert_eq!(reread.rows()[0]["EMPTY"], json!(""));
    }
}
