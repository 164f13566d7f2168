//! # Daily Value Table
//!
//! Reference daily values keyed by nutrient name, as published for
//! percent-daily-value labelling. Units are implicit per nutrient.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use tracing::info;

const NUTRIENT_COLUMN: &str = "Nutrient";
const VALUE_COLUMN: &str = "Daily Value";

/// Read-only mapping from nutrient name to reference daily value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyValueTable {
    values: HashMap<String, f64>,
}

impl DailyValueTable {
    /// Load the table from a tab- or comma-separated file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read daily value table {}", path.display()))?;
        let table = Self::parse(&content)
            .with_context(|| format!("Failed to parse daily value table {}", path.display()))?;
        info!(path = %path.display(), nutrients = table.len(), "Daily values loaded");
        Ok(table)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = delimited_reader(content);
        let headers = reader.headers()?.clone();
        let name_col = column_index(&headers, NUTRIENT_COLUMN).unwrap_or(0);
        let value_col = column_index(&headers, VALUE_COLUMN).unwrap_or(1);

        let mut values = HashMap::new();
        for result in reader.records() {
            let record = result?;
            let name = record.get(name_col).unwrap_or("");
            let raw = record.get(value_col).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            let line = record.position().map_or(0, |p| p.line());
            let value: f64 = raw
                .parse()
                .map_err(|_| anyhow!("Line {}: invalid daily value '{}' for '{}'", line, raw, name))?;
            values.insert(name.to_string(), value);
        }

        Ok(Self { values })
    }

    pub fn get(&self, nutrient: &str) -> Option<f64> {
        self.values.get(nutrient).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for DailyValueTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// CSV reader over `content`, tab-delimited when the header line has a tab.
///
/// Rows may be ragged and every field is trimmed.
pub(crate) fn delimited_reader(content: &str) -> Reader<&[u8]> {
    let header_line = content.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    let delimiter = if header_line.contains('\t') { b'\t' } else { b',' };

    ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes())
}

/// Index of a header, matched case-insensitively
pub(crate) fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_tsv() {
        let table = DailyValueTable::parse(
            "Nutrient\tDaily Value\nSodium, Na\t2300\nProtein\t50\nVitamin D (D2 + D3)\t20\n",
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("Sodium, Na"), Some(2300.0));
        assert_eq!(table.get("Vitamin D (D2 + D3)"), Some(20.0));
        assert_eq!(table.get("Fructose"), None);
    }

    #[test]
    fn test_parse_csv_with_quotes() {
        let table =
            DailyValueTable::parse("nutrient,daily value\n\"Iron, Fe\",18\nEnergy,2000\n").unwrap();
        assert_eq!(table.get("Iron, Fe"), Some(18.0));
        assert_eq!(table.get("Energy"), Some(2000.0));
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let table = DailyValueTable::parse("Nutrient,Daily Value\r\nProtein,50\r\n\r\nFiber, 28 \r\n")
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Fiber"), Some(28.0));
    }

    #[test]
    fn test_invalid_value_is_error() {
        let err = DailyValueTable::parse("Nutrient\tDaily Value\nProtein\tfifty\n").unwrap_err();
        assert!(err.to_string().contains("Protein"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Nutrient\tDaily Value").unwrap();
        writeln!(file, "Calcium, Ca\t1300").unwrap();

        let table = DailyValueTable::load(file.path()).unwrap();
        assert_eq!(table.get("Calcium, Ca"), Some(1300.0));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(DailyValueTable::load(Path::new("/nonexistent/daily.tsv")).is_err());
    }
}
