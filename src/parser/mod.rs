//! Tabular parser for the raw transfer table.
//!
//! Converts comma-delimited text into an ordered sequence of records.
//! The parser knows nothing about transfer semantics; it only enforces
//! the header-derived row shape.

use crate::models::TransferRecord;
use thiserror::Error;
use tracing::debug;

/// Field separator of the source format.
pub const DELIMITER: char = ',';

const QUOTE: char = '"';

/// Structural parse failure. Data-quality problems (malformed rows,
/// blank lines) never raise; they drop the affected row instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input contains no header line to derive a schema from.
    #[error("input contains no header row")]
    MissingHeader,
}

/// A parsed snapshot: the header-derived schema plus the ordered records.
///
/// Immutable once produced; queries only ever borrow the record slice.
/// A fresh load produces an entirely new snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<TransferRecord>,
}

impl Dataset {
    /// Column names in source order, as defined by the header row.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Records in source row order, malformed and blank lines elided.
    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the snapshot, keeping only the record sequence.
    #[allow(dead_code)] // Convenience for callers that don't need the schema
    pub fn into_records(self) -> Vec<TransferRecord> {
        self.records
    }
}

/// Parse raw delimited text into a [`Dataset`].
///
/// The first line is the header; its comma-separated names (trimmed)
/// define the schema for every row. Rows whose field count does not
/// match the header are dropped, not errors. Returns
/// [`ParseError::MissingHeader`] only when there is no header line at
/// all; header-only input yields an empty record sequence.
pub fn parse(raw_text: &str) -> Result<Dataset, ParseError> {
    let mut lines = raw_text.lines();

    let header = lines
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or(ParseError::MissingHeader)?;

    let columns: Vec<String> = header
        .split(DELIMITER)
        .map(|name| name.trim().to_string())
        .collect();

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let values = split_fields(line);
        if values.len() != columns.len() {
            debug!(
                "Dropping row with {} fields, expected {}",
                values.len(),
                columns.len()
            );
            dropped += 1;
            continue;
        }

        records.push(TransferRecord::from_header(&columns, values));
    }

    if dropped > 0 {
        debug!("Dropped {} rows not matching the header shape", dropped);
    }

    Ok(Dataset { columns, records })
}

/// Quote-aware field scanner for a single line.
///
/// A double quote toggles the quoted span and is stripped; there is no
/// escaped-quote syntax, so two adjacent quotes open and immediately
/// close an empty span. A delimiter inside a quoted span is literal.
/// Every line with n delimiters outside quotes yields n + 1 tokens,
/// each trimmed; an empty field yields an empty token.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => {
                fields.push(std::mem::take(&mut current).trim().to_string());
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Serialize a dataset back to delimited text: header line first, then
/// one line per record in column order. Fields containing the delimiter
/// are wrapped in quotes, matching the input format.
pub fn to_delimited(dataset: &Dataset) -> String {
    let mut out = String::new();

    push_row(&mut out, dataset.columns().iter().map(String::as_str));
    for record in dataset.records() {
        push_row(&mut out, dataset.columns().iter().map(|c| record.field(c)));
    }

    out
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(DELIMITER);
        }
        first = false;

        if field.contains(DELIMITER) {
            out.push(QUOTE);
            out.push_str(field);
            out.push(QUOTE);
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let text = "Year,New_club,Price_numeric\n2020,Arsenal,50\n2021,Chelsea,70\n";
        let dataset = parse(text).unwrap();

        assert_eq!(dataset.columns(), ["Year", "New_club", "Price_numeric"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].field("New_club"), "Arsenal");
        assert_eq!(dataset.records()[1].field("Year"), "2021");
    }

    #[test]
    fn test_header_names_trimmed() {
        let dataset = parse(" Year , New_club \n2020,Arsenal\n").unwrap();
        assert_eq!(dataset.columns(), ["Year", "New_club"]);
    }

    #[test]
    fn test_quoted_field_keeps_delimiter() {
        let dataset = parse("Club,League\n\"Brighton, Hove Albion\",Premier League\n").unwrap();
        assert_eq!(
            dataset.records()[0].field("Club"),
            "Brighton, Hove Albion"
        );
    }

    #[test]
    fn test_adjacent_quotes_contribute_nothing() {
        // No escaped-quote syntax: adjacent quotes open then close a span.
        let dataset = parse("Note\nsaid \"\"hello\"\"\n").unwrap();
        assert_eq!(dataset.records()[0].field("Note"), "said hello");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let dataset = parse("A,B\n  x  ,  y\n").unwrap();
        assert_eq!(dataset.records()[0].field("A"), "x");
        assert_eq!(dataset.records()[0].field("B"), "y");
    }

    #[test]
    fn test_empty_field_yields_empty_token() {
        let dataset = parse("A,B,C\n1,,3\n").unwrap();
        assert_eq!(dataset.records()[0].field("B"), "");
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_malformed_rows_dropped() {
        let text = "A,B,C\n1,2,3\nonly,two\n4,5,6,7\n8,9,10\n";
        let dataset = parse(text).unwrap();

        // 4 non-blank data lines, 2 malformed
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].field("A"), "1");
        assert_eq!(dataset.records()[1].field("A"), "8");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = "A,B\n1,2\n\n   \n3,4\n";
        let dataset = parse(text).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let dataset = parse("A,B\r\n1,2\r\n").unwrap();
        assert_eq!(dataset.records()[0].field("B"), "2");
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(parse("").unwrap_err(), ParseError::MissingHeader);
        assert_eq!(parse("   \n").unwrap_err(), ParseError::MissingHeader);
    }

    #[test]
    fn test_header_only_input_is_empty_not_error() {
        let dataset = parse("A,B,C\n").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_parse_sample_fixture() {
        let dataset = parse(include_str!("../../fixtures/transfers.csv")).unwrap();

        assert_eq!(dataset.columns().len(), 10);
        // 13 non-blank data lines, one of them short a few fields
        assert_eq!(dataset.len(), 12);
        assert_eq!(dataset.records()[6].field("Name"), "Alcantara, Thiago");
        assert_eq!(dataset.records()[6].field("New_club"), "Liverpool");
    }

    #[test]
    fn test_round_trip() {
        let text = "Year,Prev_club,New_club\n2020,Ajax,Arsenal\n2021,Porto,Chelsea\n";
        let first = parse(text).unwrap();
        let second = parse(&to_delimited(&first)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_quotes_embedded_delimiter() {
        let text = "Club,League\n\"Brighton, Hove Albion\",Premier League\n";
        let first = parse(text).unwrap();
        let second = parse(&to_delimited(&first)).unwrap();
        assert_eq!(
            second.records()[0].field("Club"),
            "Brighton, Hove Albion"
        );
        assert_eq!(first, second);
    }
}
