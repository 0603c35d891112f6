//! Dataset loading for the command line
//!
//! `.json` files hold an array of objects. Anything else is read as delimited
//! text with a header row. Quoted fields may contain the delimiter, line
//! breaks and doubled quotes. No encoding or delimiter detection is done.

use anyhow::{bail, Context, Result};
use cograph::Dataset;
use std::path::Path;

pub fn load_dataset(path: &Path, delimiter: char) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let value: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        Ok(Dataset::from_json_records(&value)?)
    } else {
        parse_delimited(&text, delimiter)
    }
}

/// Parse delimited text whose first record is the header. Empty cells are missing.
pub fn parse_delimited(text: &str, delimiter: char) -> Result<Dataset> {
    if delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
        bail!("{delimiter:?} cannot be used as a delimiter");
    }

    let mut records = split_records(text, delimiter)?.into_iter();
    let header = match records.next() {
        Some(header) => header,
        None => bail!("input has no header row"),
    };

    let mut dataset = Dataset::new(header.into_iter().map(|h| h.trim().to_string()));
    for (line, record) in records.enumerate() {
        let values = record
            .into_iter()
            .map(|cell| if cell.is_empty() { None } else { Some(cell) })
            .collect();
        dataset
            .push_row(values)
            .with_context(|| format!("record {} does not match the header", line + 2))?;
    }
    Ok(dataset)
}

fn split_records(text: &str, delimiter: char) -> Result<Vec<Vec<String>>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                _ => cell.push(c),
            }
            continue;
        }
        match c {
            '"' if cell.is_empty() => in_quotes = true,
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut cell));
                finish_record(&mut records, std::mem::take(&mut record));
            }
            c if c == delimiter => record.push(std::mem::take(&mut cell)),
            _ => cell.push(c),
        }
    }

    if in_quotes {
        bail!("unterminated quoted field at end of input");
    }
    if !cell.is_empty() || !record.is_empty() {
        record.push(cell);
        finish_record(&mut records, record);
    }
    Ok(records)
}

// Blank lines are skipped rather than read as one-cell records.
fn finish_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    if record.len() == 1 && record[0].is_empty() {
        return;
    }
    records.push(record);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_missing_cells() {
        let dataset = parse_delimited("A,B\nx,p\n,q\ny,\n", ',').unwrap();
        assert_eq!(dataset.columns(), ["A", "B"]);
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.value(1, 0), None);
        assert_eq!(dataset.value(1, 1), Some("q"));
        assert_eq!(dataset.value(2, 1), None);
    }

    #[test]
    fn test_quoted_fields() {
        let text = "name;note\n\"Smith; J\";\"said \"\"hi\"\"\"\r\n\"multi\nline\";x\n";
        let dataset = parse_delimited(text, ';').unwrap();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.value(0, 0), Some("Smith; J"));
        assert_eq!(dataset.value(0, 1), Some("said \"hi\""));
        assert_eq!(dataset.value(1, 0), Some("multi\nline"));
    }

    #[test]
    fn test_blank_lines_and_no_trailing_newline() {
        let dataset = parse_delimited("A\tB\n\nx\tp\n\ny\tq", '\t').unwrap();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.value(1, 1), Some("q"));
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let err = parse_delimited("A,B\nx,p,extra\n", ',').unwrap_err();
        assert!(err.to_string().contains("record 2"));
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(parse_delimited("A,B\n\"x,p\n", ',').is_err());
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(parse_delimited("", ',').is_err());
    }

    #[test]
    fn test_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"[{"A": "x", "B": "p"}, {"A": "y", "B": null}]"#).unwrap();

        let dataset = load_dataset(&path, ',').unwrap();
        assert_eq!(dataset.columns(), ["A", "B"]);
        assert_eq!(dataset.value(1, 1), None);
    }
}
