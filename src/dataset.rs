//! Tabular input model
//!
//! A [`Dataset`] is a list of named columns and rows of optional scalar
//! values. Where the data came from (file, upload, memory) is the caller's
//! concern; this module only holds it.

use crate::error::{CographError, CographResult};
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

/// Rows of named, possibly-missing scalar fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    /// Create an empty dataset with the given column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Dataset {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. The row must have one entry per column.
    pub fn push_row(&mut self, values: Vec<Option<String>>) -> CographResult<()> {
        if values.len() != self.columns.len() {
            return Err(CographError::RowArity {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(values);
        Ok(())
    }

    /// Convenience for tests and small in-memory tables: `None` or `""` is missing
    pub fn push<S: AsRef<str>>(&mut self, values: &[Option<S>]) -> CographResult<()> {
        let row = values
            .iter()
            .map(|v| v.as_ref().map(|s| s.as_ref().to_string()))
            .collect();
        self.push_row(row)
    }

    /// Build a dataset from a JSON array of objects.
    ///
    /// Columns appear in order of first occurrence across records. `null`
    /// becomes missing, strings are taken as-is, other scalars use their JSON
    /// text form.
    pub fn from_json_records(value: &Value) -> CographResult<Self> {
        let records = value.as_array().ok_or_else(|| {
            CographError::InvalidDataset("expected a JSON array of objects".to_string())
        })?;

        let mut columns: IndexSet<String> = IndexSet::new();
        let mut parsed: Vec<IndexMap<&str, Option<String>>> = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let object = record.as_object().ok_or_else(|| {
                CographError::InvalidDataset(format!("record {i} is not a JSON object"))
            })?;
            let mut row = IndexMap::with_capacity(object.len());
            for (key, v) in object {
                columns.insert(key.clone());
                row.insert(key.as_str(), scalar_text(v));
            }
            parsed.push(row);
        }

        let mut dataset = Dataset::new(columns.iter().cloned());
        for row in parsed {
            let values = columns
                .iter()
                .map(|c| row.get(c.as_str()).cloned().flatten())
                .collect();
            dataset.push_row(values)?;
        }
        Ok(dataset)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at `(row, column)`, `None` when missing or empty
    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)?
            .get(column)?
            .as_deref()
            .filter(|v| !v.is_empty())
    }

    /// Number of distinct non-missing values per column, in column order
    pub fn distinct_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let distinct: IndexSet<&str> =
                    (0..self.rows.len()).filter_map(|r| self.value(r, c)).collect();
                (name.clone(), distinct.len())
            })
            .collect()
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
