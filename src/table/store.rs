// src/table/store.rs

use std::io::{self, Write};
use tracing::{debug, warn};

use super::types::{KeyPolicy, Row, TableError};

/// Scraped rows under a header that is only known at run time. Rows are
/// always exactly as wide as the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    key_idx: usize,
    key_policy: KeyPolicy,
    rows: Vec<Row>,
}

impl Table {
    /// First row is the header, the rest are records. A header with no
    /// records is an empty table; no rows at all is an error.
    pub fn from_rows(rows: Vec<Row>, key_column: &str) -> Result<Self, TableError> {
        let mut iter = rows.into_iter();
        let columns = iter.next().ok_or(TableError::NoHeader)?;
        let key_idx = columns
            .iter()
            .position(|c| c == key_column)
            .ok_or_else(|| TableError::MissingKeyColumn(key_column.to_string()))?;

        let width = columns.len();
        let rows: Vec<Row> = iter
            .enumerate()
            .map(|(i, mut row)| {
                if row.len() != width {
                    warn!(row = i + 1, cells = row.len(), width, "ragged row resized");
                    row.resize(width, String::new());
                }
                row
            })
            .collect();

        debug!(columns = width, rows = rows.len(), "table built");
        Ok(Self {
            columns,
            key_idx,
            key_policy: KeyPolicy::default(),
            rows,
        })
    }

    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn key_column(&self) -> &str {
        &self.columns[self.key_idx]
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn create(&mut self, values: Row) -> Result<(), TableError> {
        if values.len() != self.columns.len() {
            return Err(TableError::Arity {
                expected: self.columns.len(),
                got: values.len(),
            });
        }
        let key = &values[self.key_idx];
        if self.key_policy == KeyPolicy::Unique && self.rows.iter().any(|r| r[self.key_idx] == *key)
        {
            return Err(TableError::DuplicateKey(key.clone()));
        }
        debug!(key = %key, "row created");
        self.rows.push(values);
        Ok(())
    }

    pub fn read(&self, key: &str) -> Vec<&Row> {
        self.rows.iter().filter(|r| r[self.key_idx] == key).collect()
    }

    /// Sets `column` to `value` on every row keyed `key`. Returns how many
    /// rows were touched; an unknown column or key touches none.
    pub fn update(&mut self, key: &str, column: &str, value: &str) -> usize {
        let Some(col) = self.column_index(column) else {
            debug!(column, "update on unknown column ignored");
            return 0;
        };
        let key_idx = self.key_idx;
        let mut touched = 0;
        for row in self.rows.iter_mut().filter(|r| r[key_idx] == key) {
            row[col] = value.to_string();
            touched += 1;
        }
        debug!(key, column, touched, "update applied");
        touched
    }

    /// Drops every row keyed `key`, returning how many went.
    pub fn delete(&mut self, key: &str) -> usize {
        let before = self.rows.len();
        let key_idx = self.key_idx;
        self.rows.retain(|r| r[key_idx] != key);
        let removed = before - self.rows.len();
        debug!(key, removed, "delete applied");
        removed
    }

    /// Prints `rows` under the header as a left-aligned grid.
    pub fn write_rows<W: Write>(&self, out: &mut W, rows: &[&Row]) -> io::Result<()> {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in rows {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<w$}", c, w = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        writeln!(out, "{}", line(&self.columns[..]))?;
        for row in rows {
            writeln!(out, "{}", line(&row[..]))?;
        }
        Ok(())
    }
}
