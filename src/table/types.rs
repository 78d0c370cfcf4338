// src/table/types.rs

use thiserror::Error;

/// One record: text cells in column order.
pub type Row = Vec<String>;

/// Whether `create` may add a second row with an existing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    #[default]
    AllowDuplicates,
    Unique,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("no rows were extracted, so there is no header row")]
    NoHeader,
    #[error("key column '{0}' is not in the header row")]
    MissingKeyColumn(String),
    #[error("expected {expected} values (one per column), got {got}")]
    Arity { expected: usize, got: usize },
    #[error("a row with key '{0}' already exists")]
    DuplicateKey(String),
}
