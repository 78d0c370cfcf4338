// src/table/csv_store.rs

use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use super::{Row, Table};

/// The CSV file a table is saved to after every change.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with the header row followed by every record.
    /// Not atomic: a crash mid-write leaves a partial file.
    pub fn save(&self, table: &Table) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating directory {}", parent.display()))?;
            }
        }

        let mut wtr = WriterBuilder::new()
            .from_path(&self.path)
            .with_context(|| format!("opening {} for writing", self.path.display()))?;
        wtr.write_record(table.columns())
            .context("writing CSV header")?;
        for row in table.rows() {
            wtr.write_record(row).context("writing CSV record")?;
        }
        wtr.flush()
            .with_context(|| format!("flushing {}", self.path.display()))?;

        info!(path = %self.path.display(), rows = table.len(), "table saved");
        Ok(())
    }

    /// Read the file back into a table keyed on `key_column`.
    pub fn load(&self, key_column: &str) -> Result<Table> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let mut rows: Vec<Row> = Vec::new();
        for result in rdr.records() {
            let record =
                result.with_context(|| format!("parsing CSV record in {}", self.path.display()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!(path = %self.path.display(), rows = rows.len(), "csv loaded");

        Table::from_rows(rows, key_column)
            .with_context(|| format!("building table from {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn gdp_table() -> Table {
        Table::from_rows(
            vec![
                row(&["Rank", "Country", "GDP (millions)"]),
                row(&["1", "United States", "25,462,700"]),
                row(&["2", "Côte d'Ivoire", "70,\"0\"13"]),
                row(&["3", "", " padded "]),
            ],
            "Country",
        )
        .unwrap()
    }

    #[test]
    fn save_writes_header_and_quotes_commas() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvStore::new(dir.path().join("countries_data.csv"));
        store.save(&gdp_table())?;

        let text = fs::read_to_string(store.path())?;
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Rank,Country,GDP (millions)"));
        assert_eq!(lines.next(), Some("1,United States,\"25,462,700\""));
        Ok(())
    }

    #[test]
    fn reload_reconstructs_the_table() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvStore::new(dir.path().join("countries_data.csv"));
        let table = gdp_table();
        store.save(&table)?;
        assert_eq!(store.load("Country")?, table);
        Ok(())
    }

    #[test]
    fn save_overwrites_previous_contents() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvStore::new(dir.path().join("countries_data.csv"));
        let mut table = gdp_table();
        store.save(&table)?;

        table.delete("United States");
        table.delete("Côte d'Ivoire");
        store.save(&table)?;

        let reloaded = store.load("Country")?;
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded, table);
        Ok(())
    }

    #[test]
    fn header_only_table_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let store = CsvStore::new(dir.path().join("nested/out.csv"));
        let table = Table::from_rows(vec![row(&["Rank", "Country", "GDP"])], "Country")?;
        store.save(&table)?;
        assert_eq!(fs::read_to_string(store.path())?, "Rank,Country,GDP\n");
        assert_eq!(store.load("Country")?, table);
        Ok(())
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("absent.csv"));
        assert!(store.load("Country").is_err());
    }
}
