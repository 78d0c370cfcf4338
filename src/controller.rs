// src/controller.rs

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

use crate::table::{CsvStore, Row, Table};

const MENU: &str = "\nOperations:
1. Create (Add a new row)
2. Read (Display specific information)
3. Update (Update a cell value)
4. Delete (Remove a row)
5. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Create,
    Read,
    Update,
    Delete,
    Exit,
}

impl Choice {
    /// Exact match only: " 1" or "1." are not choices.
    fn parse(s: &str) -> Option<Self> {
        match s {
            "1" => Some(Choice::Create),
            "2" => Some(Choice::Read),
            "3" => Some(Choice::Update),
            "4" => Some(Choice::Delete),
            "5" => Some(Choice::Exit),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Menu-driven CRUD loop over a borrowed table. Every mutating choice is
/// followed by a save through `store`.
pub struct Controller<R, W> {
    input: R,
    output: W,
    store: CsvStore,
}

impl<R: BufRead, W: Write> Controller<R, W> {
    pub fn new(input: R, output: W, store: CsvStore) -> Self {
        Self {
            input,
            output,
            store,
        }
    }

    /// Runs until the user picks Exit or input runs out. Only I/O and
    /// persistence failures come back as errors.
    pub fn run(&mut self, table: &mut Table) -> Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(raw) = self.prompt("Enter the operation number (1-5): ")? else {
                debug!("input closed at menu");
                break;
            };

            let flow = match Choice::parse(&raw) {
                Some(choice) => {
                    info!(?choice, "operation selected");
                    self.dispatch(choice, table)?
                }
                None => {
                    warn!(input = %raw, "invalid menu choice");
                    writeln!(
                        self.output,
                        "Invalid choice. Please enter a number between 1 and 5."
                    )?;
                    Flow::Continue
                }
            };
            if let Flow::Exit = flow {
                break;
            }
        }

        writeln!(
            self.output,
            "Exiting. Table after operations saved to '{}'",
            self.store.path().display()
        )?;
        self.output.flush()?;
        Ok(())
    }

    fn dispatch(&mut self, choice: Choice, table: &mut Table) -> Result<Flow> {
        match choice {
            Choice::Create => self.create(table),
            Choice::Read => self.read(table),
            Choice::Update => self.update(table),
            Choice::Delete => self.delete(table),
            Choice::Exit => Ok(Flow::Exit),
        }
    }

    fn create(&mut self, table: &mut Table) -> Result<Flow> {
        let mut values: Row = Vec::with_capacity(table.columns().len());
        for column in table.columns() {
            let Some(value) = self.prompt(&format!("Enter value for {}: ", column))? else {
                return Ok(Flow::Exit);
            };
            values.push(value);
        }

        if let Err(e) = table.create(values) {
            warn!(error = %e, "create rejected");
            writeln!(self.output, "Could not add row: {}", e)?;
            return Ok(Flow::Continue);
        }
        self.save(table)?;
        Ok(Flow::Continue)
    }

    fn read(&mut self, table: &Table) -> Result<Flow> {
        let Some(key) = self.prompt("Enter the country name: ")? else {
            return Ok(Flow::Exit);
        };
        let hits = table.read(&key);
        if hits.is_empty() {
            writeln!(self.output, "No rows found for '{}'", key)?;
        } else {
            table.write_rows(&mut self.output, &hits)?;
        }
        Ok(Flow::Continue)
    }

    fn update(&mut self, table: &mut Table) -> Result<Flow> {
        let Some(key) = self.prompt("Enter the country name for the update: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(column) = self.prompt("Enter the column name to update: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(value) = self.prompt("Enter the new value: ")? else {
            return Ok(Flow::Exit);
        };

        if table.column_index(&column).is_none() {
            writeln!(self.output, "Unknown column '{}'", column)?;
        } else if table.update(&key, &column, &value) == 0 {
            writeln!(self.output, "No rows matched '{}'", key)?;
        }
        self.save(table)?;
        Ok(Flow::Continue)
    }

    fn delete(&mut self, table: &mut Table) -> Result<Flow> {
        let Some(key) = self.prompt("Enter the country name to delete: ")? else {
            return Ok(Flow::Exit);
        };
        if table.delete(&key) == 0 {
            writeln!(self.output, "No rows matched '{}'", key)?;
        }
        self.save(table)?;
        Ok(Flow::Continue)
    }

    fn save(&self, table: &Table) -> Result<()> {
        self.store
            .save(table)
            .with_context(|| format!("saving table to {}", self.store.path().display()))
    }

    /// Prints `msg`, reads one line and strips the line ending. `None` once
    /// input is exhausted.
    fn prompt(&mut self, msg: &str) -> Result<Option<String>> {
        write!(self.output, "{}", msg)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.strip_suffix('\n').unwrap_or(line.as_str());
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(Some(trimmed.to_string()))
    }
}
