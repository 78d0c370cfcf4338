// src/extract.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::io::{self, Write};
use tracing::{debug, instrument, trace};

use crate::table::Row;

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("table selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").expect("cell selector"));

/// Rows of one matching `<table>`, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedTable {
    pub rows: Vec<Row>,
}

/// Every `<table>` whose class list contains `class`, each reduced to rows
/// of trimmed cell text (`th` and `td` alike).
#[instrument(level = "debug", skip(html), fields(html_len = html.len()))]
pub fn extract_tables(html: &str, class: &str) -> Vec<ScrapedTable> {
    let doc = Html::parse_document(html);
    let tables: Vec<ScrapedTable> = doc
        .select(&TABLE)
        .filter(|t| t.value().classes().any(|c| c == class))
        .map(|t| ScrapedTable {
            rows: t.select(&ROW).map(row_cells).collect(),
        })
        .collect();
    debug!(tables = tables.len(), "matched tables");
    tables
}

/// All rows of all matching tables flattened, first table first.
pub fn extract_rows(html: &str, class: &str) -> Vec<Row> {
    flatten(extract_tables(html, class))
}

pub fn flatten(tables: Vec<ScrapedTable>) -> Vec<Row> {
    tables.into_iter().flat_map(|t| t.rows).collect()
}

fn row_cells(row: ElementRef<'_>) -> Row {
    let cells: Row = row
        .select(&CELL)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect();
    trace!(?cells, "row");
    cells
}

/// Echo what was scraped: one line per row, cells joined by ` | `, and a
/// `---` line closing each table.
pub fn write_preview<W: Write>(out: &mut W, tables: &[ScrapedTable]) -> io::Result<()> {
    for table in tables {
        for row in &table.rows {
            writeln!(out, "{}", row.join(" | "))?;
        }
        writeln!(out, "---")?;
    }
    Ok(())
}
