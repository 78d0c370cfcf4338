// src/scrape.rs

use std::io::{self, Write};
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::Config;
use crate::extract::{extract_tables, flatten, write_preview};
use crate::fetch::{fetch_page, Fetch, FetchError};
use crate::table::{Table, TableError};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Cannot build a table from the page: {0}")]
    Table(#[from] TableError),
    #[error("writing scrape preview: {0}")]
    Io(#[from] io::Error),
}

/// Fetch the configured page, echo every extracted row to `out`, and build
/// the table the interactive loop works on.
#[instrument(level = "info", skip_all, fields(url = %cfg.url, class = %cfg.table_class))]
pub fn scrape_table<W: Write>(
    fetcher: &dyn Fetch,
    cfg: &Config,
    out: &mut W,
) -> Result<Table, ScrapeError> {
    let html = fetch_page(fetcher, &cfg.url)?;

    let tables = extract_tables(&html, &cfg.table_class);
    write_preview(out, &tables)?;

    let table = Table::from_rows(flatten(tables), &cfg.key_column)?.with_key_policy(cfg.key_policy);
    info!(
        columns = table.columns().len(),
        rows = table.len(),
        "table ready"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::tests::GDP_PAGE;
    use crate::fetch::tests::StaticFetcher;
    use crate::table::KeyPolicy;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,gdpscraper=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    #[test]
    fn scrapes_previews_and_tabulates() {
        init_test_logging();
        let fetcher = StaticFetcher::new(200, GDP_PAGE);
        let mut out = Vec::new();
        let table = scrape_table(&fetcher, &Config::default(), &mut out).unwrap();

        assert_eq!(table.columns(), &["Rank", "Country", "GDP"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.read("Japan").len(), 1);

        let preview = String::from_utf8(out).unwrap();
        assert!(preview.starts_with("Rank | Country | GDP\n"));
        assert_eq!(preview.matches("---").count(), 2);
    }

    #[test]
    fn key_policy_is_carried_onto_the_table() {
        init_test_logging();
        let fetcher = StaticFetcher::new(200, GDP_PAGE);
        let cfg = Config {
            key_policy: KeyPolicy::Unique,
            ..Config::default()
        };
        let mut table = scrape_table(&fetcher, &cfg, &mut Vec::<u8>::new()).unwrap();
        let dup = vec!["9".to_string(), "Japan".to_string(), "1".to_string()];
        assert_eq!(
            table.create(dup),
            Err(TableError::DuplicateKey("Japan".into()))
        );
    }

    #[test]
    fn bad_status_stops_before_extraction() {
        init_test_logging();
        let fetcher = StaticFetcher::new(404, GDP_PAGE);
        let mut out = Vec::<u8>::new();
        let err = scrape_table(&fetcher, &Config::default(), &mut out).unwrap_err();
        assert!(matches!(err, ScrapeError::Fetch(FetchError::Status(404))));
        assert_eq!(
            err.to_string(),
            "Failed to retrieve the page. Status code: 404"
        );
        assert!(out.is_empty());
    }

    #[test]
    fn page_without_matching_tables_is_reported() {
        init_test_logging();
        let fetcher = StaticFetcher::new(200, "<html><body><p>maintenance</p></body></html>");
        let err = scrape_table(&fetcher, &Config::default(), &mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, ScrapeError::Table(TableError::NoHeader)));
    }

    #[test]
    fn page_without_key_column_is_reported() {
        init_test_logging();
        let fetcher = StaticFetcher::new(
            200,
            r#"<table class="ptable2"><tr><th>Rank</th><th>Nation</th></tr></table>"#,
        );
        let err = scrape_table(&fetcher, &Config::default(), &mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::Table(TableError::MissingKeyColumn(_))
        ));
    }
}
