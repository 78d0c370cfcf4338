pub mod config;
pub mod controller;
pub mod extract;
pub mod fetch;
pub mod scrape;
pub mod table;

pub use config::Config;
pub use controller::Controller;
pub use fetch::{fetch_page, Fetch, FetchError, HttpFetcher, Page};
pub use scrape::{scrape_table, ScrapeError};
pub use table::{CsvStore, KeyPolicy, Row, Table, TableError};
