pub mod csv_store;
pub mod store;
pub mod types;

pub use csv_store::CsvStore;
pub use store::Table;
pub use types::{KeyPolicy, Row, TableError};
