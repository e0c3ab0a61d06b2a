//! Google Sheets client (read access to spreadsheet metadata and values).

pub mod error;
pub mod spreadsheets;
pub mod types;

pub use error::SheetsError;
pub use spreadsheets::SpreadsheetsService;
pub use types::{Row, ValueRenderOption};
