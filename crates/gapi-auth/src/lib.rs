//! Service-account authentication for Google APIs.

pub mod client;
pub mod error;
pub mod service_account;
pub mod token;

pub use client::AuthorizedClient;
pub use error::AuthError;
pub use service_account::{read_service_account_key, ServiceAccountAuth, ServiceAccountKey};
pub use token::{StaticToken, TokenSource};

pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
pub const SPREADSHEETS_READONLY_SCOPE: &str =
    "https://www.googleapis.com/auth/spreadsheets.readonly";
