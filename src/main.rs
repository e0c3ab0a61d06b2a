use std::sync::Arc;

use anyhow::{Context, Result};
use gapi_auth::{AuthorizedClient, ServiceAccountAuth};
use gapi_calendar::{CalendarsService, EventsService};
use gapi_sheets::SpreadsheetsService;

#[tokio::main]
async fn main() -> Result<()> {
    gapi_core::init()?;

    let (config, _) = gapi_core::Config::load_validated().context("Failed to load configuration")?;
    let credentials = &config.credentials;

    let calendar_auth = ServiceAccountAuth::from_key_file(
        &credentials.key_path,
        &credentials.project_id,
        config.calendar.scopes.iter().cloned(),
    )
    .await
    .context("Failed to load calendar credentials")?;
    tracing::info!(client_email = calendar_auth.client_email(), "Authenticated");

    let calendar_client = AuthorizedClient::new(Arc::new(calendar_auth));
    let calendars = CalendarsService::new(calendar_client.clone());
    let events = EventsService::new(calendar_client).with_time_zone(config.calendar.tz()?);

    for calendar in calendars.list().await? {
        let count = events.list(&calendar.id).await?.len();
        println!("{}  {}  ({} events)", calendar.id, calendar.summary, count);
    }

    if let Some(spreadsheet_id) = &config.sheets.spreadsheet_id {
        let sheets_auth = ServiceAccountAuth::from_key_file(
            &credentials.key_path,
            &credentials.project_id,
            config.sheets.scopes.iter().cloned(),
        )
        .await
        .context("Failed to load sheets credentials")?;
        let sheets = SpreadsheetsService::new(AuthorizedClient::new(Arc::new(sheets_auth)));

        println!("\n{}", sheets.title(spreadsheet_id).await?);
        for title in sheets.sheet_titles(spreadsheet_id).await? {
            println!("  {}", title);
        }
    }

    Ok(())
}
