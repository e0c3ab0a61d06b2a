//! Events: insert, list, delete.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use gapi_auth::AuthorizedClient;
use reqwest::Method;
use tracing::instrument;

use crate::error::CalendarError;
use crate::event_time::{resolve_span, DEFAULT_TIME_ZONE};
use crate::response::{handle_empty, handle_response};
use crate::types::*;
use crate::CALENDAR_API_BASE;

/// Client for the events of any calendar, independent of [`crate::CalendarsService`].
#[derive(Clone)]
pub struct EventsService {
    client: AuthorizedClient,
    base_url: String,
    time_zone: Tz,
}

impl EventsService {
    pub fn new(client: AuthorizedClient) -> Self {
        Self {
            client,
            base_url: CALENDAR_API_BASE.to_string(),
            time_zone: DEFAULT_TIME_ZONE,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Zone attached to the start and end of inserted events.
    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id),
        )
    }

    /// Create a confirmed event and return its id.
    ///
    /// The start and end are validated first; on failure nothing is sent.
    #[instrument(skip(self, event), fields(summary = %event.summary), level = "info")]
    pub async fn insert(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<String, CalendarError> {
        let (start, end) = resolve_span(&event.start, &event.end).map_err(|errors| {
            tracing::warn!(%errors, "Rejected event with invalid dates");
            CalendarError::Validation(errors)
        })?;

        let body = ApiEventInsert {
            summary: &event.summary,
            description: event.description.as_deref(),
            location: event.location.as_deref(),
            start: start.normalize(self.time_zone),
            end: end.normalize(self.time_zone),
            status: EventStatus::Confirmed.as_api_str(),
        };

        let response = self
            .client
            .request(Method::POST, &self.events_url(calendar_id))
            .await?
            .json(&body)
            .send()
            .await?;

        let created: ApiId = handle_response(response).await?;
        Ok(created.id)
    }

    /// List every event of a calendar.
    pub async fn list(&self, calendar_id: &str) -> Result<Vec<Event>, CalendarError> {
        self.list_by_time_min(calendar_id, beginning_of_time()).await
    }

    /// List events ending after `time_min`.
    #[instrument(skip(self), level = "info")]
    pub async fn list_by_time_min(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
    ) -> Result<Vec<Event>, CalendarError> {
        let url = self.events_url(calendar_id);
        let time_min = time_min.to_rfc3339();
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .request(Method::GET, &url)
                .await?
                .query(&[("timeMin", time_min.as_str())]);
            if let Some(pt) = &page_token {
                request = request.query(&[("pageToken", pt)]);
            }

            let page: EventListResponse = handle_response(request.send().await?).await?;
            for item in page.items {
                if item.is_cancelled_occurrence() {
                    tracing::debug!(id = %item.id, "Skipping cancelled occurrence");
                    continue;
                }
                events.push(Event::try_from(item)?);
            }

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    #[instrument(skip(self), level = "info")]
    pub async fn delete(&self, calendar_id: &str, event_id: &str) -> Result<(), CalendarError> {
        let url = format!(
            "{}/{}",
            self.events_url(calendar_id),
            urlencoding::encode(event_id),
        );

        let response = self
            .client
            .request(Method::DELETE, &url)
            .await?
            .send()
            .await?;

        handle_empty(response).await
    }
}

/// Lower bound used when listing "all" events.
fn beginning_of_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
