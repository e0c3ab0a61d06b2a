//! Calendars: create, read, patch, delete, list.

use gapi_auth::AuthorizedClient;
use reqwest::Method;
use tracing::instrument;

use crate::error::CalendarError;
use crate::response::{handle_empty, handle_response};
use crate::types::*;
use crate::CALENDAR_API_BASE;

/// Client for calendar resources, independent of [`crate::EventsService`].
#[derive(Clone)]
pub struct CalendarsService {
    client: AuthorizedClient,
    base_url: String,
}

impl CalendarsService {
    pub fn new(client: AuthorizedClient) -> Self {
        Self {
            client,
            base_url: CALENDAR_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a secondary calendar and return its id.
    #[instrument(skip(self), level = "info")]
    pub async fn insert(&self, summary: &str) -> Result<String, CalendarError> {
        let url = format!("{}/calendars", self.base_url);

        let response = self
            .client
            .request(Method::POST, &url)
            .await?
            .json(&ApiCalendarInsert { summary })
            .send()
            .await?;

        let created: ApiId = handle_response(response).await?;
        tracing::info!(calendar_id = %created.id, "Created calendar");
        Ok(created.id)
    }

    /// Return the summary (title) of a calendar.
    #[instrument(skip(self), level = "info")]
    pub async fn get(&self, calendar_id: &str) -> Result<String, CalendarError> {
        let url = format!(
            "{}/calendars/{}",
            self.base_url,
            urlencoding::encode(calendar_id),
        );

        let response = self.client.request(Method::GET, &url).await?.send().await?;

        let calendar: ApiCalendar = handle_response(response).await?;
        Ok(calendar.summary.unwrap_or_default())
    }

    /// Update this account's calendar-list entry for `calendar_id`.
    ///
    /// Always installs the default popup reminder (90 minutes) and sets the
    /// description and location from `patch`. Returns the entry's summary.
    #[instrument(skip(self, patch), level = "info")]
    pub async fn patch(
        &self,
        calendar_id: &str,
        patch: &CalendarPatch,
    ) -> Result<String, CalendarError> {
        let url = format!(
            "{}/users/me/calendarList/{}",
            self.base_url,
            urlencoding::encode(calendar_id),
        );

        let body = ApiCalendarListPatch {
            id: calendar_id,
            description: patch.description.as_deref(),
            location: patch.location.as_deref(),
            default_reminders: vec![ApiReminder::default_popup()],
        };

        let response = self
            .client
            .request(Method::PATCH, &url)
            .await?
            .json(&body)
            .send()
            .await?;

        let entry: ApiCalendar = handle_response(response).await?;
        Ok(entry.summary.unwrap_or_default())
    }

    /// Delete a secondary calendar.
    #[instrument(skip(self), level = "info")]
    pub async fn delete(&self, calendar_id: &str) -> Result<(), CalendarError> {
        let url = format!(
            "{}/calendars/{}",
            self.base_url,
            urlencoding::encode(calendar_id),
        );

        let response = self
            .client
            .request(Method::DELETE, &url)
            .await?
            .send()
            .await?;

        handle_empty(response).await
    }

    /// List every calendar on this account's calendar list.
    #[instrument(skip(self), level = "info")]
    pub async fn list(&self) -> Result<Vec<Calendar>, CalendarError> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.request(Method::GET, &url).await?;
            if let Some(pt) = &page_token {
                request = request.query(&[("pageToken", pt)]);
            }

            let page: CalendarListResponse = handle_response(request.send().await?).await?;
            calendars.extend(page.items.into_iter().map(Calendar::from));

            match page.next_page_token {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        tracing::debug!(count = calendars.len(), "Listed calendars");
        Ok(calendars)
    }
}
