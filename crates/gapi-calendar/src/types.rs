//! Calendar API types and data structures.

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::event_time::{EventTime, EventTimeBoundary, WireDateTime};

/// Calendar metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Fields applied to a calendar-list entry alongside the default reminder.
#[derive(Debug, Clone, Default)]
pub struct CalendarPatch {
    pub description: Option<String>,
    pub location: Option<String>,
}

/// Event to be created. Dates are checked before anything is sent.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTimeBoundary,
    pub end: EventTimeBoundary,
}

/// Event as read back from a calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub status: EventStatus,
}

/// Event status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

impl EventStatus {
    pub fn as_api_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Tentative => "tentative",
            Self::Cancelled => "cancelled",
        }
    }

    fn from_api(status: Option<&str>) -> Self {
        match status {
            Some("tentative") => Self::Tentative,
            Some("cancelled") => Self::Cancelled,
            _ => Self::Confirmed,
        }
    }
}

/// Reminder applied to calendars patched through this client.
pub const DEFAULT_REMINDER_METHOD: &str = "popup";
pub const DEFAULT_REMINDER_MINUTES: u32 = 90;

// API Request Types

#[derive(Debug, Serialize)]
pub(crate) struct ApiCalendarInsert<'a> {
    pub summary: &'a str,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiReminder {
    pub method: String,
    pub minutes: u32,
}

impl ApiReminder {
    pub fn default_popup() -> Self {
        Self {
            method: DEFAULT_REMINDER_METHOD.to_string(),
            minutes: DEFAULT_REMINDER_MINUTES,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiCalendarListPatch<'a> {
    pub id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    pub default_reminders: Vec<ApiReminder>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiEventInsert<'a> {
    pub summary: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<&'a str>,
    pub start: WireDateTime,
    pub end: WireDateTime,
    pub status: &'static str,
}

// API Response Types

/// Google Calendar API calendar resource or calendar-list entry.
#[derive(Debug, Deserialize)]
pub struct ApiCalendar {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}

/// API response for calendar list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<ApiCalendar>,
    pub next_page_token: Option<String>,
}

/// Google Calendar API event response.
#[derive(Debug, Deserialize)]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<WireDateTime>,
    pub end: Option<WireDateTime>,
    pub status: Option<String>,
}

/// API response for event list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

/// Minimal response carrying only an id.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiId {
    pub id: String,
}

impl ApiEvent {
    /// A cancelled occurrence of a recurring event. The API reports these
    /// with only an id and the original start, so they have no boundaries.
    pub fn is_cancelled_occurrence(&self) -> bool {
        self.status.as_deref() == Some(EventStatus::Cancelled.as_api_str())
            && (self.start.is_none() || self.end.is_none())
    }
}

impl From<ApiCalendar> for Calendar {
    fn from(api: ApiCalendar) -> Self {
        Self {
            id: api.id,
            summary: api.summary.unwrap_or_default(),
            description: api.description,
            location: api.location,
        }
    }
}

impl TryFrom<ApiEvent> for Event {
    type Error = CalendarError;

    fn try_from(api: ApiEvent) -> Result<Self, Self::Error> {
        let start = parse_boundary(&api.id, "start", api.start.as_ref())?;
        let end = parse_boundary(&api.id, "end", api.end.as_ref())?;

        Ok(Self {
            status: EventStatus::from_api(api.status.as_deref()),
            id: api.id,
            summary: api.summary.unwrap_or_default(),
            description: api.description,
            location: api.location,
            start,
            end,
        })
    }
}

fn parse_boundary(
    event_id: &str,
    which: &str,
    wire: Option<&WireDateTime>,
) -> Result<EventTime, CalendarError> {
    let wire = wire.ok_or_else(|| {
        CalendarError::InvalidEventData(format!("event {} has no {}", event_id, which))
    })?;
    EventTime::from_wire(wire).map_err(|e| {
        CalendarError::InvalidEventData(format!("event {} {}: {}", event_id, which, e))
    })
}
