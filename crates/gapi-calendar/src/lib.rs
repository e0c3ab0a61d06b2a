//! Google Calendar client.
//!
//! Calendars and events are two independent services over the same
//! authorized HTTP client. Event dates go through [`event_time`] before
//! anything is sent.

pub mod calendars;
pub mod error;
pub mod event_time;
pub mod events;
mod response;
pub mod types;

pub use calendars::CalendarsService;
pub use error::CalendarError;
pub use event_time::{
    normalize, validate, EventTime, EventTimeBoundary, ValidationErrors, WireDateTime,
    WireTimeError, DEFAULT_TIME_ZONE,
};
pub use events::EventsService;
pub use types::{Calendar, CalendarPatch, Event, EventStatus, NewEvent};

pub(crate) const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
