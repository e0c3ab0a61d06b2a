//! Start and end boundaries of calendar events.
//!
//! A boundary is either a whole-day date (all-day events) or a precise
//! instant (timed events). Caller input arrives as [`EventTimeBoundary`],
//! where both, one, or neither may be filled in; [`validate`] reports every
//! violation at once, and only a valid boundary becomes an [`EventTime`],
//! which is what gets serialized into a [`WireDateTime`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Zone attached to every boundary sent to the Calendar API unless overridden.
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::Europe::Amsterdam;

pub const START_FIELD: &str = "start date";
pub const END_FIELD: &str = "end date";
const BOUNDARY_FIELD: &str = "date";

const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

const BOTH_SET: &str = "cannot specify both a whole-day date and a precise instant";
const NONE_SET: &str = "at least one must be present: a whole-day date or a precise instant";

/// Unvalidated start or end of an event, as supplied by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTimeBoundary {
    pub whole_day_date: Option<NaiveDate>,
    pub precise_instant: Option<DateTime<FixedOffset>>,
}

impl EventTimeBoundary {
    pub fn whole_day(date: NaiveDate) -> Self {
        Self {
            whole_day_date: Some(date),
            precise_instant: None,
        }
    }

    pub fn precise(instant: DateTime<FixedOffset>) -> Self {
        Self {
            whole_day_date: None,
            precise_instant: Some(instant),
        }
    }

    fn check(&self, field: &str, errors: &mut ValidationErrors) {
        let both = self.whole_day_date.is_some() && self.precise_instant.is_some();
        let neither = self.whole_day_date.is_none() && self.precise_instant.is_none();
        errors.check(!both, field, BOTH_SET);
        errors.check(!neither, field, NONE_SET);
    }

    /// Turn the boundary into an [`EventTime`], reporting violations under `field`.
    ///
    /// # Errors
    /// Fails when both or neither representation is set.
    pub fn resolve(&self, field: &str) -> Result<EventTime, ValidationErrors> {
        match (self.whole_day_date, self.precise_instant) {
            (Some(date), None) => Ok(EventTime::WholeDay(date)),
            (None, Some(instant)) => Ok(EventTime::Precise(instant)),
            _ => {
                let mut errors = ValidationErrors::default();
                self.check(field, &mut errors);
                Err(errors)
            }
        }
    }

    /// Serialize an unvalidated boundary.
    ///
    /// # Errors
    /// An invalid boundary is rejected rather than serialized with an empty
    /// date field.
    pub fn normalize(&self, zone: Tz) -> Result<WireDateTime, ValidationErrors> {
        self.resolve(BOUNDARY_FIELD).map(|time| time.normalize(zone))
    }
}

impl TryFrom<EventTimeBoundary> for EventTime {
    type Error = ValidationErrors;

    fn try_from(boundary: EventTimeBoundary) -> Result<Self, Self::Error> {
        boundary.resolve(BOUNDARY_FIELD)
    }
}

/// A validated event boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    WholeDay(NaiveDate),
    Precise(DateTime<FixedOffset>),
}

impl EventTime {
    pub fn is_whole_day(&self) -> bool {
        matches!(self, Self::WholeDay(_))
    }

    /// Serialize for the Calendar API with `zone` attached.
    pub fn normalize(&self, zone: Tz) -> WireDateTime {
        match self {
            Self::WholeDay(date) => WireDateTime {
                date: Some(date.format(WIRE_DATE_FORMAT).to_string()),
                date_time: None,
                time_zone: zone.name().to_string(),
            },
            Self::Precise(instant) => WireDateTime {
                date: None,
                date_time: Some(instant.to_rfc3339_opts(SecondsFormat::Secs, true)),
                time_zone: zone.name().to_string(),
            },
        }
    }

    /// Parse a boundary returned by the API. A `date` takes precedence.
    ///
    /// # Errors
    /// Fails when the value is missing or unparseable.
    pub fn from_wire(wire: &WireDateTime) -> Result<Self, WireTimeError> {
        if let Some(date) = wire.date.as_deref().filter(|d| !d.is_empty()) {
            return NaiveDate::parse_from_str(date, WIRE_DATE_FORMAT)
                .map(Self::WholeDay)
                .map_err(|source| WireTimeError::Date {
                    value: date.to_string(),
                    source,
                });
        }
        if let Some(date_time) = wire.date_time.as_deref().filter(|d| !d.is_empty()) {
            return DateTime::parse_from_rfc3339(date_time)
                .map(Self::Precise)
                .map_err(|source| WireTimeError::DateTime {
                    value: date_time.to_string(),
                    source,
                });
        }
        Err(WireTimeError::Missing)
    }
}

/// Why a boundary returned by the API could not be read.
#[derive(Error, Debug)]
pub enum WireTimeError {
    #[error("invalid date {value:?}: {source}")]
    Date {
        value: String,
        source: chrono::ParseError,
    },

    #[error("invalid dateTime {value:?}: {source}")]
    DateTime {
        value: String,
        source: chrono::ParseError,
    },

    #[error("neither date nor dateTime present")]
    Missing,
}

/// The `{date | dateTime, timeZone}` object of the Calendar API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default)]
    pub time_zone: String,
}

/// Field name to messages, accumulated across all checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Record `message` under `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self
            .errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&summary)
    }
}

impl std::error::Error for ValidationErrors {}

/// Check that `start` and `end` each carry exactly one representation.
///
/// Every check runs, so a caller with several mistakes sees all of them.
///
/// # Errors
/// Returns every violation, keyed by `"start date"` / `"end date"`.
pub fn validate(
    start: &EventTimeBoundary,
    end: &EventTimeBoundary,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    start.check(START_FIELD, &mut errors);
    end.check(END_FIELD, &mut errors);
    errors.into_result()
}

/// Serialize a validated boundary with `zone` attached.
pub fn normalize(boundary: &EventTime, zone: Tz) -> WireDateTime {
    boundary.normalize(zone)
}

/// [`validate`] both boundaries, then resolve them.
///
/// # Errors
/// Same as [`validate`].
pub fn resolve_span(
    start: &EventTimeBoundary,
    end: &EventTimeBoundary,
) -> Result<(EventTime, EventTime), ValidationErrors> {
    validate(start, end)?;
    Ok((start.resolve(START_FIELD)?, end.resolve(END_FIELD)?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instant(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn both() -> EventTimeBoundary {
        EventTimeBoundary {
            whole_day_date: Some(date(2024, 6, 1)),
            precise_instant: Some(instant("2024-06-01T10:00:00+02:00")),
        }
    }

    #[test]
    fn test_whole_day_boundaries_validate() {
        let start = EventTimeBoundary::whole_day(date(2024, 6, 1));
        let end = EventTimeBoundary::whole_day(date(2024, 6, 2));
        assert!(validate(&start, &end).is_ok());

        let start = EventTime::try_from(start).unwrap();
        assert_eq!(
            normalize(&start, DEFAULT_TIME_ZONE),
            WireDateTime {
                date: Some("2024-06-01".into()),
                date_time: None,
                time_zone: "Europe/Amsterdam".into(),
            }
        );
    }

    #[test]
    fn test_whole_day_normalizes_to_date_only() {
        let start = EventTimeBoundary::whole_day(date(2024, 6, 1));
        let wire = start.normalize(DEFAULT_TIME_ZONE).unwrap();

        assert_eq!(wire.date.as_deref(), Some("2024-06-01"));
        assert_eq!(wire.date_time, None);
        assert_eq!(wire.time_zone, "Europe/Amsterdam");
    }

    #[test]
    fn test_precise_instant_validates_and_normalizes_to_rfc3339() {
        let start = EventTimeBoundary::precise(instant("2024-06-01T10:00:00+02:00"));
        let end = EventTimeBoundary::precise(instant("2024-06-01T12:30:00+02:00"));
        assert!(validate(&start, &end).is_ok());

        let wire = start.normalize(DEFAULT_TIME_ZONE).unwrap();
        assert_eq!(wire.date, None);
        assert_eq!(wire.date_time.as_deref(), Some("2024-06-01T10:00:00+02:00"));
        assert_eq!(wire.time_zone, "Europe/Amsterdam");
    }

    #[test]
    fn test_utc_instant_uses_z_suffix() {
        let wire = EventTime::Precise(instant("2024-06-01T08:00:00Z")).normalize(chrono_tz::UTC);
        assert_eq!(wire.date_time.as_deref(), Some("2024-06-01T08:00:00Z"));
        assert_eq!(wire.time_zone, "UTC");
    }

    #[test]
    fn test_both_set_is_rejected() {
        let end = EventTimeBoundary::whole_day(date(2024, 6, 2));
        let errors = validate(&both(), &end).unwrap_err();

        let messages = errors.messages(START_FIELD).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("cannot specify both"));
        assert!(errors.messages(END_FIELD).is_none());
    }

    #[test]
    fn test_neither_set_is_rejected() {
        let start = EventTimeBoundary::whole_day(date(2024, 6, 1));
        let errors = validate(&start, &EventTimeBoundary::default()).unwrap_err();

        let messages = errors.messages(END_FIELD).unwrap();
        assert!(messages[0].contains("at least one must be present"));
        assert!(errors.messages(START_FIELD).is_none());
    }

    #[test]
    fn test_violations_on_both_fields_are_all_reported() {
        let errors = validate(&both(), &EventTimeBoundary::default()).unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![END_FIELD, START_FIELD]);
        let summary = errors.to_string();
        assert!(summary.contains("start date: cannot specify both"));
        assert!(summary.contains("end date: at least one must be present"));
    }

    #[test]
    fn test_normalize_fails_fast_on_empty_boundary() {
        let result = EventTimeBoundary::default().normalize(DEFAULT_TIME_ZONE);
        let errors = result.unwrap_err();
        assert!(errors.to_string().contains("at least one must be present"));
    }

    #[test]
    fn test_normalize_fails_fast_on_double_boundary() {
        assert!(both().normalize(DEFAULT_TIME_ZONE).is_err());
        assert!(EventTime::try_from(both()).is_err());
    }

    #[test]
    fn test_resolve_span() {
        let start = EventTimeBoundary::whole_day(date(2024, 6, 1));
        let end = EventTimeBoundary::precise(instant("2024-06-02T09:00:00+02:00"));
        let (start, end) = resolve_span(&start, &end).unwrap();
        assert!(start.is_whole_day());
        assert!(!end.is_whole_day());
    }

    #[test]
    fn test_wire_serialization_omits_unset_field() {
        let wire = EventTime::WholeDay(date(2024, 6, 1)).normalize(DEFAULT_TIME_ZONE);
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"date": "2024-06-01", "timeZone": "Europe/Amsterdam"})
        );
    }

    #[test]
    fn test_from_wire() {
        let all_day = WireDateTime {
            date: Some("2024-02-01".into()),
            ..Default::default()
        };
        assert_eq!(
            EventTime::from_wire(&all_day).unwrap(),
            EventTime::WholeDay(date(2024, 2, 1))
        );

        let timed = WireDateTime {
            date_time: Some("2024-02-01T10:00:00Z".into()),
            ..Default::default()
        };
        assert!(!EventTime::from_wire(&timed).unwrap().is_whole_day());

        assert!(matches!(
            EventTime::from_wire(&WireDateTime::default()),
            Err(WireTimeError::Missing)
        ));
        let broken = WireDateTime {
            date: Some("01/02/2024".into()),
            ..Default::default()
        };
        let err = EventTime::from_wire(&broken).unwrap_err();
        assert!(matches!(err, WireTimeError::Date { .. }));
        assert!(err.to_string().contains("01/02/2024"));
    }
}
