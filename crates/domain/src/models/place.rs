//! Bookable place domain models.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;
use shared::clock::{hhmm, weekday_key};

const WEEKDAY_KEYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// A half-open time interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True if `other` lies entirely inside this slot.
    pub fn contains(&self, other: &TimeSlot) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Which weekdays a place can be booked on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailableDays(pub BTreeMap<String, bool>);

impl AvailableDays {
    /// Missing days count as closed.
    pub fn is_open(&self, day: Weekday) -> bool {
        self.0.get(weekday_key(day)).copied().unwrap_or(false)
    }

    pub fn validate_keys(&self) -> Result<(), DomainError> {
        match self.0.keys().find(|k| !WEEKDAY_KEYS.contains(&k.as_str())) {
            Some(bad) => Err(DomainError::Validation(format!(
                "Unknown weekday '{}' in available days",
                bad
            ))),
            None => Ok(()),
        }
    }
}

/// A bookable place (meeting room, lab, hall).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Place {
    pub place_id: Uuid,
    pub company_id: Uuid,
    pub place_name: String,
    #[serde(with = "hhmm")]
    pub available_time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub available_time_end: NaiveTime,
    pub available_days: AvailableDays,
    pub is_active: bool,
    pub deactivation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Place {
    pub fn operating_window(&self) -> TimeSlot {
        TimeSlot::new(self.available_time_start, self.available_time_end)
    }

    /// True if the place takes bookings on the given date.
    pub fn is_open_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.available_days.is_open(date.weekday())
    }
}

/// Checks that an operating window is non-empty.
pub fn validate_window(start: NaiveTime, end: NaiveTime) -> Result<(), DomainError> {
    if start < end {
        Ok(())
    } else {
        Err(DomainError::Validation(
            "Available start time must be before end time".to_string(),
        ))
    }
}

/// A booking of a place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Booking {
    pub id: Uuid,
    pub place_id: Uuid,
    pub booking_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub booked_by: Uuid,
    pub purpose: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.start_time, self.end_time)
    }
}

/// Request payload for creating a place.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreatePlaceRequest {
    #[validate(
        length(min = 1, max = 100, message = "Place name must be between 1 and 100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub place_name: String,
    #[serde(with = "hhmm")]
    pub available_time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub available_time_end: NaiveTime,
    pub available_days: AvailableDays,
}

/// Request payload for editing a place.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdatePlaceRequest {
    #[validate(
        length(min = 1, max = 100, message = "Place name must be between 1 and 100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub place_name: Option<String>,
    #[serde(default, with = "optional_hhmm")]
    pub available_time_start: Option<NaiveTime>,
    #[serde(default, with = "optional_hhmm")]
    pub available_time_end: Option<NaiveTime>,
    pub available_days: Option<AvailableDays>,
}

/// Request payload for deactivating a place.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct DeactivatePlaceRequest {
    #[validate(
        length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub reason: String,
}

/// Request payload for booking a place.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateBookingRequest {
    pub booking_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[validate(length(max = 500, message = "Purpose must be at most 500 characters"))]
    pub purpose: Option<String>,
}

/// Query parameters selecting a single date.
#[derive(Debug, Clone, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

/// Free slots of a place on a date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FreeSlotsResponse {
    pub place_id: Uuid,
    pub date: NaiveDate,
    pub open: bool,
    pub slots: Vec<TimeSlot>,
}

/// Response wrapper for place listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListPlacesResponse {
    pub data: Vec<Place>,
}

/// Response wrapper for booking listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListBookingsResponse {
    pub data: Vec<Booking>,
}

mod optional_hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => shared::clock::parse_clock_time(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid time '{}', expected HH:MM", raw))),
        }
    }
}
