//! Place and booking entities.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::place::{AvailableDays, Booking, Place};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the places table.
#[derive(Debug, Clone, FromRow)]
pub struct PlaceEntity {
    pub place_id: Uuid,
    pub company_id: Uuid,
    pub place_name: String,
    pub available_time_start: NaiveTime,
    pub available_time_end: NaiveTime,
    pub available_days: Json<AvailableDays>,
    pub is_active: bool,
    pub deactivation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PlaceEntity> for Place {
    fn from(entity: PlaceEntity) -> Self {
        Self {
            place_id: entity.place_id,
            company_id: entity.company_id,
            place_name: entity.place_name,
            available_time_start: entity.available_time_start,
            available_time_end: entity.available_time_end,
            available_days: entity.available_days.0,
            is_active: entity.is_active,
            deactivation_reason: entity.deactivation_reason,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the place_bookings table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingEntity {
    pub id: Uuid,
    pub place_id: Uuid,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub booked_by: Uuid,
    pub purpose: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookingEntity> for Booking {
    fn from(entity: BookingEntity) -> Self {
        Self {
            id: entity.id,
            place_id: entity.place_id,
            booking_date: entity.booking_date,
            start_time: entity.start_time,
            end_time: entity.end_time,
            booked_by: entity.booked_by,
            purpose: entity.purpose,
            created_at: entity.created_at,
        }
    }
}
