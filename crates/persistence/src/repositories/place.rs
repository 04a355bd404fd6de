//! Place and booking repository for database operations.

use chrono::{NaiveDate, NaiveTime};
use domain::models::place::{AvailableDays, Place, TimeSlot};
use domain::services::free_slots::{fits_in_free_slot, free_slots_for_date};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::entities::{BookingEntity, PlaceEntity};
use crate::metrics::QueryTimer;

const PLACE_COLUMNS: &str = r#"
    place_id, company_id, place_name, available_time_start, available_time_end,
    available_days, is_active, deactivation_reason, created_at
"#;

/// Input for creating or rewriting a place.
#[derive(Debug, Clone)]
pub struct PlaceValues<'a> {
    pub place_name: &'a str,
    pub available_time_start: NaiveTime,
    pub available_time_end: NaiveTime,
    pub available_days: &'a AvailableDays,
}

/// Input for a booking.
#[derive(Debug, Clone)]
pub struct NewBooking<'a> {
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub booked_by: Uuid,
    pub purpose: Option<&'a str>,
}

/// Result of a booking attempt.
#[derive(Debug)]
pub enum BookingOutcome {
    Booked(BookingEntity),
    PlaceNotFound,
    /// The requested time does not fit inside a single free slot.
    SlotUnavailable,
}

/// Repository for places and their bookings.
#[derive(Clone)]
pub struct PlaceRepository {
    pool: PgPool,
}

impl PlaceRepository {
    /// Creates a new PlaceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a place.
    pub async fn create(
        &self,
        company_id: Uuid,
        values: PlaceValues<'_>,
    ) -> Result<PlaceEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_place");
        let sql = format!(
            r#"
            INSERT INTO places (company_id, place_name, available_time_start, available_time_end, available_days)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            PLACE_COLUMNS
        );
        let result = sqlx::query_as::<_, PlaceEntity>(&sql)
            .bind(company_id)
            .bind(values.place_name)
            .bind(values.available_time_start)
            .bind(values.available_time_end)
            .bind(Json(values.available_days))
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find a place by ID, active or not.
    pub async fn find_by_id(&self, place_id: Uuid) -> Result<Option<PlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_place_by_id");
        let sql = format!("SELECT {} FROM places WHERE place_id = $1", PLACE_COLUMNS);
        let result = sqlx::query_as::<_, PlaceEntity>(&sql)
            .bind(place_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List active places of a company by name.
    pub async fn list_active(&self, company_id: Uuid) -> Result<Vec<PlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_places");
        let sql = format!(
            r#"
            SELECT {}
            FROM places
            WHERE company_id = $1 AND is_active = true
            ORDER BY place_name
            "#,
            PLACE_COLUMNS
        );
        let result = sqlx::query_as::<_, PlaceEntity>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Rewrite an active place's name, window and days.
    pub async fn update(
        &self,
        place_id: Uuid,
        values: PlaceValues<'_>,
    ) -> Result<Option<PlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_place");
        let sql = format!(
            r#"
            UPDATE places
            SET place_name = $2,
                available_time_start = $3,
                available_time_end = $4,
                available_days = $5
            WHERE place_id = $1 AND is_active = true
            RETURNING {}
            "#,
            PLACE_COLUMNS
        );
        let result = sqlx::query_as::<_, PlaceEntity>(&sql)
            .bind(place_id)
            .bind(values.place_name)
            .bind(values.available_time_start)
            .bind(values.available_time_end)
            .bind(Json(values.available_days))
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Soft delete a place. Returns `None` if it was already inactive.
    pub async fn deactivate(
        &self,
        place_id: Uuid,
        reason: &str,
    ) -> Result<Option<PlaceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_place");
        let sql = format!(
            r#"
            UPDATE places
            SET is_active = false, deactivation_reason = $2
            WHERE place_id = $1 AND is_active = true
            RETURNING {}
            "#,
            PLACE_COLUMNS
        );
        let result = sqlx::query_as::<_, PlaceEntity>(&sql)
            .bind(place_id)
            .bind(reason)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Bookings of a place on a date, by start time.
    pub async fn bookings_on(
        &self,
        place_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BookingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_place_bookings_on_date");
        let mut conn = self.pool.acquire().await?;
        let result = select_bookings(&mut conn, place_id, date).await;
        timer.record();
        result
    }

    /// Book a place if the interval fits inside one free slot.
    ///
    /// The place row is locked for the duration of the check and insert so
    /// concurrent bookings of the same place are serialized.
    pub async fn create_booking(
        &self,
        place_id: Uuid,
        booking: NewBooking<'_>,
    ) -> Result<BookingOutcome, sqlx::Error> {
        let timer = QueryTimer::new("create_place_booking");

        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "SELECT {} FROM places WHERE place_id = $1 FOR UPDATE",
            PLACE_COLUMNS
        );
        let Some(place) = sqlx::query_as::<_, PlaceEntity>(&sql)
            .bind(place_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(BookingOutcome::PlaceNotFound);
        };
        let place: Place = place.into();

        let taken: Vec<TimeSlot> = select_bookings(&mut tx, place_id, booking.booking_date)
            .await?
            .iter()
            .map(|b| TimeSlot::new(b.start_time, b.end_time))
            .collect();
        let free = free_slots_for_date(&place, booking.booking_date, &taken);
        let requested = TimeSlot::new(booking.start_time, booking.end_time);

        if !fits_in_free_slot(&free, &requested) {
            tracing::debug!(
                %place_id,
                date = %booking.booking_date,
                free_slots = free.len(),
                "Requested interval does not fit a free slot"
            );
            return Ok(BookingOutcome::SlotUnavailable);
        }

        let created = sqlx::query_as::<_, BookingEntity>(
            r#"
            INSERT INTO place_bookings (place_id, booking_date, start_time, end_time, booked_by, purpose)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, place_id, booking_date, start_time, end_time, booked_by, purpose, created_at
            "#,
        )
        .bind(place_id)
        .bind(booking.booking_date)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.booked_by)
        .bind(booking.purpose)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(BookingOutcome::Booked(created))
    }
}

async fn select_bookings(
    conn: &mut PgConnection,
    place_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<BookingEntity>, sqlx::Error> {
    sqlx::query_as::<_, BookingEntity>(
        r#"
        SELECT id, place_id, booking_date, start_time, end_time, booked_by, purpose, created_at
        FROM place_bookings
        WHERE place_id = $1 AND booking_date = $2
        ORDER BY start_time
        "#,
    )
    .bind(place_id)
    .bind(date)
    .fetch_all(&mut *conn)
    .await
}
