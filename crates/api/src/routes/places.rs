//! Place and booking endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::place::{
    validate_window, Booking, CreateBookingRequest, CreatePlaceRequest, DateQuery,
    DeactivatePlaceRequest, FreeSlotsResponse, ListBookingsResponse, ListPlacesResponse, Place,
    TimeSlot, UpdatePlaceRequest,
};
use domain::models::PortalUser;
use domain::services::free_slots::free_slots_for_date;
use domain::DomainError;
use persistence::repositories::{BookingOutcome, NewBooking, PlaceRepository, PlaceValues};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_booking;
use crate::services::authorization::{require_admin, require_role, require_same_company};

async fn load_place(
    repo: &PlaceRepository,
    user: &PortalUser,
    place_id: Uuid,
) -> Result<Place, ApiError> {
    let place: Place = repo
        .find_by_id(place_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))?
        .into();
    require_same_company(user, place.company_id, "Place")?;
    Ok(place)
}

fn booked_slots(bookings: &[Booking]) -> Vec<TimeSlot> {
    bookings.iter().map(Booking::slot).collect()
}

/// Create a place.
///
/// POST /api/v1/places
pub async fn create_place(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreatePlaceRequest>,
) -> Result<(StatusCode, Json<Place>), ApiError> {
    require_admin(&user)?;
    request.validate()?;
    validate_window(request.available_time_start, request.available_time_end)?;
    request.available_days.validate_keys()?;

    let place: Place = PlaceRepository::new(state.pool.clone())
        .create(
            user.company_id,
            PlaceValues {
                place_name: request.place_name.trim(),
                available_time_start: request.available_time_start,
                available_time_end: request.available_time_end,
                available_days: &request.available_days,
            },
        )
        .await?
        .into();

    info!(place_id = %place.place_id, user_id = %user.id, "Place created");
    Ok((StatusCode::CREATED, Json(place)))
}

/// List active places of the caller's company.
///
/// GET /api/v1/places
pub async fn list_places(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ListPlacesResponse>, ApiError> {
    let data = PlaceRepository::new(state.pool.clone())
        .list_active(user.company_id)
        .await?
        .into_iter()
        .map(Place::from)
        .collect();

    Ok(Json(ListPlacesResponse { data }))
}

/// Fetch a place, including deactivated ones.
///
/// GET /api/v1/places/:place_id
pub async fn get_place(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(place_id): Path<Uuid>,
) -> Result<Json<Place>, ApiError> {
    let place = load_place(&PlaceRepository::new(state.pool.clone()), &user, place_id).await?;
    Ok(Json(place))
}

/// Change a place's name, operating window or open days.
///
/// PATCH /api/v1/places/:place_id
pub async fn update_place(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(place_id): Path<Uuid>,
    Json(request): Json<UpdatePlaceRequest>,
) -> Result<Json<Place>, ApiError> {
    require_admin(&user)?;
    request.validate()?;

    let repo = PlaceRepository::new(state.pool.clone());
    let current = load_place(&repo, &user, place_id).await?;
    if !current.is_active {
        return Err(ApiError::Conflict("Place is deactivated".to_string()));
    }

    let place_name = request
        .place_name
        .as_deref()
        .map(str::trim)
        .unwrap_or(current.place_name.as_str());
    let start = request
        .available_time_start
        .unwrap_or(current.available_time_start);
    let end = request.available_time_end.unwrap_or(current.available_time_end);
    let days = request
        .available_days
        .as_ref()
        .unwrap_or(&current.available_days);

    validate_window(start, end)?;
    days.validate_keys()?;

    let updated: Place = repo
        .update(
            place_id,
            PlaceValues {
                place_name,
                available_time_start: start,
                available_time_end: end,
                available_days: days,
            },
        )
        .await?
        .ok_or_else(|| ApiError::Conflict("Place is deactivated".to_string()))?
        .into();

    info!(place_id = %place_id, user_id = %user.id, "Place updated");
    Ok(Json(updated))
}

/// Deactivate a place with a reason. Existing bookings are kept.
///
/// POST /api/v1/places/:place_id/deactivate
pub async fn deactivate_place(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(place_id): Path<Uuid>,
    Json(request): Json<DeactivatePlaceRequest>,
) -> Result<Json<Place>, ApiError> {
    require_admin(&user)?;
    request.validate()?;

    let repo = PlaceRepository::new(state.pool.clone());
    load_place(&repo, &user, place_id).await?;

    let place: Place = repo
        .deactivate(place_id, request.reason.trim())
        .await?
        .ok_or_else(|| ApiError::Conflict("Place is already deactivated".to_string()))?
        .into();

    info!(place_id = %place_id, user_id = %user.id, "Place deactivated");
    Ok(Json(place))
}

/// Free time slots of a place on a date.
///
/// GET /api/v1/places/:place_id/free-slots?date=YYYY-MM-DD
pub async fn get_free_slots(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(place_id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> Result<Json<FreeSlotsResponse>, ApiError> {
    let repo = PlaceRepository::new(state.pool.clone());
    let place = load_place(&repo, &user, place_id).await?;

    let bookings: Vec<Booking> = repo
        .bookings_on(place_id, query.date)
        .await?
        .into_iter()
        .map(Booking::from)
        .collect();

    let slots = free_slots_for_date(&place, query.date, &booked_slots(&bookings));

    Ok(Json(FreeSlotsResponse {
        place_id,
        date: query.date,
        open: place.is_open_on(query.date),
        slots,
    }))
}

/// Bookings of a place on a date.
///
/// GET /api/v1/places/:place_id/bookings?date=YYYY-MM-DD
pub async fn list_bookings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(place_id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> Result<Json<ListBookingsResponse>, ApiError> {
    let repo = PlaceRepository::new(state.pool.clone());
    load_place(&repo, &user, place_id).await?;

    let data = repo
        .bookings_on(place_id, query.date)
        .await?
        .into_iter()
        .map(Booking::from)
        .collect();

    Ok(Json(ListBookingsResponse { data }))
}

/// Book a place. The interval must fit inside a single free slot.
///
/// POST /api/v1/places/:place_id/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(place_id): Path<Uuid>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    require_role(&user, user.role.can_invite_visitors(), "book places")?;
    request.validate()?;
    if TimeSlot::new(request.start_time, request.end_time).is_empty() {
        return Err(ApiError::Validation(
            "Booking start time must be before end time".to_string(),
        ));
    }

    let repo = PlaceRepository::new(state.pool.clone());
    load_place(&repo, &user, place_id).await?;

    let outcome = repo
        .create_booking(
            place_id,
            NewBooking {
                booking_date: request.booking_date,
                start_time: request.start_time,
                end_time: request.end_time,
                booked_by: user.id,
                purpose: request.purpose.as_deref(),
            },
        )
        .await?;

    match outcome {
        BookingOutcome::Booked(entity) => {
            let booking: Booking = entity.into();
            record_booking("booked");
            info!(
                booking_id = %booking.id,
                place_id = %place_id,
                date = %booking.booking_date,
                user_id = %user.id,
                "Place booked"
            );
            Ok((StatusCode::CREATED, Json(booking)))
        }
        BookingOutcome::PlaceNotFound => Err(ApiError::NotFound("Place not found".to_string())),
        BookingOutcome::SlotUnavailable => {
            record_booking("rejected");
            Err(DomainError::SlotUnavailable.into())
        }
    }
}
