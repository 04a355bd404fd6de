//! Free-slot computation for bookable places.
//!
//! Free slots are the complement of a day's bookings within the place's
//! operating window: sort bookings by start, sweep forward tracking the
//! end of the covered region, and emit every gap.

use chrono::NaiveDate;

use crate::models::place::{Place, TimeSlot};

/// Computes the free intervals of `window` not covered by `bookings`.
///
/// Bookings are clipped to the window; bookings entirely outside it are
/// ignored. Overlapping bookings merge. Zero-length gaps are not emitted.
pub fn free_slots(window: TimeSlot, bookings: &[TimeSlot]) -> Vec<TimeSlot> {
    if window.is_empty() {
        return Vec::new();
    }

    let mut clipped: Vec<TimeSlot> = bookings
        .iter()
        .filter_map(|b| {
            let start = b.start.max(window.start);
            let end = b.end.min(window.end);
            (start < end).then(|| TimeSlot::new(start, end))
        })
        .collect();
    clipped.sort();

    let mut slots = Vec::new();
    let mut previous_end = window.start;

    for booking in clipped {
        if booking.start > previous_end {
            slots.push(TimeSlot::new(previous_end, booking.start));
        }
        previous_end = previous_end.max(booking.end);
    }

    if previous_end < window.end {
        slots.push(TimeSlot::new(previous_end, window.end));
    }

    slots
}

/// Free slots of a place on a date. Closed days have none.
pub fn free_slots_for_date(place: &Place, date: NaiveDate, bookings: &[TimeSlot]) -> Vec<TimeSlot> {
    if !place.is_open_on(date) {
        tracing::debug!(place_id = %place.place_id, %date, "Place closed on requested date");
        return Vec::new();
    }

    free_slots(place.operating_window(), bookings)
}

/// True if the candidate lies entirely inside one of the free slots.
pub fn fits_in_free_slot(slots: &[TimeSlot], candidate: &TimeSlot) -> bool {
    !candidate.is_empty() && slots.iter().any(|slot| slot.contains(candidate))
}
