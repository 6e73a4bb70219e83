//! Lesson booking: fixed hourly slots and pending appointment creation.
//!
//! Only confirmed appointments take a slot out of the schedule. Nothing is
//! re-checked at write time, so two clients can request the same slot and
//! both end up with a pending appointment.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    data::{appointments, services},
    models::{Appointment, AppointmentDraft, AppointmentStatus},
    store::StoreError,
};

pub const FIRST_SLOT_HOUR: u32 = 9;
pub const LAST_SLOT_HOUR: u32 = 18;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error("Please select a date and time.")]
    MissingSlot,
    #[error("Selected service was not found.")]
    UnknownService,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub client_name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub client_email: String,
    pub client_phone: Option<String>,
    #[validate(length(min = 1, message = "Please select a service."))]
    pub service_id: String,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

/// The ten bookable hours, 09:00 through 18:00.
pub fn candidate_slots() -> Vec<NaiveTime> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .collect()
}

pub fn free_slots<I>(booked: I) -> Vec<NaiveTime>
where
    I: IntoIterator<Item = NaiveTime>,
{
    let booked: HashSet<NaiveTime> = booked.into_iter().collect();
    candidate_slots()
        .into_iter()
        .filter(|slot| !booked.contains(slot))
        .collect()
}

pub async fn available_slots(pool: &SqlitePool, date: NaiveDate) -> Result<Vec<NaiveTime>, StoreError> {
    let confirmed = appointments::get_on_date(pool, date, AppointmentStatus::Confirmed).await?;
    Ok(free_slots(
        confirmed.into_iter().map(|appointment| appointment.appointment_time),
    ))
}

/// Past days and weekends are not offered in the calendar. The booking
/// endpoint itself does not enforce this.
pub fn is_selectable_date(date: NaiveDate, today: NaiveDate) -> bool {
    if date < today {
        return false;
    }
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub async fn book(pool: &SqlitePool, request: BookingRequest) -> Result<Appointment, BookingError> {
    request.validate()?;

    let (Some(appointment_date), Some(appointment_time)) =
        (request.appointment_date, request.appointment_time)
    else {
        return Err(BookingError::MissingSlot);
    };

    let service_id =
        Uuid::parse_str(request.service_id.trim()).map_err(|_| BookingError::UnknownService)?;
    if services::table(pool).get_by_id(service_id).await?.is_none() {
        return Err(BookingError::UnknownService);
    }

    let draft = AppointmentDraft {
        client_name: request.client_name.trim().to_string(),
        client_email: request.client_email.trim().to_string(),
        client_phone: request.client_phone.filter(|phone| !phone.trim().is_empty()),
        service_id: Some(service_id),
        appointment_date,
        appointment_time,
        notes: request.notes.filter(|notes| !notes.trim().is_empty()),
    };

    let appointment = appointments::table(pool).create(&draft).await?;
    log::info!(
        "Appointment {} requested for {} at {}",
        appointment.id,
        appointment.appointment_date,
        appointment.appointment_time
    );
    Ok(appointment)
}
