use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    models::{Appointment, AppointmentPatch, AppointmentStatus},
    store::{Filter, StoreError, Table},
};

pub fn table(pool: &SqlitePool) -> Table<Appointment> {
    Table::new(pool)
}

/// Appointments with `start <= appointment_date <= end`, earliest first.
pub async fn get_by_date_range(
    pool: &SqlitePool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Appointment>, StoreError> {
    table(pool)
        .select(
            Filter::new()
                .gte("appointment_date", start)
                .lte("appointment_date", end)
                .order("appointment_date", true),
        )
        .await
}

pub async fn get_by_status(
    pool: &SqlitePool,
    status: AppointmentStatus,
) -> Result<Vec<Appointment>, StoreError> {
    table(pool).select(Filter::new().eq("status", status)).await
}

pub async fn get_on_date(
    pool: &SqlitePool,
    date: NaiveDate,
    status: AppointmentStatus,
) -> Result<Vec<Appointment>, StoreError> {
    table(pool)
        .select(
            Filter::new()
                .eq("appointment_date", date)
                .eq("status", status)
                .order("appointment_time", true),
        )
        .await
}

/// Any status may follow any other; transitions are not checked.
pub async fn update_status(
    pool: &SqlitePool,
    id: Uuid,
    status: AppointmentStatus,
) -> Result<Appointment, StoreError> {
    table(pool).update(id, &AppointmentPatch::status(status)).await
}
