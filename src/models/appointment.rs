use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::AppointmentStatus;
use crate::store::{nullable, Entity, Fields, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub service_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New appointments always start out `pending`; the draft carries no status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub service_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub notes: Option<String>,
}

impl From<&Appointment> for AppointmentDraft {
    fn from(appointment: &Appointment) -> Self {
        Self {
            client_name: appointment.client_name.clone(),
            client_email: appointment.client_email.clone(),
            client_phone: appointment.client_phone.clone(),
            service_id: appointment.service_id,
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time,
            notes: appointment.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentPatch {
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub client_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub service_id: Option<Option<Uuid>>,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<NaiveTime>,
    pub status: Option<AppointmentStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl AppointmentPatch {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl From<AppointmentDraft> for AppointmentPatch {
    fn from(draft: AppointmentDraft) -> Self {
        Self {
            client_name: Some(draft.client_name),
            client_email: Some(draft.client_email),
            client_phone: Some(draft.client_phone),
            service_id: Some(draft.service_id),
            appointment_date: Some(draft.appointment_date),
            appointment_time: Some(draft.appointment_time),
            status: None,
            notes: Some(draft.notes),
        }
    }
}

impl Record for AppointmentDraft {
    fn fields(&self) -> Fields {
        Fields::new()
            .with("client_name", self.client_name.clone())
            .with("client_email", self.client_email.clone())
            .with("client_phone", self.client_phone.clone())
            .with("service_id", self.service_id)
            .with("appointment_date", self.appointment_date)
            .with("appointment_time", self.appointment_time)
            .with("status", AppointmentStatus::Pending)
            .with("notes", self.notes.clone())
    }
}

impl Record for AppointmentPatch {
    fn fields(&self) -> Fields {
        Fields::new()
            .with_some("client_name", self.client_name.clone())
            .with_some("client_email", self.client_email.clone())
            .with_some("client_phone", self.client_phone.clone())
            .with_some("service_id", self.service_id)
            .with_some("appointment_date", self.appointment_date)
            .with_some("appointment_time", self.appointment_time)
            .with_some("status", self.status)
            .with_some("notes", self.notes.clone())
    }
}

impl Entity for Appointment {
    const TABLE: &'static str = "appointments";
    const ORDER_BY: &'static str = "appointment_date ASC";

    type Draft = AppointmentDraft;
    type Patch = AppointmentPatch;

    fn id(&self) -> Uuid {
        self.id
    }
}
