use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::PaymentStatus;
use crate::store::{nullable, Entity, Fields, Record};

/// A manually recorded payment. Nothing ties it to an actual transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub amount: f64,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentDraft {
    pub appointment_id: Option<Uuid>,
    pub amount: f64,
    pub payment_method: Option<String>,
    pub status: Option<PaymentStatus>,
    pub notes: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
}

impl From<&Payment> for PaymentDraft {
    fn from(payment: &Payment) -> Self {
        Self {
            appointment_id: payment.appointment_id,
            amount: payment.amount,
            payment_method: payment.payment_method.clone(),
            status: Some(payment.status),
            notes: payment.notes.clone(),
            payment_date: Some(payment.payment_date),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub appointment_id: Option<Option<Uuid>>,
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub payment_method: Option<Option<String>>,
    pub status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
    pub payment_date: Option<DateTime<Utc>>,
}

impl PaymentPatch {
    pub fn status(status: PaymentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl From<PaymentDraft> for PaymentPatch {
    fn from(draft: PaymentDraft) -> Self {
        Self {
            appointment_id: Some(draft.appointment_id),
            amount: Some(draft.amount),
            payment_method: Some(draft.payment_method),
            status: draft.status,
            notes: Some(draft.notes),
            payment_date: draft.payment_date,
        }
    }
}

impl Record for PaymentDraft {
    fn fields(&self) -> Fields {
        Fields::new()
            .with("appointment_id", self.appointment_id)
            .with("amount", self.amount)
            .with("payment_method", self.payment_method.clone())
            .with("status", self.status)
            .with("notes", self.notes.clone())
            .with("payment_date", self.payment_date.unwrap_or_else(Utc::now))
    }
}

impl Record for PaymentPatch {
    fn fields(&self) -> Fields {
        Fields::new()
            .with_some("appointment_id", self.appointment_id)
            .with_some("amount", self.amount)
            .with_some("payment_method", self.payment_method.clone())
            .with_some("status", self.status)
            .with_some("notes", self.notes.clone())
            .with_some("payment_date", self.payment_date)
    }
}

impl Entity for Payment {
    const TABLE: &'static str = "payments";
    const ORDER_BY: &'static str = "payment_date DESC";

    type Draft = PaymentDraft;
    type Patch = PaymentPatch;

    fn id(&self) -> Uuid {
        self.id
    }
}
