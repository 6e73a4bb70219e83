use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    models::{Payment, PaymentPatch, PaymentStatus},
    store::{Filter, StoreError, Table},
};

/// Status string counted by `paid_count`. It is not a member of
/// [`PaymentStatus`], so the count is always zero.
const PAID_STATUS: &str = "paid";

pub fn table(pool: &SqlitePool) -> Table<Payment> {
    Table::new(pool)
}

pub async fn get_by_appointment_id(
    pool: &SqlitePool,
    appointment_id: Uuid,
) -> Result<Vec<Payment>, StoreError> {
    table(pool)
        .select(Filter::new().eq("appointment_id", appointment_id))
        .await
}

pub async fn get_by_status(
    pool: &SqlitePool,
    status: PaymentStatus,
) -> Result<Vec<Payment>, StoreError> {
    table(pool).select(Filter::new().eq("status", status)).await
}

pub async fn update_status(
    pool: &SqlitePool,
    id: Uuid,
    status: PaymentStatus,
) -> Result<Payment, StoreError> {
    table(pool).update(id, &PaymentPatch::status(status)).await
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentStats {
    pub total_revenue: f64,
    pub pending_amount: f64,
    pub paid_count: usize,
    pub pending_count: usize,
}

impl PaymentStats {
    pub fn from_payments(payments: &[Payment]) -> Self {
        let mut stats = PaymentStats::default();
        for payment in payments {
            match payment.status {
                PaymentStatus::Completed => stats.total_revenue += payment.amount,
                PaymentStatus::Pending => {
                    stats.pending_amount += payment.amount;
                    stats.pending_count += 1;
                }
                PaymentStatus::Failed | PaymentStatus::Cancelled => {}
            }
            if payment.status.as_str() == PAID_STATUS {
                stats.paid_count += 1;
            }
        }
        stats
    }
}

pub async fn stats(pool: &SqlitePool) -> Result<PaymentStats, StoreError> {
    let payments = table(pool).get_all().await?;
    Ok(PaymentStats::from_payments(&payments))
}
