use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    models::{ContactMessage, ContactMessagePatch},
    store::{Filter, StoreError, Table},
};

pub fn table(pool: &SqlitePool) -> Table<ContactMessage> {
    Table::new(pool)
}

pub async fn get_unread(pool: &SqlitePool) -> Result<Vec<ContactMessage>, StoreError> {
    table(pool).select(Filter::new().eq("is_read", false)).await
}

pub async fn get_read(pool: &SqlitePool) -> Result<Vec<ContactMessage>, StoreError> {
    table(pool).select(Filter::new().eq("is_read", true)).await
}

pub async fn mark_as_read(pool: &SqlitePool, id: Uuid) -> Result<ContactMessage, StoreError> {
    let patch = ContactMessagePatch {
        is_read: Some(true),
        ..ContactMessagePatch::default()
    };
    table(pool).update(id, &patch).await
}

/// Stores the reply and marks the message read in the same write.
pub async fn add_response(
    pool: &SqlitePool,
    id: Uuid,
    response: &str,
) -> Result<ContactMessage, StoreError> {
    let patch = ContactMessagePatch {
        is_read: Some(true),
        admin_response: Some(Some(response.to_string())),
        ..ContactMessagePatch::default()
    };
    table(pool).update(id, &patch).await
}
