use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    models::{MediaItem, MediaItemPatch, MediaType},
    store::{Filter, StoreError, Table},
};

pub fn table(pool: &SqlitePool) -> Table<MediaItem> {
    Table::new(pool)
}

pub async fn get_featured(pool: &SqlitePool) -> Result<Vec<MediaItem>, StoreError> {
    table(pool).select(Filter::new().eq("is_featured", true)).await
}

pub async fn get_by_category(pool: &SqlitePool, category: &str) -> Result<Vec<MediaItem>, StoreError> {
    table(pool)
        .select(Filter::new().eq("category", category.to_string()))
        .await
}

pub async fn get_by_type(pool: &SqlitePool, media_type: MediaType) -> Result<Vec<MediaItem>, StoreError> {
    table(pool).select(Filter::new().eq("media_type", media_type)).await
}

/// Gallery listing with optional type and category filters.
pub async fn search(
    pool: &SqlitePool,
    media_type: Option<MediaType>,
    category: Option<&str>,
) -> Result<Vec<MediaItem>, StoreError> {
    let mut filter = Filter::new();
    if let Some(media_type) = media_type {
        filter = filter.eq("media_type", media_type);
    }
    if let Some(category) = category {
        filter = filter.eq("category", category.to_string());
    }
    table(pool).select(filter).await
}

pub async fn toggle_featured(
    pool: &SqlitePool,
    id: Uuid,
    is_featured: bool,
) -> Result<MediaItem, StoreError> {
    table(pool).update(id, &MediaItemPatch::featured(is_featured)).await
}
