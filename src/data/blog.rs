use sqlx::SqlitePool;

use crate::{
    blog::generate_slug,
    models::{BlogPost, BlogPostDraft},
    store::{Filter, StoreError, Table},
};

pub fn table(pool: &SqlitePool) -> Table<BlogPost> {
    Table::new(pool)
}

pub async fn get_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<BlogPost>, StoreError> {
    table(pool).select_one(Filter::new().eq("slug", slug)).await
}

/// Derives the slug from the title when the draft's slug is missing or blank.
pub fn fill_slug(draft: &mut BlogPostDraft) {
    let missing = draft
        .slug
        .as_deref()
        .map(|slug| slug.trim().is_empty())
        .unwrap_or(true);
    if missing {
        draft.slug = Some(generate_slug(&draft.title));
    }
}

pub async fn create(pool: &SqlitePool, mut draft: BlogPostDraft) -> Result<BlogPost, StoreError> {
    fill_slug(&mut draft);
    table(pool).create(&draft).await
}
