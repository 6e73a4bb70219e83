use sqlx::SqlitePool;

use crate::{models::Testimonial, store::Table};

pub fn table(pool: &SqlitePool) -> Table<Testimonial> {
    Table::new(pool)
}
