use sqlx::SqlitePool;

use crate::{models::Service, store::Table};

pub fn table(pool: &SqlitePool) -> Table<Service> {
    Table::new(pool)
}
