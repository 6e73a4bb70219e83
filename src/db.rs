use std::{fs, path::Path};

use sqlx::SqlitePool;

use crate::{
    auth::create_admin,
    config::{Config, DEFAULT_ADMIN_PASSWORD},
    data::services,
    models::ServiceDraft,
    store::StoreError,
};

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub async fn seed_defaults(pool: &SqlitePool, config: &Config) -> Result<(), StoreError> {
    seed_admin(pool, config).await?;
    if config.seed_services {
        seed_services(pool).await?;
    }
    Ok(())
}

async fn seed_admin(pool: &SqlitePool, config: &Config) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM admin_users")
        .fetch_one(pool)
        .await?;
    if existing.0 > 0 {
        return Ok(());
    }

    if config.admin.password == DEFAULT_ADMIN_PASSWORD {
        log::warn!("ADMIN_PASSWORD not set. Using default password 'admin'. Set ADMIN_PASSWORD in production.");
    }

    let admin = create_admin(
        pool,
        &config.admin.email,
        &config.admin.display_name,
        &config.admin.password,
    )
    .await?;
    log::info!("Created admin account {}", admin.email);
    Ok(())
}

async fn seed_services(pool: &SqlitePool) -> Result<(), StoreError> {
    let table = services::table(pool);
    if !table.get_all().await?.is_empty() {
        return Ok(());
    }

    let catalog = [
        ("Piano Lessons", "One-to-one piano for all levels.", 35.0, 60),
        ("Guitar Lessons", "Acoustic and electric guitar technique.", 30.0, 60),
        ("Music Theory", "Reading, harmony and ear training.", 25.0, 45),
        ("Exam Preparation", "Focused coaching ahead of graded exams.", 40.0, 60),
    ];
    for (name, description, price, duration_minutes) in catalog {
        table
            .create(&ServiceDraft {
                name: name.to_string(),
                description: Some(description.to_string()),
                price,
                duration_minutes,
                image_url: None,
            })
            .await?;
    }
    log::info!("Seeded default service catalog");
    Ok(())
}
