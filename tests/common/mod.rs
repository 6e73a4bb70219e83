#![allow(dead_code)]

use std::path::PathBuf;

use actix_web::{http::header, web};
use base64::{engine::general_purpose, Engine as _};
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use uuid::Uuid;

use music_tutor::{
    auth::create_admin,
    config::{AdminSeed, Config},
    data::{appointments, services},
    db,
    models::{Appointment, AppointmentDraft, Service, ServiceDraft},
    state::AppState,
};

pub const ADMIN_EMAIL: &str = "teacher@example.com";
pub const ADMIN_PASSWORD: &str = "s3cret-scales";

/// Single-connection in-memory database with the crate migrations applied.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::run_migrations(&pool).await.expect("migrations apply");
    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 8080,
        upload_dir: temp_dir("uploads"),
        public_base_url: "http://localhost:8080".to_string(),
        admin: AdminSeed {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            display_name: "Ms. Rivera".to_string(),
        },
        seed_services: false,
    }
}

pub fn temp_dir(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("music-tutor-{prefix}-{}", Uuid::new_v4()))
}

pub fn app_state(pool: &SqlitePool) -> web::Data<AppState> {
    web::Data::new(AppState::new(pool.clone(), &test_config()))
}

pub async fn seed_admin(pool: &SqlitePool) {
    create_admin(pool, ADMIN_EMAIL, "Ms. Rivera", ADMIN_PASSWORD)
        .await
        .expect("admin created");
}

pub fn basic_auth(email: &str, password: &str) -> (header::HeaderName, String) {
    let encoded = general_purpose::STANDARD.encode(format!("{email}:{password}"));
    (header::AUTHORIZATION, format!("Basic {encoded}"))
}

pub async fn piano_service(pool: &SqlitePool) -> Service {
    services::table(pool)
        .create(&ServiceDraft {
            name: "Piano Lessons".to_string(),
            description: Some("One-to-one piano".to_string()),
            price: 35.0,
            duration_minutes: 60,
            image_url: None,
        })
        .await
        .expect("service created")
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).expect("valid time")
}

pub async fn appointment_at(
    pool: &SqlitePool,
    service: &Service,
    date: NaiveDate,
    time: NaiveTime,
) -> Appointment {
    appointments::table(pool)
        .create(&AppointmentDraft {
            client_name: "Lucía".to_string(),
            client_email: "lucia@example.com".to_string(),
            client_phone: None,
            service_id: Some(service.id),
            appointment_date: date,
            appointment_time: time,
            notes: None,
        })
        .await
        .expect("appointment created")
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
