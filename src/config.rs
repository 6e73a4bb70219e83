use std::{env, path::PathBuf};

pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Runtime settings, read from the environment (and `.env` when present).
///
/// | Env var              | Default                      |
/// |----------------------|------------------------------|
/// | `DATABASE_URL`       | `sqlite://./data/studio.db`  |
/// | `PORT`               | `8080`                       |
/// | `UPLOAD_DIR`         | `./data/storage`             |
/// | `PUBLIC_BASE_URL`    | `http://localhost:<PORT>`    |
/// | `ADMIN_EMAIL`        | `admin@example.com`          |
/// | `ADMIN_PASSWORD`     | `admin`                      |
/// | `ADMIN_DISPLAY_NAME` | `Studio Admin`               |
/// | `SEED_SERVICES`      | `false`                      |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    pub admin: AdminSeed,
    pub seed_services: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8080);

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://./data/studio.db".to_string()),
            port,
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./data/storage".to_string())
                .into(),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            admin: AdminSeed {
                email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
                password: env::var("ADMIN_PASSWORD")
                    .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
                display_name: env::var("ADMIN_DISPLAY_NAME")
                    .unwrap_or_else(|_| "Studio Admin".to_string()),
            },
            seed_services: env::var("SEED_SERVICES")
                .map(|value| value == "true" || value == "1")
                .unwrap_or(false),
        }
    }
}
