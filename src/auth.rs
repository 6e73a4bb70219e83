use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    web, Error, HttpMessage, HttpRequest, HttpResponse,
};
use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::state::AppState;

pub const AUTH_REALM: &str = "Music Studio";
pub const SESSION_COOKIE: &str = "studio_session";
/// Server-side session lifetime; the cookie max-age matches it.
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The signed-in admin for the current request, placed by [`session_guard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
}

impl From<AdminUser> for AuthUser {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = PasswordHash::new(password_hash);
    match parsed_hash {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn create_admin(
    pool: &SqlitePool,
    email: &str,
    display_name: &str,
    password: &str,
) -> Result<AdminUser, sqlx::Error> {
    let password_hash = hash_password(password)
        .map_err(|_| sqlx::Error::Protocol("password hash failed".into()))?;

    sqlx::query_as::<_, AdminUser>(
        r#"INSERT INTO admin_users (id, email, display_name, password_hash, created_at)
           VALUES (?, ?, ?, ?, ?)
           RETURNING id, email, display_name, password_hash, created_at"#,
    )
    .bind(Uuid::new_v4())
    .bind(email.trim().to_lowercase())
    .bind(display_name)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn authenticate_credentials(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<AuthUser>, sqlx::Error> {
    let user = sqlx::query_as::<_, AdminUser>(
        r#"SELECT id, email, display_name, password_hash, created_at
           FROM admin_users
           WHERE email = ?
           LIMIT 1"#,
    )
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(user
        .filter(|user| verify_password(password, &user.password_hash))
        .map(AuthUser::from))
}

fn new_session_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn session_cutoff() -> DateTime<Utc> {
    Utc::now() - chrono::Duration::days(SESSION_TTL_DAYS)
}

/// Opens a session for `user`, dropping expired sessions first.
pub async fn open_session(pool: &SqlitePool, user: &AuthUser) -> Result<String, sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE created_at < ?")
        .bind(session_cutoff())
        .execute(pool)
        .await?;

    let token = new_session_token();
    sqlx::query("INSERT INTO sessions (token, admin_user_id, created_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(user.id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(token)
}

pub async fn session_user(pool: &SqlitePool, token: &str) -> Result<Option<AuthUser>, sqlx::Error> {
    let user = sqlx::query_as::<_, AdminUser>(
        r#"SELECT u.id, u.email, u.display_name, u.password_hash, u.created_at
           FROM sessions s
           JOIN admin_users u ON s.admin_user_id = u.id
           WHERE s.token = ? AND s.created_at >= ?
           LIMIT 1"#,
    )
    .bind(token)
    .bind(session_cutoff())
    .fetch_optional(pool)
    .await?;
    Ok(user.map(AuthUser::from))
}

pub async fn close_session(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

pub fn session_cookie(req: &HttpRequest, token: &str) -> Cookie<'static> {
    let mut builder = Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(SESSION_TTL_DAYS));
    if req.connection_info().scheme() == "https" {
        builder = builder.secure(true);
    }
    builder.finish()
}

pub fn clear_session_cookie(req: &HttpRequest) -> Cookie<'static> {
    let mut builder = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(0));
    if req.connection_info().scheme() == "https" {
        builder = builder.secure(true);
    }
    builder.finish()
}

/// Resolves the session cookie to the signed-in admin, if any.
pub async fn current_user(state: &AppState, req: &HttpRequest) -> Option<AuthUser> {
    let token = req.cookie(SESSION_COOKIE)?;
    match session_user(&state.db, token.value()).await {
        Ok(user) => user,
        Err(err) => {
            log::error!("Session lookup failed: {err}");
            None
        }
    }
}

/// Admin scope guard. Without a valid session the request is redirected to
/// `/login?next=<path>`.
pub async fn session_guard<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<BoxBody>, Error>
where
    B: actix_web::body::MessageBody + 'static,
{
    let user = match req.app_data::<web::Data<AppState>>() {
        Some(state) => current_user(state, req.request()).await,
        None => None,
    };

    let Some(user) = user else {
        let login_url = format!("/login?next={}", req.path());
        let response = HttpResponse::SeeOther()
            .append_header((header::LOCATION, login_url))
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish();
        return Ok(req.into_response(response));
    };

    req.extensions_mut().insert(user);
    let res = next.call(req).await?;
    Ok(res.map_into_boxed_body())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("correct horse", "not-a-hash"));
    }

    #[test]
    fn session_tokens_are_unique_hex() {
        let a = new_session_token();
        let b = new_session_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
