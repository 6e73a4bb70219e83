use actix_web::http::header::Header;
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use actix_web_httpauth::headers::authorization::{Authorization, Basic};
use serde::Deserialize;

use crate::{
    auth::{
        authenticate_credentials, clear_session_cookie, close_session, current_user, open_session,
        session_cookie, AuthUser, AUTH_REALM, SESSION_COOKIE,
    },
    error::{AppError, AppResult},
    state::AppState,
    store::StoreError,
};

#[derive(Deserialize)]
struct LoginQuery {
    next: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/auth/sign-in").route(web::post().to(sign_in)))
        .service(web::resource("/api/auth/sign-out").route(web::post().to(sign_out)))
        .service(web::resource("/api/auth/user").route(web::get().to(user)))
        .service(web::resource("/login").route(web::get().to(login)));
}

/// Missing or wrong credentials give `Ok(None)`; storage failures surface.
async fn basic_credentials(state: &AppState, req: &HttpRequest) -> AppResult<Option<AuthUser>> {
    let Ok(auth) = Authorization::<Basic>::parse(req) else {
        return Ok(None);
    };
    let credentials = auth.into_scheme();
    let email = credentials.user_id();
    let password = credentials.password().unwrap_or_default();
    let user = authenticate_credentials(&state.db, email, password)
        .await
        .map_err(StoreError::from)?;
    Ok(user)
}

fn auth_challenge() -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((header::WWW_AUTHENTICATE, format!("Basic realm=\"{}\"", AUTH_REALM)))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

async fn sign_in(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let Some(user) = basic_credentials(&state, &req).await? else {
        return Ok(auth_challenge());
    };
    let token = open_session(&state.db, &user)
        .await
        .map_err(StoreError::from)?;
    log::info!("{} signed in", user.email);

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&req, &token))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(user))
}

async fn sign_out(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        close_session(&state.db, cookie.value())
            .await
            .map_err(StoreError::from)?;
    }
    Ok(HttpResponse::NoContent()
        .cookie(clear_session_cookie(&req))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish())
}

async fn user(state: web::Data<AppState>, req: HttpRequest) -> AppResult<HttpResponse> {
    let user = current_user(&state, &req).await.ok_or(AppError::Unauthorized)?;
    Ok(HttpResponse::Ok().json(user))
}

/// Browser sign-in: Basic credentials open a session and redirect back to
/// the admin page that sent the user here.
async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<LoginQuery>,
) -> AppResult<HttpResponse> {
    let Some(user) = basic_credentials(&state, &req).await? else {
        return Ok(auth_challenge());
    };
    let token = open_session(&state.db, &user)
        .await
        .map_err(StoreError::from)?;

    let requested = query.next.as_deref().unwrap_or("");
    let redirect = if requested.starts_with("/admin") {
        requested
    } else {
        "/admin/dashboard"
    };

    Ok(HttpResponse::SeeOther()
        .append_header((header::LOCATION, redirect))
        .cookie(session_cookie(&req, &token))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish())
}
