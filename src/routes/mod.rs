use actix_web::web;

pub mod admin;
pub mod auth;
pub mod public;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(public::configure)
        .configure(auth::configure)
        .configure(admin::configure);
}
