//! Backend for a private music tutor's site: lesson services, testimonials,
//! blog, media gallery, contact inbox, and lesson booking, with an admin
//! area behind a session login.

pub mod admin_form;
pub mod auth;
pub mod blog;
pub mod booking;
pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod media;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod uploads;
