//! Per-entity data access. Each module is a typed [`Table`](crate::store::Table)
//! plus the reads and single-field writes the site needs.

pub mod appointments;
pub mod blog;
pub mod media;
pub mod messages;
pub mod payments;
pub mod services;
pub mod testimonials;
