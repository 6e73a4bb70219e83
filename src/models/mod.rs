pub use appointment::*;
pub use blog_post::*;
pub use contact_message::*;
pub use media_item::*;
pub use payment::*;
pub use service::*;
pub use status::*;
pub use testimonial::*;

mod appointment;
mod blog_post;
mod contact_message;
mod media_item;
mod payment;
mod service;
mod status;
mod testimonial;
