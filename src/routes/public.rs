use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    blog::{blocks, excerpt_or_preview, matches_search, Block},
    booking::{self, BookingRequest},
    data::{blog, media, messages, services, testimonials},
    error::{AppError, AppResult},
    models::{BlogPost, ContactMessageDraft, MediaItem, MediaType},
    state::AppState,
};

#[derive(Serialize)]
pub struct BlogPostSummary {
    #[serde(flatten)]
    pub post: BlogPost,
    pub preview: String,
}

#[derive(Serialize)]
pub struct BlogPostDetail {
    #[serde(flatten)]
    pub post: BlogPost,
    pub blocks: Vec<Block>,
}

#[derive(Serialize)]
pub struct GalleryItem {
    #[serde(flatten)]
    pub item: MediaItem,
    pub preview_url: Option<String>,
}

impl From<MediaItem> for GalleryItem {
    fn from(item: MediaItem) -> Self {
        Self {
            preview_url: item.preview_url(),
            item,
        }
    }
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: NaiveDate,
    pub selectable: bool,
    pub slots: Vec<NaiveTime>,
}

#[derive(Deserialize)]
struct BlogQuery {
    q: Option<String>,
}

#[derive(Deserialize)]
struct GalleryQuery {
    #[serde(rename = "type")]
    media_type: Option<String>,
    category: Option<String>,
}

#[derive(Deserialize)]
struct SlotsQuery {
    date: NaiveDate,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/api/services").route(web::get().to(list_services)))
        .service(web::resource("/api/testimonials").route(web::get().to(list_testimonials)))
        .service(web::resource("/api/blog").route(web::get().to(list_posts)))
        .service(web::resource("/api/blog/{slug}").route(web::get().to(show_post)))
        .service(web::resource("/api/gallery").route(web::get().to(gallery)))
        .service(web::resource("/api/gallery/featured").route(web::get().to(featured_gallery)))
        .service(web::resource("/api/contact").route(web::post().to(send_message)))
        .service(web::resource("/api/booking/slots").route(web::get().to(available_slots)))
        .service(web::resource("/api/booking").route(web::post().to(create_booking)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn list_services(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let rows = services::table(&state.db).get_all().await?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn list_testimonials(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let rows = testimonials::table(&state.db).get_all().await?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<BlogQuery>,
) -> AppResult<HttpResponse> {
    let term = query.q.as_deref().map(str::trim).unwrap_or("");
    let posts: Vec<BlogPostSummary> = blog::table(&state.db)
        .get_all()
        .await?
        .into_iter()
        .filter(|post| term.is_empty() || matches_search(post, term))
        .map(|post| BlogPostSummary {
            preview: excerpt_or_preview(&post),
            post,
        })
        .collect();
    Ok(HttpResponse::Ok().json(posts))
}

async fn show_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = blog::get_by_slug(&state.db, &path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(BlogPostDetail {
        blocks: blocks(&post.content),
        post,
    }))
}

/// `all` or an empty value leaves the filter off.
fn selected(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "all")
}

async fn gallery(
    state: web::Data<AppState>,
    query: web::Query<GalleryQuery>,
) -> AppResult<HttpResponse> {
    let media_type = selected(query.media_type.as_deref())
        .map(str::parse::<MediaType>)
        .transpose()
        .map_err(AppError::Validation)?;
    let category = selected(query.category.as_deref());

    let items: Vec<GalleryItem> = media::search(&state.db, media_type, category)
        .await?
        .into_iter()
        .map(GalleryItem::from)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

async fn featured_gallery(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let items: Vec<GalleryItem> = media::get_featured(&state.db)
        .await?
        .into_iter()
        .map(GalleryItem::from)
        .collect();
    Ok(HttpResponse::Ok().json(items))
}

async fn send_message(
    state: web::Data<AppState>,
    payload: web::Json<ContactMessageDraft>,
) -> AppResult<HttpResponse> {
    let mut draft = payload.into_inner();
    draft.validate()?;
    draft.is_read = false;
    draft.admin_response = None;

    let message = messages::table(&state.db).create(&draft).await?;
    log::info!("Contact message {} received ({})", message.id, message.inquiry_type);
    Ok(HttpResponse::Created().json(message))
}

async fn available_slots(
    state: web::Data<AppState>,
    query: web::Query<SlotsQuery>,
) -> AppResult<HttpResponse> {
    let date = query.date;
    let slots = booking::available_slots(&state.db, date).await?;
    Ok(HttpResponse::Ok().json(SlotsResponse {
        date,
        selectable: booking::is_selectable_date(date, Utc::now().date_naive()),
        slots,
    }))
}

async fn create_booking(
    state: web::Data<AppState>,
    payload: web::Json<BookingRequest>,
) -> AppResult<HttpResponse> {
    let appointment = booking::book(&state.db, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(appointment))
}
