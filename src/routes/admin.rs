use std::collections::HashMap;

use actix_web::{middleware::from_fn, web, HttpResponse};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    admin_form::AdminForm,
    auth::{session_guard, AuthUser},
    data::{appointments, blog, media, messages, payments, services},
    error::{AppError, AppResult},
    media::{normalize_draft, normalize_media_url},
    models::{
        Appointment, AppointmentStatus, BlogPost, BlogPostDraft, ContactMessage, MediaItem,
        MediaItemDraft, MediaItemPatch, Payment, PaymentStatus, Service, Testimonial,
    },
    state::AppState,
    store::{Entity, Filter, Table},
    uploads::UploadRequest,
};

const UPLOAD_BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Serialize)]
struct Dashboard {
    admin_name: String,
    services: i64,
    testimonials: i64,
    blog_posts: i64,
    media_items: i64,
    appointments: i64,
    pending_appointments: i64,
    unread_messages: i64,
    payments: payments::PaymentStats,
}

#[derive(Serialize)]
struct AppointmentView {
    #[serde(flatten)]
    appointment: Appointment,
    service_name: Option<String>,
}

#[derive(Deserialize)]
struct StatusFilter {
    status: Option<String>,
}

#[derive(Deserialize)]
struct PaymentFilter {
    status: Option<PaymentStatus>,
    appointment_id: Option<Uuid>,
}

#[derive(Deserialize)]
struct MessageFilter {
    filter: Option<String>,
}

#[derive(Deserialize)]
struct StatusUpdate<S> {
    status: S,
}

#[derive(Deserialize)]
struct FeaturedUpdate {
    is_featured: bool,
}

#[derive(Deserialize)]
struct ResponseBody {
    response: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(from_fn(session_guard))
            .service(web::resource("/dashboard").route(web::get().to(dashboard)))
            .service(
                web::resource("/services")
                    .route(web::get().to(list::<Service>))
                    .route(web::post().to(create::<Service>)),
            )
            .service(
                web::resource("/services/{id}")
                    .route(web::get().to(show::<Service>))
                    .route(web::patch().to(update::<Service>))
                    .route(web::put().to(replace::<Service>))
                    .route(web::delete().to(remove::<Service>)),
            )
            .service(
                web::resource("/testimonials")
                    .route(web::get().to(list::<Testimonial>))
                    .route(web::post().to(create::<Testimonial>)),
            )
            .service(
                web::resource("/testimonials/{id}")
                    .route(web::get().to(show::<Testimonial>))
                    .route(web::patch().to(update::<Testimonial>))
                    .route(web::put().to(replace::<Testimonial>))
                    .route(web::delete().to(remove::<Testimonial>)),
            )
            .service(
                web::resource("/blog")
                    .route(web::get().to(list::<BlogPost>))
                    .route(web::post().to(create_post)),
            )
            .service(
                web::resource("/blog/{id}")
                    .route(web::get().to(show::<BlogPost>))
                    .route(web::patch().to(update::<BlogPost>))
                    .route(web::put().to(replace_post))
                    .route(web::delete().to(remove::<BlogPost>)),
            )
            .service(
                web::resource("/media")
                    .route(web::get().to(list::<MediaItem>))
                    .route(web::post().to(create_media)),
            )
            .service(
                web::resource("/media/{id}")
                    .route(web::get().to(show::<MediaItem>))
                    .route(web::patch().to(update_media))
                    .route(web::put().to(replace_media))
                    .route(web::delete().to(remove::<MediaItem>)),
            )
            .service(web::resource("/media/{id}/featured").route(web::post().to(set_featured)))
            .service(web::resource("/payments/stats").route(web::get().to(payment_stats)))
            .service(
                web::resource("/payments")
                    .route(web::get().to(list_payments))
                    .route(web::post().to(create::<Payment>)),
            )
            .service(
                web::resource("/payments/{id}")
                    .route(web::get().to(show::<Payment>))
                    .route(web::patch().to(update::<Payment>))
                    .route(web::put().to(replace::<Payment>))
                    .route(web::delete().to(remove::<Payment>)),
            )
            .service(
                web::resource("/payments/{id}/status").route(web::post().to(update_payment_status)),
            )
            .service(web::resource("/appointments").route(web::get().to(list_appointments)))
            .service(
                web::resource("/appointments/{id}")
                    .route(web::get().to(show::<Appointment>))
                    .route(web::delete().to(remove::<Appointment>)),
            )
            .service(
                web::resource("/appointments/{id}/status")
                    .route(web::post().to(update_appointment_status)),
            )
            .service(web::resource("/messages").route(web::get().to(list_messages)))
            .service(
                web::resource("/messages/{id}")
                    .route(web::get().to(show::<ContactMessage>))
                    .route(web::delete().to(remove::<ContactMessage>)),
            )
            .service(web::resource("/messages/{id}/read").route(web::post().to(mark_read)))
            .service(web::resource("/messages/{id}/response").route(web::post().to(respond)))
            .service(
                web::resource("/uploads")
                    .app_data(web::JsonConfig::default().limit(UPLOAD_BODY_LIMIT))
                    .route(web::post().to(upload_image)),
            ),
    );
}

async fn dashboard(
    state: web::Data<AppState>,
    auth: web::ReqData<AuthUser>,
) -> AppResult<HttpResponse> {
    let db = &state.db;

    let body = Dashboard {
        admin_name: auth.display_name.clone(),
        services: Table::<Service>::new(db).count(Filter::new()).await?,
        testimonials: Table::<Testimonial>::new(db).count(Filter::new()).await?,
        blog_posts: Table::<BlogPost>::new(db).count(Filter::new()).await?,
        media_items: Table::<MediaItem>::new(db).count(Filter::new()).await?,
        appointments: appointments::table(db).count(Filter::new()).await?,
        pending_appointments: appointments::table(db)
            .count(Filter::new().eq("status", AppointmentStatus::Pending))
            .await?,
        unread_messages: messages::table(db)
            .count(Filter::new().eq("is_read", false))
            .await?,
        payments: payments::stats(db).await?,
    };
    Ok(HttpResponse::Ok().json(body))
}

async fn list<E>(state: web::Data<AppState>) -> AppResult<HttpResponse>
where
    E: Entity + Serialize,
{
    let rows = Table::<E>::new(&state.db).get_all().await?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn show<E>(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse>
where
    E: Entity + Serialize,
{
    let row = Table::<E>::new(&state.db)
        .get_by_id(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(row))
}

/// Runs a save through the shared form controller: `editing` selects update
/// over create, and the draft is written as a whole.
async fn submit_form<E>(table: &Table<E>, editing: Option<E>, draft: E::Draft) -> AppResult<E>
where
    E: Entity,
    E::Draft: Default + Clone + for<'a> From<&'a E>,
    E::Patch: From<E::Draft>,
{
    let mut form = AdminForm::<E>::new(E::Draft::default());
    match editing {
        Some(item) => form.start_edit(item),
        None => form.start_create(),
    }
    form.draft = draft;

    let saved = form
        .submit(table, |saved| log::info!("Saved {} {}", E::TABLE, saved.id()))
        .await?;
    Ok(saved)
}

async fn create<E>(
    state: web::Data<AppState>,
    payload: web::Json<E::Draft>,
) -> AppResult<HttpResponse>
where
    E: Entity + Serialize,
    E::Draft: DeserializeOwned + Default + Clone + for<'a> From<&'a E> + 'static,
    E::Patch: From<E::Draft>,
{
    let saved = submit_form(&Table::<E>::new(&state.db), None, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(saved))
}

async fn replace_with<E>(state: &AppState, id: Uuid, draft: E::Draft) -> AppResult<E>
where
    E: Entity,
    E::Draft: Default + Clone + for<'a> From<&'a E>,
    E::Patch: From<E::Draft>,
{
    let table = Table::<E>::new(&state.db);
    let existing = table.get_by_id(id).await?.ok_or(AppError::NotFound)?;
    submit_form(&table, Some(existing), draft).await
}

async fn replace<E>(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<E::Draft>,
) -> AppResult<HttpResponse>
where
    E: Entity + Serialize,
    E::Draft: DeserializeOwned + Default + Clone + for<'a> From<&'a E> + 'static,
    E::Patch: From<E::Draft>,
{
    let saved = replace_with::<E>(&state, path.into_inner(), payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(saved))
}

async fn update<E>(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<E::Patch>,
) -> AppResult<HttpResponse>
where
    E: Entity + Serialize,
    E::Patch: DeserializeOwned + 'static,
{
    let row = Table::<E>::new(&state.db)
        .update(path.into_inner(), &payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(row))
}

async fn remove<E: Entity>(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    Table::<E>::new(&state.db).delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn create_post(
    state: web::Data<AppState>,
    payload: web::Json<BlogPostDraft>,
) -> AppResult<HttpResponse> {
    let mut draft = payload.into_inner();
    blog::fill_slug(&mut draft);
    let post = submit_form(&blog::table(&state.db), None, draft).await?;
    Ok(HttpResponse::Created().json(post))
}

async fn replace_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<BlogPostDraft>,
) -> AppResult<HttpResponse> {
    let mut draft = payload.into_inner();
    blog::fill_slug(&mut draft);
    let post = replace_with::<BlogPost>(&state, path.into_inner(), draft).await?;
    Ok(HttpResponse::Ok().json(post))
}

async fn create_media(
    state: web::Data<AppState>,
    payload: web::Json<MediaItemDraft>,
) -> AppResult<HttpResponse> {
    let mut draft = payload.into_inner();
    normalize_draft(&mut draft)?;
    let saved = submit_form(&media::table(&state.db), None, draft).await?;
    Ok(HttpResponse::Created().json(saved))
}

async fn replace_media(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<MediaItemDraft>,
) -> AppResult<HttpResponse> {
    let mut draft = payload.into_inner();
    normalize_draft(&mut draft)?;
    let saved = replace_with::<MediaItem>(&state, path.into_inner(), draft).await?;
    Ok(HttpResponse::Ok().json(saved))
}

async fn update_media(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<MediaItemPatch>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut patch = payload.into_inner();
    let table = media::table(&state.db);

    if patch.media_url.is_some() || patch.media_type.is_some() {
        let existing = table.get_by_id(id).await?.ok_or(AppError::NotFound)?;
        let media_type = patch.media_type.unwrap_or(existing.media_type);
        let url = patch.media_url.take().unwrap_or(existing.media_url);
        patch.media_url = Some(normalize_media_url(media_type, &url)?);
    }

    let saved = table.update(id, &patch).await?;
    Ok(HttpResponse::Ok().json(saved))
}

async fn set_featured(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<FeaturedUpdate>,
) -> AppResult<HttpResponse> {
    let item = media::toggle_featured(&state.db, path.into_inner(), payload.is_featured).await?;
    Ok(HttpResponse::Ok().json(item))
}

async fn list_payments(
    state: web::Data<AppState>,
    query: web::Query<PaymentFilter>,
) -> AppResult<HttpResponse> {
    let rows = match (query.appointment_id, query.status) {
        (Some(appointment_id), _) => payments::get_by_appointment_id(&state.db, appointment_id).await?,
        (None, Some(status)) => payments::get_by_status(&state.db, status).await?,
        (None, None) => payments::table(&state.db).get_all().await?,
    };
    Ok(HttpResponse::Ok().json(rows))
}

async fn payment_stats(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(payments::stats(&state.db).await?))
}

async fn update_payment_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<StatusUpdate<PaymentStatus>>,
) -> AppResult<HttpResponse> {
    let payment = payments::update_status(&state.db, path.into_inner(), payload.status).await?;
    Ok(HttpResponse::Ok().json(payment))
}

async fn list_appointments(
    state: web::Data<AppState>,
    query: web::Query<StatusFilter>,
) -> AppResult<HttpResponse> {
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|status| !status.is_empty() && *status != "all")
        .map(str::parse::<AppointmentStatus>)
        .transpose()
        .map_err(AppError::Validation)?;

    let rows = match status {
        Some(status) => appointments::get_by_status(&state.db, status).await?,
        None => appointments::table(&state.db).get_all().await?,
    };

    let service_names: HashMap<Uuid, String> = services::table(&state.db)
        .get_all()
        .await?
        .into_iter()
        .map(|service| (service.id, service.name))
        .collect();

    let views: Vec<AppointmentView> = rows
        .into_iter()
        .map(|appointment| AppointmentView {
            service_name: appointment
                .service_id
                .and_then(|id| service_names.get(&id).cloned()),
            appointment,
        })
        .collect();
    Ok(HttpResponse::Ok().json(views))
}

async fn update_appointment_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<StatusUpdate<AppointmentStatus>>,
    auth: web::ReqData<AuthUser>,
) -> AppResult<HttpResponse> {
    let appointment =
        appointments::update_status(&state.db, path.into_inner(), payload.status).await?;
    log::info!(
        "{} set appointment {} to {}",
        auth.display_name,
        appointment.id,
        appointment.status
    );
    Ok(HttpResponse::Ok().json(appointment))
}

async fn list_messages(
    state: web::Data<AppState>,
    query: web::Query<MessageFilter>,
) -> AppResult<HttpResponse> {
    let rows = match query.filter.as_deref().unwrap_or("all") {
        "unread" => messages::get_unread(&state.db).await?,
        "read" => messages::get_read(&state.db).await?,
        "all" => messages::table(&state.db).get_all().await?,
        other => {
            return Err(AppError::Validation(format!(
                "unknown message filter: {other}"
            )))
        }
    };
    Ok(HttpResponse::Ok().json(rows))
}

async fn mark_read(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let message = messages::mark_as_read(&state.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(message))
}

async fn respond(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<ResponseBody>,
) -> AppResult<HttpResponse> {
    let response = payload.response.trim();
    if response.is_empty() {
        return Err(AppError::Validation("Response is required.".to_string()));
    }
    let message = messages::add_response(&state.db, path.into_inner(), response).await?;
    Ok(HttpResponse::Ok().json(message))
}

async fn upload_image(
    state: web::Data<AppState>,
    payload: web::Json<UploadRequest>,
) -> AppResult<HttpResponse> {
    let url = state.uploads.upload(&payload).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "url": url })))
}
