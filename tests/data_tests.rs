mod common;

use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use common::{day, hour};
use music_tutor::{
    auth::{
        authenticate_credentials, close_session, create_admin, open_session, session_user,
        SESSION_TTL_DAYS,
    },
    data::{appointments, blog, media, messages, payments, services},
    db,
    models::{
        AppointmentStatus, BlogPostDraft, ContactMessageDraft, MediaItemDraft, MediaType,
        PaymentDraft, PaymentStatus,
    },
};

#[sqlx::test]
async fn blog_create_derives_missing_slug(pool: SqlitePool) {
    let post = blog::create(
        &pool,
        BlogPostDraft {
            title: "Cómo Elegir tu Primer Instrumento".to_string(),
            content: "**Intro**\n\nStart simple.".to_string(),
            ..BlogPostDraft::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(post.slug.as_deref(), Some("cmo-elegir-tu-primer-instrumento"));

    let found = blog::get_by_slug(&pool, "cmo-elegir-tu-primer-instrumento")
        .await
        .unwrap();
    assert_eq!(found.map(|post| post.id), Some(post.id));
    assert_eq!(blog::get_by_slug(&pool, "missing").await.unwrap(), None);
}

#[sqlx::test]
async fn blog_create_keeps_given_slug(pool: SqlitePool) {
    let post = blog::create(
        &pool,
        BlogPostDraft {
            title: "Scales".to_string(),
            slug: Some("daily-scales".to_string()),
            content: "Body".to_string(),
            ..BlogPostDraft::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(post.slug.as_deref(), Some("daily-scales"));
}

#[sqlx::test]
async fn appointments_by_date_range_are_inclusive_and_ascending(pool: SqlitePool) {
    let service = common::piano_service(&pool).await;
    for date in [day(2030, 5, 9), day(2030, 5, 6), day(2030, 5, 3), day(2030, 5, 12)] {
        common::appointment_at(&pool, &service, date, hour(9)).await;
    }

    let rows = appointments::get_by_date_range(&pool, day(2030, 5, 6), day(2030, 5, 9))
        .await
        .unwrap();
    let dates: Vec<_> = rows.iter().map(|row| row.appointment_date).collect();
    assert_eq!(dates, vec![day(2030, 5, 6), day(2030, 5, 9)]);

    let all = appointments::table(&pool).get_all().await.unwrap();
    assert_eq!(all.first().map(|row| row.appointment_date), Some(day(2030, 5, 3)));
}

#[sqlx::test]
async fn appointment_status_accepts_any_transition(pool: SqlitePool) {
    let service = common::piano_service(&pool).await;
    let appointment = common::appointment_at(&pool, &service, day(2030, 5, 6), hour(9)).await;

    let completed = appointments::update_status(&pool, appointment.id, AppointmentStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, AppointmentStatus::Completed);

    let pending = appointments::update_status(&pool, appointment.id, AppointmentStatus::Pending)
        .await
        .unwrap();
    assert_eq!(pending.status, AppointmentStatus::Pending);
    assert_eq!(
        appointments::get_by_status(&pool, AppointmentStatus::Pending)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[sqlx::test]
async fn payments_filters_and_stats(pool: SqlitePool) {
    let service = common::piano_service(&pool).await;
    let appointment = common::appointment_at(&pool, &service, day(2030, 5, 6), hour(9)).await;
    let table = payments::table(&pool);

    let paid = table
        .create(&PaymentDraft {
            appointment_id: Some(appointment.id),
            amount: 10.0,
            status: Some(PaymentStatus::Completed),
            payment_method: Some("cash".to_string()),
            ..PaymentDraft::default()
        })
        .await
        .unwrap();
    let open = table
        .create(&PaymentDraft {
            amount: 5.0,
            ..PaymentDraft::default()
        })
        .await
        .unwrap();
    assert_eq!(open.status, PaymentStatus::Pending);

    let for_appointment = payments::get_by_appointment_id(&pool, appointment.id)
        .await
        .unwrap();
    assert_eq!(for_appointment.len(), 1);
    assert_eq!(for_appointment[0].id, paid.id);

    let pending = payments::get_by_status(&pool, PaymentStatus::Pending).await.unwrap();
    assert_eq!(pending.len(), 1);

    let stats = payments::stats(&pool).await.unwrap();
    assert_eq!(stats.total_revenue, 10.0);
    assert_eq!(stats.pending_amount, 5.0);
    assert_eq!(stats.pending_count, 1);
    assert_eq!(stats.paid_count, 0);

    payments::update_status(&pool, open.id, PaymentStatus::Completed)
        .await
        .unwrap();
    let stats = payments::stats(&pool).await.unwrap();
    assert_eq!(stats.total_revenue, 15.0);
    assert_eq!(stats.pending_count, 0);
}

#[sqlx::test]
async fn media_featured_category_and_type(pool: SqlitePool) {
    let table = media::table(&pool);
    let photo = table
        .create(&MediaItemDraft {
            title: "Spring recital".to_string(),
            media_type: MediaType::Photo,
            media_url: "https://cdn.example.com/recital.jpg".to_string(),
            category: "performances".to_string(),
            ..MediaItemDraft::default()
        })
        .await
        .unwrap();
    table
        .create(&MediaItemDraft {
            title: "Lesson clip".to_string(),
            media_type: MediaType::Youtube,
            media_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            category: "lecciones".to_string(),
            ..MediaItemDraft::default()
        })
        .await
        .unwrap();

    assert!(media::get_featured(&pool).await.unwrap().is_empty());
    let featured = media::toggle_featured(&pool, photo.id, true).await.unwrap();
    assert!(featured.is_featured);
    assert_eq!(media::get_featured(&pool).await.unwrap().len(), 1);

    let lessons = media::get_by_category(&pool, "lecciones").await.unwrap();
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].title, "Lesson clip");

    let videos = media::get_by_type(&pool, MediaType::Youtube).await.unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(
        videos[0].preview_url().as_deref(),
        Some("https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")
    );

    let none = media::search(&pool, Some(MediaType::Photo), Some("lecciones"))
        .await
        .unwrap();
    assert!(none.is_empty());
    assert_eq!(media::search(&pool, None, None).await.unwrap().len(), 2);
}

#[sqlx::test]
async fn contact_messages_read_state(pool: SqlitePool) {
    let table = messages::table(&pool);
    let message = table
        .create(&ContactMessageDraft {
            name: "Marta".to_string(),
            email: "marta@example.com".to_string(),
            message: "Do you teach cello?".to_string(),
            ..ContactMessageDraft::default()
        })
        .await
        .unwrap();
    assert!(!message.is_read);
    assert_eq!(message.inquiry_type, "general");

    let other = table
        .create(&ContactMessageDraft {
            name: "Leo".to_string(),
            email: "leo@example.com".to_string(),
            message: "Group rates?".to_string(),
            ..ContactMessageDraft::default()
        })
        .await
        .unwrap();

    assert_eq!(messages::get_unread(&pool).await.unwrap().len(), 2);

    let read = messages::mark_as_read(&pool, message.id).await.unwrap();
    assert!(read.is_read);
    assert_eq!(read.admin_response, None);

    let answered = messages::add_response(&pool, other.id, "Yes, ask for details.")
        .await
        .unwrap();
    assert!(answered.is_read);
    assert_eq!(answered.admin_response.as_deref(), Some("Yes, ask for details."));

    assert!(messages::get_unread(&pool).await.unwrap().is_empty());
    assert_eq!(messages::get_read(&pool).await.unwrap().len(), 2);
}

#[sqlx::test]
async fn admin_credentials_and_sessions(pool: SqlitePool) {
    create_admin(&pool, "Teacher@Example.com", "Ms. Rivera", "s3cret")
        .await
        .unwrap();

    assert!(authenticate_credentials(&pool, "teacher@example.com", "wrong")
        .await
        .unwrap()
        .is_none());
    let user = authenticate_credentials(&pool, "teacher@example.com", "s3cret")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.display_name, "Ms. Rivera");

    let token = open_session(&pool, &user).await.unwrap();
    assert_eq!(session_user(&pool, &token).await.unwrap(), Some(user));

    close_session(&pool, &token).await.unwrap();
    assert_eq!(session_user(&pool, &token).await.unwrap(), None);
}

#[sqlx::test]
async fn expired_sessions_are_rejected_and_pruned(pool: SqlitePool) {
    create_admin(&pool, "teacher@example.com", "Ms. Rivera", "s3cret")
        .await
        .unwrap();
    let user = authenticate_credentials(&pool, "teacher@example.com", "s3cret")
        .await
        .unwrap()
        .unwrap();

    let stale = open_session(&pool, &user).await.unwrap();
    sqlx::query("UPDATE sessions SET created_at = ? WHERE token = ?")
        .bind(Utc::now() - Duration::days(SESSION_TTL_DAYS + 1))
        .bind(&stale)
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(session_user(&pool, &stale).await.unwrap(), None);

    let fresh = open_session(&pool, &user).await.unwrap();
    assert_eq!(session_user(&pool, &fresh).await.unwrap(), Some(user));

    let tokens: Vec<(String,)> = sqlx::query_as("SELECT token FROM sessions")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(tokens, vec![(fresh,)]);
}

#[sqlx::test]
async fn seeding_is_idempotent(pool: SqlitePool) {
    let mut config = common::test_config();
    config.seed_services = true;

    db::seed_defaults(&pool, &config).await.unwrap();
    db::seed_defaults(&pool, &config).await.unwrap();

    let admins: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(admins.0, 1);
    assert_eq!(services::table(&pool).get_all().await.unwrap().len(), 4);
    assert!(
        authenticate_credentials(&pool, common::ADMIN_EMAIL, common::ADMIN_PASSWORD)
            .await
            .unwrap()
            .is_some()
    );
}
