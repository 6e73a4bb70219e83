mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sqlx::SqlitePool;

use music_tutor::{
    data::{blog, services, testimonials},
    models::{
        BlogPost, BlogPostDraft, MediaItem, MediaItemDraft, MediaType, ServiceDraft, ServicePatch,
        TestimonialDraft,
    },
    store::{Filter, StoreError, Table},
};

#[sqlx::test]
async fn create_generates_id_and_timestamps(pool: SqlitePool) {
    let service = common::piano_service(&pool).await;

    assert!(!service.id.is_nil());
    assert_eq!(service.created_at, service.updated_at);
    assert_eq!(service.name, "Piano Lessons");

    let fetched = services::table(&pool).get_by_id(service.id).await.unwrap();
    assert_eq!(fetched, Some(service));
}

#[sqlx::test]
async fn omitted_fields_take_column_defaults(pool: SqlitePool) {
    let testimonial = testimonials::table(&pool)
        .create(&TestimonialDraft {
            author_name: "Marco".to_string(),
            content: "Patient and encouraging.".to_string(),
            rating: None,
        })
        .await
        .unwrap();
    assert_eq!(testimonial.rating, 5);

    let post = blog::table(&pool)
        .create(&BlogPostDraft {
            title: "Practice Habits".to_string(),
            content: "Little and often.".to_string(),
            ..BlogPostDraft::default()
        })
        .await
        .unwrap();
    assert_eq!(post.author.as_deref(), Some("Music Teacher"));
    assert_eq!(post.slug, None);
}

#[sqlx::test]
async fn update_writes_only_patched_fields(pool: SqlitePool) {
    let table = services::table(&pool);
    let service = common::piano_service(&pool).await;

    let updated = table
        .update(
            service.id,
            &ServicePatch {
                price: Some(40.0),
                ..ServicePatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.price, 40.0);
    assert_eq!(updated.name, service.name);
    assert_eq!(updated.description, service.description);
    assert_eq!(updated.created_at, service.created_at);
    assert!(updated.updated_at >= service.updated_at);
}

#[sqlx::test]
async fn patch_can_clear_nullable_column(pool: SqlitePool) {
    let service = common::piano_service(&pool).await;

    let updated = services::table(&pool)
        .update(
            service.id,
            &ServicePatch {
                description: Some(None),
                ..ServicePatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.description, None);
}

#[sqlx::test]
async fn empty_patch_still_touches_updated_at(pool: SqlitePool) {
    let service = common::piano_service(&pool).await;
    let updated = services::table(&pool)
        .update(service.id, &ServicePatch::default())
        .await
        .unwrap();
    assert!(updated.updated_at >= service.updated_at);
    assert_eq!(updated.price, service.price);
}

#[sqlx::test]
async fn update_of_unknown_id_is_row_not_found(pool: SqlitePool) {
    let err = services::table(&pool)
        .update(uuid::Uuid::new_v4(), &ServicePatch::default())
        .await
        .unwrap_err();
    assert!(err.is_row_not_found());
}

#[sqlx::test]
async fn delete_removes_row(pool: SqlitePool) {
    let table = services::table(&pool);
    let service = common::piano_service(&pool).await;

    table.delete(service.id).await.unwrap();

    assert_eq!(table.get_by_id(service.id).await.unwrap(), None);
    assert!(table.get_all().await.unwrap().is_empty());
}

#[sqlx::test]
async fn default_ordering_is_newest_first(pool: SqlitePool) {
    let table = services::table(&pool);
    for name in ["Piano", "Guitar", "Violin"] {
        table
            .create(&ServiceDraft {
                name: name.to_string(),
                price: 30.0,
                ..ServiceDraft::default()
            })
            .await
            .unwrap();
    }

    let rows = table.get_all().await.unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[sqlx::test]
async fn blog_posts_order_by_published_date(pool: SqlitePool) {
    let table = Table::<BlogPost>::new(&pool);
    let now = Utc::now();
    for (title, days_ago) in [("Older", 10), ("Newest", 0), ("Middle", 5)] {
        table
            .create(&BlogPostDraft {
                title: title.to_string(),
                content: "Body".to_string(),
                published_date: Some(now - Duration::days(days_ago)),
                ..BlogPostDraft::default()
            })
            .await
            .unwrap();
    }

    let titles: Vec<String> = table
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|post| post.title)
        .collect();
    assert_eq!(titles, vec!["Newest", "Middle", "Older"]);
}

#[sqlx::test]
async fn filters_compose_and_count(pool: SqlitePool) {
    let table = Table::<MediaItem>::new(&pool);
    for (title, media_type, featured) in [
        ("Recital", MediaType::Photo, true),
        ("Masterclass", MediaType::Youtube, true),
        ("Studio", MediaType::Photo, false),
    ] {
        table
            .create(&MediaItemDraft {
                title: title.to_string(),
                media_type,
                media_url: format!("https://cdn.example.com/{title}.jpg"),
                is_featured: featured,
                tags: vec!["recital".to_string()],
                ..MediaItemDraft::default()
            })
            .await
            .unwrap();
    }

    let filter = Filter::new()
        .eq("media_type", MediaType::Photo)
        .eq("is_featured", true);
    let rows = table.select(filter.clone()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Recital");
    assert_eq!(rows[0].tags.0, vec!["recital".to_string()]);
    assert_eq!(rows[0].category, "general");
    assert_eq!(table.count(filter).await.unwrap(), 1);
    assert_eq!(table.count(Filter::new()).await.unwrap(), 3);

    let first = table
        .select_one(Filter::new().order("title", true))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.title, "Masterclass");
}

#[sqlx::test]
async fn constraint_violations_surface_as_database_errors(pool: SqlitePool) {
    let err = testimonials::table(&pool)
        .create(&TestimonialDraft {
            author_name: "Ana".to_string(),
            content: "Great".to_string(),
            rating: Some(7),
        })
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Database(sqlx::Error::Database(db)) if db.is_check_violation());

    let draft = BlogPostDraft {
        title: "Same".to_string(),
        slug: Some("same".to_string()),
        content: "Body".to_string(),
        ..BlogPostDraft::default()
    };
    blog::table(&pool).create(&draft).await.unwrap();
    let err = blog::table(&pool).create(&draft).await.unwrap_err();
    assert_matches!(err, StoreError::Database(sqlx::Error::Database(db)) if db.is_unique_violation());
}
