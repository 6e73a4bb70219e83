use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::{Entity, Fields, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Testimonial {
    pub id: Uuid,
    pub author_name: String,
    pub content: String,
    pub rating: i32,
    pub date_created: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `rating` falls back to the column default (5) when omitted. The 1..=5
/// range is a table constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonialDraft {
    pub author_name: String,
    pub content: String,
    pub rating: Option<i32>,
}

impl From<&Testimonial> for TestimonialDraft {
    fn from(testimonial: &Testimonial) -> Self {
        Self {
            author_name: testimonial.author_name.clone(),
            content: testimonial.content.clone(),
            rating: Some(testimonial.rating),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonialPatch {
    pub author_name: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i32>,
}

impl From<TestimonialDraft> for TestimonialPatch {
    fn from(draft: TestimonialDraft) -> Self {
        Self {
            author_name: Some(draft.author_name),
            content: Some(draft.content),
            rating: draft.rating,
        }
    }
}

impl Record for TestimonialDraft {
    fn fields(&self) -> Fields {
        Fields::new()
            .with("author_name", self.author_name.clone())
            .with("content", self.content.clone())
            .with("rating", self.rating)
            .with("date_created", Utc::now())
    }
}

impl Record for TestimonialPatch {
    fn fields(&self) -> Fields {
        Fields::new()
            .with_some("author_name", self.author_name.clone())
            .with_some("content", self.content.clone())
            .with_some("rating", self.rating)
    }
}

impl Entity for Testimonial {
    const TABLE: &'static str = "testimonials";

    type Draft = TestimonialDraft;
    type Patch = TestimonialPatch;

    fn id(&self) -> Uuid {
        self.id
    }
}
