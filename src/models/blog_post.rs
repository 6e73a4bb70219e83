use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::{nullable, Entity, Fields, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub published_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogPostDraft {
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
}

impl From<&BlogPost> for BlogPostDraft {
    fn from(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            author: post.author.clone(),
            image_url: post.image_url.clone(),
            published_date: Some(post.published_date),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogPostPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: Option<Option<String>>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub author: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: Option<Option<String>>,
    pub published_date: Option<DateTime<Utc>>,
}

impl From<BlogPostDraft> for BlogPostPatch {
    fn from(draft: BlogPostDraft) -> Self {
        Self {
            title: Some(draft.title),
            slug: Some(draft.slug),
            content: Some(draft.content),
            excerpt: Some(draft.excerpt),
            author: Some(draft.author),
            image_url: Some(draft.image_url),
            published_date: draft.published_date,
        }
    }
}

impl Record for BlogPostDraft {
    fn fields(&self) -> Fields {
        Fields::new()
            .with("title", self.title.clone())
            .with("slug", self.slug.clone())
            .with("content", self.content.clone())
            .with("excerpt", self.excerpt.clone())
            .with("author", self.author.clone())
            .with("image_url", self.image_url.clone())
            .with("published_date", self.published_date.unwrap_or_else(Utc::now))
    }
}

impl Record for BlogPostPatch {
    fn fields(&self) -> Fields {
        Fields::new()
            .with_some("title", self.title.clone())
            .with_some("slug", self.slug.clone())
            .with_some("content", self.content.clone())
            .with_some("excerpt", self.excerpt.clone())
            .with_some("author", self.author.clone())
            .with_some("image_url", self.image_url.clone())
            .with_some("published_date", self.published_date)
    }
}

impl Entity for BlogPost {
    const TABLE: &'static str = "blog_posts";
    const ORDER_BY: &'static str = "published_date DESC";

    type Draft = BlogPostDraft;
    type Patch = BlogPostPatch;

    fn id(&self) -> Uuid {
        self.id
    }
}
