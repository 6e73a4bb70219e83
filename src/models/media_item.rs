use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use super::MediaType;
use crate::media;
use crate::store::{nullable, Entity, Fields, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MediaItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub media_type: MediaType,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub category: String,
    pub tags: Json<Vec<String>>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MediaItem {
    /// Explicit thumbnail, else the platform still for YouTube items, else
    /// the media itself for photos.
    pub fn preview_url(&self) -> Option<String> {
        if let Some(thumbnail) = &self.thumbnail_url {
            return Some(thumbnail.clone());
        }
        match self.media_type {
            MediaType::Photo => Some(self.media_url.clone()),
            MediaType::Youtube => media::youtube_id(&self.media_url).map(|id| media::youtube_thumbnail(&id)),
            MediaType::Video | MediaType::Instagram => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItemDraft {
    pub title: String,
    pub description: Option<String>,
    pub media_type: MediaType,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

pub fn default_category() -> String {
    "general".to_string()
}

impl Default for MediaItemDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            media_type: MediaType::Photo,
            media_url: String::new(),
            thumbnail_url: None,
            category: default_category(),
            tags: Vec::new(),
            is_featured: false,
        }
    }
}

impl From<&MediaItem> for MediaItemDraft {
    fn from(item: &MediaItem) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            media_type: item.media_type,
            media_url: item.media_url.clone(),
            thumbnail_url: item.thumbnail_url.clone(),
            category: item.category.clone(),
            tags: item.tags.0.clone(),
            is_featured: item.is_featured,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaItemPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub media_type: Option<MediaType>,
    pub media_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub thumbnail_url: Option<Option<String>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
}

impl MediaItemPatch {
    pub fn featured(is_featured: bool) -> Self {
        Self {
            is_featured: Some(is_featured),
            ..Self::default()
        }
    }
}

impl From<MediaItemDraft> for MediaItemPatch {
    fn from(draft: MediaItemDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            media_type: Some(draft.media_type),
            media_url: Some(draft.media_url),
            thumbnail_url: Some(draft.thumbnail_url),
            category: Some(draft.category),
            tags: Some(draft.tags),
            is_featured: Some(draft.is_featured),
        }
    }
}

impl Record for MediaItemDraft {
    fn fields(&self) -> Fields {
        Fields::new()
            .with("title", self.title.clone())
            .with("description", self.description.clone())
            .with("media_type", self.media_type)
            .with("media_url", self.media_url.clone())
            .with("thumbnail_url", self.thumbnail_url.clone())
            .with("category", self.category.clone())
            .with("tags", self.tags.clone())
            .with("is_featured", self.is_featured)
    }
}

impl Record for MediaItemPatch {
    fn fields(&self) -> Fields {
        Fields::new()
            .with_some("title", self.title.clone())
            .with_some("description", self.description.clone())
            .with_some("media_type", self.media_type)
            .with_some("media_url", self.media_url.clone())
            .with_some("thumbnail_url", self.thumbnail_url.clone())
            .with_some("category", self.category.clone())
            .with_some("tags", self.tags.clone())
            .with_some("is_featured", self.is_featured)
    }
}

impl Entity for MediaItem {
    const TABLE: &'static str = "media_gallery";

    type Draft = MediaItemDraft;
    type Patch = MediaItemPatch;

    fn id(&self) -> Uuid {
        self.id
    }
}
