use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::{nullable, Entity, Fields, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_minutes: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default = "default_duration")]
    pub duration_minutes: i32,
    pub image_url: Option<String>,
}

fn default_duration() -> i32 {
    60
}

impl Default for ServiceDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            price: 0.0,
            duration_minutes: default_duration(),
            image_url: None,
        }
    }
}

impl From<&Service> for ServiceDraft {
    fn from(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            description: service.description.clone(),
            price: service.price,
            duration_minutes: service.duration_minutes,
            image_url: service.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub duration_minutes: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: Option<Option<String>>,
}

impl From<ServiceDraft> for ServicePatch {
    fn from(draft: ServiceDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            price: Some(draft.price),
            duration_minutes: Some(draft.duration_minutes),
            image_url: Some(draft.image_url),
        }
    }
}

impl Record for ServiceDraft {
    fn fields(&self) -> Fields {
        Fields::new()
            .with("name", self.name.clone())
            .with("description", self.description.clone())
            .with("price", self.price)
            .with("duration_minutes", self.duration_minutes)
            .with("image_url", self.image_url.clone())
    }
}

impl Record for ServicePatch {
    fn fields(&self) -> Fields {
        Fields::new()
            .with_some("name", self.name.clone())
            .with_some("description", self.description.clone())
            .with_some("price", self.price)
            .with_some("duration_minutes", self.duration_minutes)
            .with_some("image_url", self.image_url.clone())
    }
}

impl Entity for Service {
    const TABLE: &'static str = "services";

    type Draft = ServiceDraft;
    type Patch = ServicePatch;

    fn id(&self) -> Uuid {
        self.id
    }
}
