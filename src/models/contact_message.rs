use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::store::{nullable, Entity, Fields, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub inquiry_type: String,
    pub is_read: bool,
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactMessageDraft {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Message is required."))]
    pub message: String,
    #[serde(default = "default_inquiry_type")]
    pub inquiry_type: String,
    #[serde(default)]
    pub is_read: bool,
    pub admin_response: Option<String>,
}

fn default_inquiry_type() -> String {
    "general".to_string()
}

impl Default for ContactMessageDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: None,
            message: String::new(),
            inquiry_type: default_inquiry_type(),
            is_read: false,
            admin_response: None,
        }
    }
}

impl From<&ContactMessage> for ContactMessageDraft {
    fn from(message: &ContactMessage) -> Self {
        Self {
            name: message.name.clone(),
            email: message.email.clone(),
            phone: message.phone.clone(),
            message: message.message.clone(),
            inquiry_type: message.inquiry_type.clone(),
            is_read: message.is_read,
            admin_response: message.admin_response.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactMessagePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    pub message: Option<String>,
    pub inquiry_type: Option<String>,
    pub is_read: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub admin_response: Option<Option<String>>,
}

impl From<ContactMessageDraft> for ContactMessagePatch {
    fn from(draft: ContactMessageDraft) -> Self {
        Self {
            name: Some(draft.name),
            email: Some(draft.email),
            phone: Some(draft.phone),
            message: Some(draft.message),
            inquiry_type: Some(draft.inquiry_type),
            is_read: Some(draft.is_read),
            admin_response: Some(draft.admin_response),
        }
    }
}

impl Record for ContactMessageDraft {
    fn fields(&self) -> Fields {
        Fields::new()
            .with("name", self.name.clone())
            .with("email", self.email.clone())
            .with("phone", self.phone.clone())
            .with("message", self.message.clone())
            .with("inquiry_type", self.inquiry_type.clone())
            .with("is_read", self.is_read)
            .with("admin_response", self.admin_response.clone())
    }
}

impl Record for ContactMessagePatch {
    fn fields(&self) -> Fields {
        Fields::new()
            .with_some("name", self.name.clone())
            .with_some("email", self.email.clone())
            .with_some("phone", self.phone.clone())
            .with_some("message", self.message.clone())
            .with_some("inquiry_type", self.inquiry_type.clone())
            .with_some("is_read", self.is_read)
            .with_some("admin_response", self.admin_response.clone())
    }
}

impl Entity for ContactMessage {
    const TABLE: &'static str = "contact_messages";

    type Draft = ContactMessageDraft;
    type Patch = ContactMessagePatch;

    fn id(&self) -> Uuid {
        self.id
    }
}
