//! Response DTOs.
//!
//! Record identifiers are always strings, whichever backend issued them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use brainery_entity::catalog::{CatalogTopic, Subject};
use brainery_entity::identity::Identity;
use brainery_entity::record::{NO_SUMMARY_PLACEHOLDER, Resource, SavedTopic};
use brainery_service::AdminOverview;

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Bare success flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Identity summary. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<Identity> for IdentityResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.id.into_inner(),
            username: identity.username,
            email: identity.email,
            role: identity.role.to_string(),
            created_at: identity.created_at,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Where the client should go next.
    pub landing: String,
    /// Session token, also set as a cookie.
    pub token: String,
    /// Value to echo in `x-csrf-token` on cookie-authenticated mutations.
    pub csrf_token: String,
    /// Session expiry.
    pub expires_at: DateTime<Utc>,
    /// The authenticated identity.
    pub user: IdentityResponse,
}

/// Registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: IdentityResponse,
}

/// Email availability answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckEmailResponse {
    pub exists: bool,
    pub message: String,
}

/// The caller's own session view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_admin: bool,
}

/// Catalog subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id.into_inner(),
            name: subject.name,
            icon: subject.icon.unwrap_or_default(),
        }
    }
}

/// Catalog topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTopicResponse {
    pub title: String,
    pub description: String,
}

impl From<CatalogTopic> for CatalogTopicResponse {
    fn from(topic: CatalogTopic) -> Self {
        Self {
            title: topic.title,
            description: topic.description.unwrap_or_default(),
        }
    }
}

/// Saved topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTopicResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub summary: String,
    pub timestamp: String,
}

impl From<SavedTopic> for SavedTopicResponse {
    fn from(topic: SavedTopic) -> Self {
        let summary = if topic.summary.trim().is_empty() {
            NO_SUMMARY_PLACEHOLDER.to_string()
        } else {
            topic.summary
        };
        Self {
            id: topic.id.into_inner(),
            title: topic.title,
            summary,
            timestamp: timestamp(topic.created_at),
        }
    }
}

/// Result of saving a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTopicResponse {
    pub message: String,
    pub timestamp: String,
    #[serde(rename = "_id")]
    pub id: String,
}

/// Resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Resource> for ResourceResponse {
    fn from(resource: Resource) -> Self {
        Self {
            id: resource.id.into_inner(),
            title: resource.title,
            description: resource.description,
            link: resource.link,
            category: resource.category,
            created_at: resource.created_at,
        }
    }
}

/// Admin dashboard data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOverviewResponse {
    pub users: Vec<IdentityResponse>,
    pub total_users: u64,
    pub admin_users: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl From<AdminOverview> for AdminOverviewResponse {
    fn from(overview: AdminOverview) -> Self {
        let users = overview.users.map(IdentityResponse::from);
        Self {
            total_pages: users.total_pages(),
            page: users.page,
            per_page: users.page_size,
            users: users.items,
            total_users: overview.total_users,
            admin_users: overview.admin_users,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub version: String,
}
