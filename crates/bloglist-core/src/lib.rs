//! Bloglist Core - Domain models, storage traits, and shared types
//!
//! This crate defines the core abstractions used throughout Bloglist:
//! - User and blog records and their public projections
//! - Common error types
//! - Persistence traits with in-memory and PostgreSQL backends
//! - Aggregation over blog collections
//! - Configuration management

pub mod config;
pub mod postgres;
pub mod stats;
pub mod store;

pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, OwnershipPolicy,
    ServerConfig,
};
pub use postgres::PgStore;
pub use stats::{
    favorite_blog, most_blogs, most_likes, summarize, total_likes, AuthorBlogs, AuthorLikes,
    BlogStats, Favorite, Rated,
};
pub use store::{BlogRepository, MemoryStore, Store, UserRepository};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Bloglist operations
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BlogError>;

// ============================================================================
// Users
// ============================================================================

/// Registered account
///
/// `password_hash` is write-only from the outside: it is never serialized and
/// only ever compared through the password verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    /// Login name, unique and immutable after creation
    pub username: String,

    /// Display name
    pub name: String,

    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record with a fresh id
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            name: name.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }

    /// Projection safe for API responses
    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }

    /// Minimal owner projection attached to listed blogs
    pub fn to_owner(&self) -> OwnerSummary {
        OwnerSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Public user representation (no credential material)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserPublic {
    pub id: Uuid,
    pub username: String,
    pub name: String,
}

/// User together with the blogs they own
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserWithBlogs {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub blogs: Vec<Blog>,
}

/// Owner projection: id and display name only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
}

// ============================================================================
// Blogs
// ============================================================================

/// Stored blog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u64,

    /// Creator of the record; fixed at creation
    pub owner_id: Uuid,

    pub created_at: DateTime<Utc>,
}

impl Blog {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
        likes: u64,
        owner_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
            url: url.into(),
            likes,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Attach an owner projection for listing
    pub fn with_owner(self, owner: Option<OwnerSummary>) -> BlogWithOwner {
        BlogWithOwner {
            id: self.id,
            title: self.title,
            author: self.author,
            url: self.url,
            likes: self.likes,
            owner,
        }
    }
}

/// Blog as returned by the list endpoint
///
/// `owner` is `None` when the owning account no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlogWithOwner {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: u64,
    pub owner: Option<OwnerSummary>,
}
