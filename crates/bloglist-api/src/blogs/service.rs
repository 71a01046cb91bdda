//! Blog service layer
//!
//! Create, list, update and delete blogs with payload validation and
//! ownership checks. The owner of a new blog is always the authenticated
//! caller; owner fields in the payload are ignored.

use super::ownership::{authorize, BlogAction};
use crate::audit::{audit_log, AuditEvent};
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use bloglist_core::{
    Blog, BlogRepository, BlogWithOwner, OwnerSummary, OwnershipPolicy, Store, UserRepository,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Blog create/update request body
///
/// Missing or `null` likes default to 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct BlogPayload {
    #[validate(
        required(message = "title is required"),
        length(min = 1, message = "title must not be empty")
    )]
    pub title: Option<String>,

    #[validate(required(message = "author is required"))]
    pub author: Option<String>,

    #[validate(
        required(message = "url is required"),
        length(min = 1, message = "url must not be empty")
    )]
    pub url: Option<String>,

    #[validate(range(min = 0, message = "likes must not be negative"))]
    pub likes: Option<i64>,
}

/// Validated blog fields
struct BlogFields {
    title: String,
    author: String,
    url: String,
    likes: u64,
}

impl BlogPayload {
    fn into_fields(self) -> Result<BlogFields, AppError> {
        self.validate()?;

        let likes = u64::try_from(self.likes.unwrap_or(0))
            .map_err(|_| AppError::BadRequest("likes must not be negative".to_string()))?;

        Ok(BlogFields {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            likes,
        })
    }
}

/// Blog service
#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn Store>,
    policy: OwnershipPolicy,
}

impl BlogService {
    pub fn new(store: Arc<dyn Store>, policy: OwnershipPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> OwnershipPolicy {
        self.policy
    }

    /// Create a blog owned by `owner`
    pub async fn create(
        &self,
        payload: BlogPayload,
        owner: &AuthenticatedUser,
    ) -> Result<Blog, AppError> {
        let fields = payload.into_fields()?;
        let blog = Blog::new(
            fields.title,
            fields.author,
            fields.url,
            fields.likes,
            owner.user_id,
        );

        self.store.insert_blog(&blog).await?;
        tracing::info!(blog_id = %blog.id, owner_id = %owner.user_id, "Blog created");
        Ok(blog)
    }

    /// All blogs with their owner projection
    pub async fn list(&self) -> Result<Vec<BlogWithOwner>, AppError> {
        let blogs = self.store.list_blogs().await?;
        let owners: HashMap<Uuid, OwnerSummary> = self
            .store
            .list_users()
            .await?
            .iter()
            .map(|user| (user.id, user.to_owner()))
            .collect();

        Ok(blogs
            .into_iter()
            .map(|blog| {
                let owner = owners.get(&blog.owner_id).cloned();
                blog.with_owner(owner)
            })
            .collect())
    }

    /// Raw stored blogs, for aggregation
    pub async fn all(&self) -> Result<Vec<Blog>, AppError> {
        Ok(self.store.list_blogs().await?)
    }

    /// Replace title, author, url and likes of an existing blog
    pub async fn update(
        &self,
        id: Uuid,
        payload: BlogPayload,
        requester: Option<&AuthenticatedUser>,
        ip_address: Option<String>,
    ) -> Result<Blog, AppError> {
        let mut blog = self.find(id).await?;
        authorize(
            self.policy,
            BlogAction::Update,
            &blog,
            requester,
            ip_address,
        )?;

        let fields = payload.into_fields()?;
        blog.title = fields.title;
        blog.author = fields.author;
        blog.url = fields.url;
        blog.likes = fields.likes;

        if !self.store.update_blog(&blog).await? {
            return Err(AppError::NotFound("Blog".to_string()));
        }

        tracing::info!(blog_id = %blog.id, "Blog updated");
        Ok(blog)
    }

    /// Remove a blog
    pub async fn delete(
        &self,
        id: Uuid,
        requester: &AuthenticatedUser,
        ip_address: Option<String>,
    ) -> Result<(), AppError> {
        let blog = self.find(id).await?;
        authorize(
            self.policy,
            BlogAction::Delete,
            &blog,
            Some(requester),
            ip_address,
        )?;

        if !self.store.delete_blog(id).await? {
            return Err(AppError::NotFound("Blog".to_string()));
        }

        audit_log(&AuditEvent::BlogDeleted {
            user_id: requester.user_id,
            blog_id: id,
        });
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Blog, AppError> {
        self.store
            .find_blog(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog".to_string()))
    }
}
