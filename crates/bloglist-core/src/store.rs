//! Persistence traits and the in-memory store
//!
//! The traits are the narrow boundary the API layer talks to: create, find,
//! update and delete by id, plus username uniqueness. Projection of public
//! fields happens on the domain types, never in the store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Blog, BlogError, Result, User};

/// User (credential) persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user; fails with `Conflict` if the username is taken
    async fn insert_user(&self, user: &User) -> Result<()>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// All users in creation order
    async fn list_users(&self) -> Result<Vec<User>>;
}

/// Blog persistence
#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn insert_blog(&self, blog: &Blog) -> Result<()>;

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>>;

    /// All blogs in creation order
    async fn list_blogs(&self) -> Result<Vec<Blog>>;

    async fn list_blogs_by_owner(&self, owner_id: Uuid) -> Result<Vec<Blog>>;

    /// Replace the mutable fields of an existing blog. Returns `false` if no
    /// blog has `blog.id`.
    async fn update_blog(&self, blog: &Blog) -> Result<bool>;

    /// Returns `false` if the blog did not exist
    async fn delete_blog(&self, id: Uuid) -> Result<bool>;
}

/// Complete backend used by the server
#[async_trait]
pub trait Store: UserRepository + BlogRepository {
    /// Cheap liveness probe for readiness checks
    async fn ping(&self) -> Result<()>;
}

/// In-memory store for development and tests
///
/// Records keep insertion order. Username uniqueness is checked and the user
/// inserted under a single write lock.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    blogs: RwLock<Vec<Blog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(BlogError::Conflict("username already taken".to_string()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.clone())
    }
}

#[async_trait]
impl BlogRepository for MemoryStore {
    async fn insert_blog(&self, blog: &Blog) -> Result<()> {
        self.blogs.write().await.push(blog.clone());
        Ok(())
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>> {
        let blogs = self.blogs.read().await;
        Ok(blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>> {
        Ok(self.blogs.read().await.clone())
    }

    async fn list_blogs_by_owner(&self, owner_id: Uuid) -> Result<Vec<Blog>> {
        Ok(self
            .blogs
            .read()
            .await
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_blog(&self, blog: &Blog) -> Result<bool> {
        let mut blogs = self.blogs.write().await;
        match blogs.iter_mut().find(|b| b.id == blog.id) {
            Some(existing) => {
                existing.title = blog.title.clone();
                existing.author = blog.author.clone();
                existing.url = blog.url.clone();
                existing.likes = blog.likes;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool> {
        let mut blogs = self.blogs.write().await;
        let before = blogs.len();
        blogs.retain(|b| b.id != id);
        Ok(blogs.len() != before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
