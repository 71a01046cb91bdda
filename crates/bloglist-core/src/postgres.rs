//! PostgreSQL store
//!
//! Implements the persistence traits using SQLx and PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::{BlogRepository, Store, UserRepository};
use crate::{Blog, BlogError, Result, User};

const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store connection
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| BlogError::Database(format!("PostgreSQL connection failed: {e}")))?;

        Ok(Self { pool })
    }

    /// Create from an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the bundled schema (idempotent)
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| BlogError::Database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema is up to date");
        Ok(())
    }
}

/// User row from database
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            name: row.name,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// Blog row from database
#[derive(Debug, FromRow)]
struct BlogRow {
    id: Uuid,
    title: String,
    author: String,
    url: String,
    likes: i64,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<BlogRow> for Blog {
    fn from(row: BlogRow) -> Self {
        Blog {
            id: row.id,
            title: row.title,
            author: row.author,
            url: row.url,
            likes: u64::try_from(row.likes).unwrap_or(0),
            owner_id: row.owner_id,
            created_at: row.created_at,
        }
    }
}

fn likes_param(likes: u64) -> Result<i64> {
    i64::try_from(likes)
        .map_err(|_| BlogError::Validation("likes out of range".to_string()))
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                BlogError::Conflict("username already taken".to_string())
            }
            e => BlogError::Database(format!("Failed to create user: {e}")),
        })?;

        Ok(())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BlogError::Database(format!("Failed to fetch user: {e}")))?;

        Ok(row.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BlogError::Database(format!("Failed to fetch user: {e}")))?;

        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, username, name, password_hash, created_at FROM users ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BlogError::Database(format!("Failed to list users: {e}")))?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[async_trait]
impl BlogRepository for PgStore {
    async fn insert_blog(&self, blog: &Blog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO blogs (id, title, author, url, likes, owner_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(blog.id)
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(likes_param(blog.likes)?)
        .bind(blog.owner_id)
        .bind(blog.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| BlogError::Database(format!("Failed to create blog: {e}")))?;

        Ok(())
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>> {
        let row: Option<BlogRow> = sqlx::query_as(
            "SELECT id, title, author, url, likes, owner_id, created_at FROM blogs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BlogError::Database(format!("Failed to fetch blog: {e}")))?;

        Ok(row.map(Blog::from))
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>> {
        let rows: Vec<BlogRow> = sqlx::query_as(
            "SELECT id, title, author, url, likes, owner_id, created_at FROM blogs ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BlogError::Database(format!("Failed to list blogs: {e}")))?;

        Ok(rows.into_iter().map(Blog::from).collect())
    }

    async fn list_blogs_by_owner(&self, owner_id: Uuid) -> Result<Vec<Blog>> {
        let rows: Vec<BlogRow> = sqlx::query_as(
            r#"
            SELECT id, title, author, url, likes, owner_id, created_at
            FROM blogs
            WHERE owner_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BlogError::Database(format!("Failed to list blogs: {e}")))?;

        Ok(rows.into_iter().map(Blog::from).collect())
    }

    async fn update_blog(&self, blog: &Blog) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE blogs
            SET title = $2, author = $3, url = $4, likes = $5
            WHERE id = $1
            "#,
        )
        .bind(blog.id)
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(likes_param(blog.likes)?)
        .execute(&self.pool)
        .await
        .map_err(|e| BlogError::Database(format!("Failed to update blog: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| BlogError::Database(format!("Failed to delete blog: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| BlogError::Database(format!("Database ping failed: {e}")))?;
        Ok(())
    }
}
