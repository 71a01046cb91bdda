//! Authentication service layer
//!
//! Registration, login and identity resolution on top of the credential
//! store. Argon2 work runs on the blocking pool so it never stalls the async
//! workers.

use super::jwt::{generate_access_token, JwtConfig};
use super::password::{hash_password_with_config, verify_password, PasswordConfig};
use crate::error::AppError;
use bloglist_core::{BlogRepository, Store, User, UserPublic, UserRepository, UserWithBlogs};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "must be at least 3 characters long"))]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 3, message = "must be at least 3 characters long"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub username: String,
    pub name: String,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_config: JwtConfig,
    password_config: PasswordConfig,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(
        store: Arc<dyn Store>,
        jwt_config: JwtConfig,
        password_config: PasswordConfig,
    ) -> Self {
        Self {
            store,
            jwt_config,
            password_config,
        }
    }

    /// Register a new user
    ///
    /// # Returns
    ///
    /// * `Ok(UserPublic)` - Newly created user, without credential material
    /// * `Err(AppError::BadRequest)` - Username or password shorter than 3 characters
    /// * `Err(AppError::Conflict)` - Username already taken
    pub async fn register(&self, request: RegisterRequest) -> Result<UserPublic, AppError> {
        request.validate()?;

        if self
            .store
            .find_user_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("username must be unique".to_string()));
        }

        let config = self.password_config.clone();
        let RegisterRequest {
            username,
            name,
            password,
        } = request;
        let hashing = move || hash_password_with_config(&password, &config);
        let password_hash = tokio::task::spawn_blocking(hashing)
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))?
            .map_err(|e| AppError::Internal(e.to_string()))?;

        // The store re-checks uniqueness atomically for concurrent registrations
        let user = User::new(username, name, password_hash);
        self.store.insert_user(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user.to_public())
    }

    /// Check credentials and issue an access token
    ///
    /// Unknown username and wrong password produce the same error.
    pub async fn login(&self, request: LoginRequest) -> Result<(User, LoginResponse), AppError> {
        let user = self
            .store
            .find_user_by_username(&request.username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let stored_hash = user.password_hash.clone();
        let password = request.password;
        let verification = move || verify_password(&password, &stored_hash);
        let password_valid = tokio::task::spawn_blocking(verification)
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {e}")))?;

        if !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = generate_access_token(&self.jwt_config, user.id, &user.username)
            .map_err(|e| AppError::Internal(format!("Failed to generate access token: {e}")))?;

        let response = LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_config.access_expiration_secs,
            username: user.username.clone(),
            name: user.name.clone(),
        };

        Ok((user, response))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.store.find_user_by_username(username).await?)
    }

    /// Re-fetch the subject of a verified token
    pub async fn resolve(&self, user_id: Uuid) -> bloglist_core::Result<Option<User>> {
        self.store.find_user_by_id(user_id).await
    }

    /// Every user with the blogs they own
    pub async fn list_users_with_blogs(&self) -> Result<Vec<UserWithBlogs>, AppError> {
        let users = self.store.list_users().await?;
        let mut result = Vec::with_capacity(users.len());

        for user in users {
            let blogs = self.store.list_blogs_by_owner(user.id).await?;
            result.push(UserWithBlogs {
                id: user.id,
                username: user.username,
                name: user.name,
                blogs,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::validate_access_token;
    use bloglist_core::{Blog, MemoryStore};

    fn service() -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = AuthService::new(
            store.clone(),
            JwtConfig::default(),
            PasswordConfig::minimal(),
        );
        (service, store)
    }

    fn register_request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            name: "Matti Luukkainen".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let (service, _) = service();

        let user = service
            .register(register_request("mluukkai", "salainen"))
            .await
            .unwrap();
        assert_eq!(user.username, "mluukkai");

        let (found, response) = service
            .login(LoginRequest {
                username: "mluukkai".to_string(),
                password: "salainen".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(found.id, user.id);
        assert_eq!(response.token_type, "Bearer");
        let found_id = service.find_by_username("mluukkai").await.unwrap();
        assert_eq!(found_id.map(|u| u.id), Some(user.id));
        assert!(service.find_by_username("nobody").await.unwrap().is_none());
        let claims = validate_access_token(&JwtConfig::default(), &response.token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "mluukkai");
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let (service, store) = service();
        service
            .register(register_request("root", "sekret"))
            .await
            .unwrap();

        let stored = store.find_user_by_username("root").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "sekret");
        assert!(verify_password("sekret", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_validation() {
        let (service, store) = service();

        let short_username = service.register(register_request("ab", "sekret")).await;
        assert!(matches!(short_username, Err(AppError::BadRequest(_))));

        let short_password = service.register(register_request("root", "pw")).await;
        assert!(matches!(short_password, Err(AppError::BadRequest(_))));

        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let (service, store) = service();
        service
            .register(register_request("root", "sekret"))
            .await
            .unwrap();

        let result = service.register(register_request("root", "other")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = service();
        service
            .register(register_request("root", "sekret"))
            .await
            .unwrap();

        let wrong_password = service
            .login(LoginRequest {
                username: "root".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        let unknown_user = service
            .login(LoginRequest {
                username: "nobody".to_string(),
                password: "sekret".to_string(),
            })
            .await;

        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_list_users_with_blogs() {
        let (service, store) = service();
        let user = service
            .register(register_request("root", "sekret"))
            .await
            .unwrap();
        store
            .insert_blog(&Blog::new("Kalat", "Karppi Koski", "something.com", 3, user.id))
            .await
            .unwrap();

        let users = service.list_users_with_blogs().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].blogs.len(), 1);
        assert_eq!(users[0].blogs[0].title, "Kalat");

        let json = serde_json::to_string(&users).unwrap();
        assert!(!json.contains("password_hash"));
    }
}
