//! Application state management
//!
//! Author: hephaex@gmail.com

use crate::auth::{AuthService, JwtConfig, PasswordConfig};
use crate::blogs::BlogService;
use bloglist_core::config::AppConfig;
use bloglist_core::{MemoryStore, Store};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Persistence backend
    pub store: Arc<dyn Store>,
    /// Token signing and verification settings
    pub jwt_config: JwtConfig,
    /// Registration, login and identity resolution
    pub auth: AuthService,
    /// Blog CRUD with ownership rules
    pub blogs: BlogService,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
}

impl AppState {
    /// Create application state over `store`
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Self {
        Self::with_password_config(config, store, None)
    }

    /// Like [`AppState::new`], overriding the Argon2 cost parameters
    pub fn with_password_config(
        config: AppConfig,
        store: Arc<dyn Store>,
        password_config: Option<PasswordConfig>,
    ) -> Self {
        let jwt_config = JwtConfig::from(&config.auth);
        let password_config =
            password_config.unwrap_or_else(|| PasswordConfig::from(&config.auth));
        let auth = AuthService::new(store.clone(), jwt_config.clone(), password_config);
        let blogs = BlogService::new(store.clone(), config.auth.ownership_policy);

        Self {
            config,
            store,
            jwt_config,
            auth,
            blogs,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default(), Arc::new(MemoryStore::new()))
    }
}
