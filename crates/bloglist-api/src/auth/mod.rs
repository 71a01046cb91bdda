//! Authentication module
//!
//! This module provides token-based authentication with the following components:
//! - Token generation and validation
//! - Password hashing with Argon2
//! - Middleware for request authentication
//! - Authentication service for registration and login

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use jwt::{generate_access_token, validate_access_token, Claims, JwtConfig, JwtError};
pub use middleware::{auth_middleware, AuthError, AuthenticatedUser};
pub use password::{hash_password_with_config, verify_password, PasswordConfig};
pub use service::{AuthService, LoginRequest, LoginResponse, RegisterRequest};
