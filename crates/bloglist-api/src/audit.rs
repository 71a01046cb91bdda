//! Security audit logging for authentication and ownership events
//!
//! Events go to the "audit" target at INFO level with their JSON form in the
//! `event` field. Rejected-token reasons are recorded here and nowhere else;
//! clients always receive the same 401 body.
//!
//! ```ignore
//! use bloglist_api::audit::{audit_log, AuditEvent};
//!
//! audit_log(&AuditEvent::BlogDeleted {
//!     user_id: requester.user_id,
//!     blog_id: blog.id,
//! });
//! ```
//!
//! Author: hephaex@gmail.com

use axum::http::{header, HeaderMap};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Security audit events
///
/// Raw passwords, password hashes and tokens never appear in an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Account created
    RegistrationSuccess {
        user_id: Uuid,
        username: String,
        ip_address: Option<String>,
    },

    /// Account creation rejected (validation or duplicate username)
    RegistrationFailure {
        username: String,
        reason: String,
        ip_address: Option<String>,
    },

    /// Credentials accepted and a token issued
    LoginSuccess {
        user_id: Uuid,
        username: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Credentials rejected
    LoginFailure {
        username: String,
        reason: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Request rejected by the authorization gate
    InvalidToken {
        ip_address: Option<String>,
        user_agent: Option<String>,
        reason: String,
    },

    /// Authenticated caller tried to modify a blog they do not own
    AccessDenied {
        user_id: Uuid,
        blog_id: Uuid,
        action: String,
        ip_address: Option<String>,
    },

    /// Blog removed
    BlogDeleted { user_id: Uuid, blog_id: Uuid },
}

impl AuditEvent {
    fn message(&self) -> &'static str {
        match self {
            AuditEvent::RegistrationSuccess { .. } => "Registration successful",
            AuditEvent::RegistrationFailure { .. } => "Registration failed",
            AuditEvent::LoginSuccess { .. } => "Login successful",
            AuditEvent::LoginFailure { .. } => "Login failed",
            AuditEvent::InvalidToken { .. } => "Invalid token",
            AuditEvent::AccessDenied { .. } => "Access denied",
            AuditEvent::BlogDeleted { .. } => "Blog deleted",
        }
    }
}

/// Log a security audit event with structured fields
///
/// Example output field `event`:
///
/// ```json
/// {
///   "event_type": "login_failure",
///   "username": "mluukkai",
///   "reason": "invalid password",
///   "ip_address": "192.168.1.1",
///   "user_agent": null
/// }
/// ```
pub fn audit_log(event: &AuditEvent) {
    let timestamp = Utc::now();

    let event_json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(e) => format!(r#"{{"error":"unserializable audit event: {e}"}}"#),
    };

    match event {
        AuditEvent::LoginFailure {
            username, reason, ..
        }
        | AuditEvent::RegistrationFailure {
            username, reason, ..
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                username = %username,
                reason = %reason,
                "{}",
                event.message()
            );
        }
        AuditEvent::InvalidToken {
            ip_address, reason, ..
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                ip_address = ?ip_address,
                reason = %reason,
                "{}",
                event.message()
            );
        }
        _ => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                "{}",
                event.message()
            );
        }
    }
}

fn header_str(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Client address as reported by a proxy
///
/// The first `X-Forwarded-For` hop wins over `X-Real-IP`.
pub fn extract_ip_address(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
        .map(str::to_string)
}

pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    header_str(headers, header::USER_AGENT).map(str::to_string)
}
