//! Ownership enforcement for blog mutations

use crate::audit::{audit_log, AuditEvent};
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use bloglist_core::{Blog, OwnershipPolicy};
use std::fmt;

/// Mutation being attempted on an existing blog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogAction {
    Update,
    Delete,
}

impl fmt::Display for BlogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlogAction::Update => write!(f, "update"),
            BlogAction::Delete => write!(f, "delete"),
        }
    }
}

/// Decide whether `requester` may perform `action` on `blog`
///
/// | policy       | update                | delete                |
/// |--------------|-----------------------|-----------------------|
/// | `OwnerOnly`  | owner (401/403)       | owner (401/403)       |
/// | `Permissive` | anyone                | any authenticated     |
pub fn authorize(
    policy: OwnershipPolicy,
    action: BlogAction,
    blog: &Blog,
    requester: Option<&AuthenticatedUser>,
    ip_address: Option<String>,
) -> Result<(), AppError> {
    match (policy, action) {
        (OwnershipPolicy::Permissive, BlogAction::Update) => Ok(()),
        (OwnershipPolicy::Permissive, BlogAction::Delete) => {
            requester.map(|_| ()).ok_or(AppError::Unauthorized)
        }
        (OwnershipPolicy::OwnerOnly, _) => {
            let user = requester.ok_or(AppError::Unauthorized)?;
            if user.user_id == blog.owner_id {
                return Ok(());
            }

            audit_log(&AuditEvent::AccessDenied {
                user_id: user.user_id,
                blog_id: blog.id,
                action: action.to_string(),
                ip_address,
            });
            Err(AppError::Forbidden)
        }
    }
}
