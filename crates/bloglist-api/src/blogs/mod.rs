//! Blog records: service layer and ownership rules

pub mod ownership;
pub mod service;

pub use ownership::{authorize, BlogAction};
pub use service::{BlogPayload, BlogService};
