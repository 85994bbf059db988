mod commands;
mod queries;
mod service;
pub mod types;
pub mod validation;

pub use service::*;
pub use types::PostServiceError;
pub use validation::{FormErrors, PostDraft, validate_post_form};
