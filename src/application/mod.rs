//! Application services layer.

pub mod clock;
pub mod error;
pub mod form_token;
pub mod posts;
pub mod repos;
