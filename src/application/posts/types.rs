use thiserror::Error;

use crate::application::repos::RepoError;

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error("post not found")]
    NotFound,
    #[error("a post with this {field} already exists")]
    Conflict { field: &'static str },
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for PostServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            // `title` carries the only unique constraint besides the primary key.
            RepoError::Duplicate { .. } => Self::Conflict { field: "title" },
            other => Self::Repo(other),
        }
    }
}
