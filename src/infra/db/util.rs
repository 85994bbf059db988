use crate::application::repos::RepoError;

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Duplicate {
            constraint: db
                .constraint()
                .map(str::to_string)
                .unwrap_or_else(|| db.message().to_string()),
        },
        other => RepoError::from_persistence(other),
    }
}
