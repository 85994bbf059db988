use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::{form_token::FormTokenError, posts::PostServiceError},
    infra::error::InfraError,
};

/// Diagnostic detail attached to a response so the logging middleware can
/// report the full error chain without exposing it to the client.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = Vec::new();
        messages.push(error.to_string());
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn new(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        let report = ErrorReport::from_message(source, status, detail);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn public_message(&self) -> &'static str {
        self.public_message
    }

    pub fn into_report(self) -> ErrorReport {
        self.report
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

impl From<PostServiceError> for HttpError {
    fn from(error: PostServiceError) -> Self {
        const SOURCE: &str = "application::error::post_error_to_http_error";
        match error {
            PostServiceError::NotFound => HttpError::new(
                SOURCE,
                StatusCode::NOT_FOUND,
                "Post not found",
                "No post matches the requested id",
            ),
            PostServiceError::Conflict { .. } => HttpError::from_error(
                SOURCE,
                StatusCode::CONFLICT,
                "A post with this title already exists",
                &error,
            ),
            PostServiceError::Repo(ref err) => HttpError::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                err,
            ),
        }
    }
}

impl From<FormTokenError> for HttpError {
    fn from(error: FormTokenError) -> Self {
        HttpError::from_error(
            "application::error::form_token_to_http_error",
            StatusCode::BAD_REQUEST,
            "The form has expired or is invalid. Reload the page and try again.",
            &error,
        )
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Infra(InfraError::Database { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Infra(_) | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn presentation_message(&self) -> &'static str {
        match self {
            AppError::Infra(InfraError::Database { .. }) => "Service temporarily unavailable",
            AppError::Infra(InfraError::Configuration(_)) => "Service misconfigured",
            AppError::Infra(InfraError::Telemetry(_)) => "Logging subsystem could not start",
            AppError::Infra(InfraError::Bind { .. }) => "Listener could not start",
            AppError::Unexpected(_) => "Unexpected error occurred",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.presentation_message();
        let report = ErrorReport::from_error("application::error::AppError", status, &self);
        let mut response = (status, message).into_response();
        report.attach(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::repos::RepoError;

    #[test]
    fn post_errors_map_to_expected_statuses() {
        let not_found = HttpError::from(PostServiceError::NotFound);
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict = HttpError::from(PostServiceError::Conflict { field: "title" });
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let repo = HttpError::from(PostServiceError::Repo(RepoError::Persistence(
            "disk full".into(),
        )));
        assert_eq!(repo.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(repo.into_report().messages, ["persistence error: disk full"]);
    }

    #[test]
    fn report_collects_source_chain() {
        let err = AppError::from(InfraError::database("connect", sqlx::Error::PoolTimedOut));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert!(report.messages[0].starts_with("database connect failed: "));
        assert_eq!(report.messages.len(), 2);
    }

    #[test]
    fn configuration_errors_keep_the_offending_key() {
        let load = crate::config::LoadError::Invalid {
            key: "security.secret_key",
            reason: "a secret key is required".into(),
        };
        let response = AppError::from(InfraError::from(load)).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert!(report.messages[0].contains("security.secret_key"));
    }
}
