mod editor;
mod forms;
mod middleware;
mod public;

pub use middleware::{REQUEST_ID_HEADER, RequestContext};
pub use public::build_router;

use std::sync::Arc;

use axum::http::{StatusCode, header::LOCATION};
use axum::response::{IntoResponse, Response};
use sqlx::Error as SqlxError;

use crate::application::error::{ErrorReport, HttpError};
use crate::application::form_token::FormTokenSigner;
use crate::application::posts::{PostService, PostServiceError};
use crate::infra::db::SqliteRepositories;
use crate::presentation::views::{
    LayoutChrome, render_error_response, render_not_found_response,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct HttpState {
    pub posts: PostService,
    pub tokens: Arc<FormTokenSigner>,
    pub db: Arc<SqliteRepositories>,
    pub site_title: Arc<str>,
}

impl HttpState {
    pub(crate) fn chrome(&self) -> LayoutChrome {
        LayoutChrome::new(&self.site_title)
    }
}

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Map a post service failure onto a rendered error page.
fn post_error_response(chrome: LayoutChrome, err: PostServiceError) -> Response {
    match err {
        PostServiceError::NotFound => render_not_found_response(chrome),
        other => render_error_response(chrome, HttpError::from(other)),
    }
}

/// `302 Found`, the status browsers follow with a GET after a form submission.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
