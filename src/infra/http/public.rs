use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Response,
    routing::get,
};

use crate::presentation::views::{
    AboutTemplate, AboutView, IndexTemplate, IndexView, LayoutContext, PostCard,
    PostDetailView, PostTemplate, render_not_found_response, render_template_response,
};

use super::{
    HttpState, db_health_response, editor,
    middleware::{log_responses, set_request_context},
    post_error_response,
};

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/post/{id}", get(post_detail))
        .route("/about", get(about))
        .route("/_health/db", get(public_health))
        .merge(editor::routes())
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome();

    match state.posts.list_all().await {
        Ok(posts) => {
            let content = IndexView {
                posts: posts.iter().map(PostCard::from).collect(),
            };
            let view = LayoutContext::new(chrome, content);
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => post_error_response(chrome, err),
    }
}

async fn post_detail(State(state): State<HttpState>, Path(id): Path<i64>) -> Response {
    let chrome = state.chrome();

    match state.posts.get(id).await {
        Ok(post) => {
            let chrome = chrome.with_page_title(&post.title);
            let view = LayoutContext::new(chrome, PostDetailView::from(&post));
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Err(err) => post_error_response(chrome, err),
    }
}

async fn about(State(state): State<HttpState>) -> Response {
    let view = LayoutContext::new(state.chrome().with_page_title("About"), AboutView);
    render_template_response(AboutTemplate { view }, StatusCode::OK)
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}

async fn fallback(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.chrome())
}
