//! Handlers behind the create, edit and delete forms.
//!
//! Every POST checks the form token before anything else, so a rejected
//! submission never reaches the store.

use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
};

use crate::application::error::HttpError;
use crate::application::posts::{
    FormErrors, PostDraft, PostServiceError, validate_post_form, validation::FIELD_TITLE,
};
use crate::domain::posts::PostFields;
use crate::presentation::views::{
    DeletePostTemplate, DeletePostView, LayoutContext, MakePostTemplate, PostFormView,
    render_error_response, render_template_response,
};

use super::{
    HttpState,
    forms::{DeleteForm, PostForm},
    found, post_error_response,
};

const MSG_TITLE_TAKEN: &str = "A post with this title already exists.";

pub(super) fn routes() -> Router<HttpState> {
    Router::new()
        .route("/new_post", get(new_post_form).post(create_post))
        .route("/edit-post/{id}", get(edit_post_form).post(update_post))
        .route("/delete/{id}", get(delete_confirmation).post(delete_post))
}

enum FormMode {
    Create,
    Edit(i64),
}

fn render_post_form(
    state: &HttpState,
    mode: FormMode,
    draft: &PostDraft,
    errors: &FormErrors,
) -> Response {
    let token = state.tokens.issue();
    let (chrome, content) = match mode {
        FormMode::Create => (
            state.chrome().with_page_title("New Post"),
            PostFormView::create(draft, errors, token),
        ),
        FormMode::Edit(id) => (
            state.chrome().with_page_title("Edit Post"),
            PostFormView::edit(id, draft, errors, token),
        ),
    };
    let view = LayoutContext::new(chrome, content);
    render_template_response(MakePostTemplate { view }, StatusCode::OK)
}

fn rejected_token(state: &HttpState, token: Option<&str>) -> Option<Response> {
    state
        .tokens
        .verify(token)
        .err()
        .map(|err| render_error_response(state.chrome(), HttpError::from(err)))
}

async fn new_post_form(State(state): State<HttpState>) -> Response {
    render_post_form(
        &state,
        FormMode::Create,
        &PostDraft::default(),
        &FormErrors::new(),
    )
}

async fn create_post(State(state): State<HttpState>, Form(form): Form<PostForm>) -> Response {
    let (draft, token) = form.into_parts();
    if let Some(response) = rejected_token(&state, token.as_deref()) {
        return response;
    }

    let fields = match validate_post_form(&draft) {
        Ok(fields) => fields,
        Err(errors) => return render_post_form(&state, FormMode::Create, &draft, &errors),
    };

    match state.posts.create(fields).await {
        Ok(_) => found("/"),
        Err(PostServiceError::Conflict { .. }) => render_post_form(
            &state,
            FormMode::Create,
            &draft,
            &FormErrors::single(FIELD_TITLE, MSG_TITLE_TAKEN),
        ),
        Err(err) => post_error_response(state.chrome(), err),
    }
}

async fn edit_post_form(State(state): State<HttpState>, Path(id): Path<i64>) -> Response {
    match state.posts.get(id).await {
        Ok(post) => {
            let draft = PostDraft::from(&PostFields::from(&post));
            render_post_form(&state, FormMode::Edit(id), &draft, &FormErrors::new())
        }
        Err(err) => post_error_response(state.chrome(), err),
    }
}

async fn update_post(
    State(state): State<HttpState>,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Response {
    let (draft, token) = form.into_parts();
    if let Some(response) = rejected_token(&state, token.as_deref()) {
        return response;
    }

    if let Err(err) = state.posts.get(id).await {
        return post_error_response(state.chrome(), err);
    }

    let fields = match validate_post_form(&draft) {
        Ok(fields) => fields,
        Err(errors) => return render_post_form(&state, FormMode::Edit(id), &draft, &errors),
    };

    match state.posts.update(id, fields).await {
        Ok(post) => found(&format!("/post/{}", post.id)),
        Err(PostServiceError::Conflict { .. }) => render_post_form(
            &state,
            FormMode::Edit(id),
            &draft,
            &FormErrors::single(FIELD_TITLE, MSG_TITLE_TAKEN),
        ),
        Err(err) => post_error_response(state.chrome(), err),
    }
}

async fn delete_confirmation(State(state): State<HttpState>, Path(id): Path<i64>) -> Response {
    match state.posts.get(id).await {
        Ok(post) => {
            let content = DeletePostView {
                id: post.id,
                title: post.title,
                csrf_token: state.tokens.issue(),
            };
            let view = LayoutContext::new(state.chrome().with_page_title("Delete Post"), content);
            render_template_response(DeletePostTemplate { view }, StatusCode::OK)
        }
        Err(err) => post_error_response(state.chrome(), err),
    }
}

async fn delete_post(
    State(state): State<HttpState>,
    Path(id): Path<i64>,
    Form(form): Form<DeleteForm>,
) -> Response {
    if let Some(response) = rejected_token(&state, form.csrf_token.as_deref()) {
        return response;
    }

    match state.posts.delete(id).await {
        Ok(()) => found("/"),
        Err(err) => post_error_response(state.chrome(), err),
    }
}
