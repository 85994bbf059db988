use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use quire::application::clock::Clock;
use quire::application::form_token::FormTokenSigner;
use quire::application::posts::PostService;
use quire::application::repos::{PostsRepo, PostsWriteRepo};
use quire::infra::db::SqliteRepositories;
use quire::infra::http::{HttpState, REQUEST_ID_HEADER, build_router};
use sqlx::SqlitePool;
use time::{Date, macros::date};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";
const VALID_IMAGE: &str = "http%3A%2F%2Fe.com%2Fi.png";

struct FixedClock(Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}

struct TestApp {
    router: Router,
    posts: PostService,
    tokens: FormTokenSigner,
}

impl TestApp {
    fn new(pool: SqlitePool) -> Self {
        let repositories = Arc::new(SqliteRepositories::new(pool));
        let reader: Arc<dyn PostsRepo> = repositories.clone();
        let writer: Arc<dyn PostsWriteRepo> = repositories.clone();
        let posts = PostService::new(
            reader,
            writer,
            Arc::new(FixedClock(date!(2024 - 04 - 05))),
        );
        let tokens = FormTokenSigner::new(SECRET);

        let state = HttpState {
            posts: posts.clone(),
            tokens: Arc::new(tokens.clone()),
            db: repositories,
            site_title: Arc::from("Quire"),
        };

        Self {
            router: build_router(state),
            posts,
            tokens,
        }
    }

    async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request should build");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond")
    }

    async fn post_form(&self, uri: &str, body: String) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request should build");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond")
    }

    fn post_body(&self, title: &str) -> String {
        format!(
            "title={title}&subtitle=s&author=x&image_url={VALID_IMAGE}&body=%3Cp%3Eb%3C%2Fp%3E&csrf_token={}",
            self.tokens.issue()
        )
    }
}

async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
}

#[sqlx::test(migrations = "./migrations")]
async fn index_lists_stored_posts(pool: SqlitePool) {
    let app = TestApp::new(pool);
    app.post_form("/new_post", app.post_body("Hello")).await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));

    let html = body_text(response).await;
    assert!(html.contains("Hello"));
    assert!(html.contains("April 05, 2024"));
    assert!(html.contains("/post/1"));
}

#[sqlx::test(migrations = "./migrations")]
async fn create_redirects_home_and_stores_post(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let response = app.post_form("/new_post", app.post_body("Hello")).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    let post = app.posts.get(1).await.expect("post stored");
    assert_eq!(post.title, "Hello");
    assert_eq!(post.img_url, "http://e.com/i.png");
    assert_eq!(post.body, "<p>b</p>");
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_title_rerenders_form_without_storing(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let response = app.post_form("/new_post", app.post_body("")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains(r#"value="s""#));
    assert_eq!(app.posts.count().await.expect("count"), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn invalid_image_url_is_reported(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let body = format!(
        "title=T&subtitle=s&author=x&image_url=not-a-url&body=b&csrf_token={}",
        app.tokens.issue()
    );

    let response = app.post_form("/new_post", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid URL."));
    assert_eq!(app.posts.count().await.expect("count"), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_title_rerenders_with_title_error(pool: SqlitePool) {
    let app = TestApp::new(pool);
    app.post_form("/new_post", app.post_body("Same")).await;

    let response = app.post_form("/new_post", app.post_body("Same")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains("A post with this title already exists.")
    );
    assert_eq!(app.posts.count().await.expect("count"), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn missing_or_forged_token_is_rejected(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let without_token = format!("title=T&subtitle=s&author=x&image_url={VALID_IMAGE}&body=b");
    let forged = FormTokenSigner::new("some-other-secret-key").issue();
    let with_forged = format!("{without_token}&csrf_token={forged}");

    for body in [without_token, with_forged] {
        let response = app.post_form("/new_post", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(app.posts.count().await.expect("count"), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn show_renders_detail_and_unknown_ids_are_404(pool: SqlitePool) {
    let app = TestApp::new(pool);
    app.post_form("/new_post", app.post_body("Hello")).await;

    let response = app.get("/post/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<p>b</p>"));
    assert!(html.contains("Posted by x on April 05, 2024"));

    assert_eq!(app.get("/post/99").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/post/abc").await.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn edit_form_is_prefilled_and_update_redirects_to_post(pool: SqlitePool) {
    let app = TestApp::new(pool);
    app.post_form("/new_post", app.post_body("Before")).await;

    let form = app.get("/edit-post/1").await;
    assert_eq!(form.status(), StatusCode::OK);
    let html = body_text(form).await;
    assert!(html.contains(r#"value="Before""#));
    assert!(html.contains(r#"action="/edit-post/1""#));

    let response = app.post_form("/edit-post/1", app.post_body("After")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/post/1");

    let post = app.posts.get(1).await.expect("post exists");
    assert_eq!(post.title, "After");
    assert_eq!(post.date, "April 05, 2024");
}

#[sqlx::test(migrations = "./migrations")]
async fn editing_unknown_post_is_404(pool: SqlitePool) {
    let app = TestApp::new(pool);

    assert_eq!(app.get("/edit-post/7").await.status(), StatusCode::NOT_FOUND);
    let response = app.post_form("/edit-post/7", app.post_body("Ghost")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.posts.count().await.expect("count"), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn renaming_onto_another_title_rerenders_edit_form(pool: SqlitePool) {
    let app = TestApp::new(pool);
    app.post_form("/new_post", app.post_body("First")).await;
    app.post_form("/new_post", app.post_body("Second")).await;

    let response = app.post_form("/edit-post/2", app.post_body("First")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("A post with this title already exists."));
    assert!(html.contains(r#"action="/edit-post/2""#));
    assert_eq!(app.posts.get(1).await.expect("first").title, "First");
    assert_eq!(app.posts.get(2).await.expect("second").title, "Second");
}

#[sqlx::test(migrations = "./migrations")]
async fn invalid_edit_rerenders_form_and_keeps_post(pool: SqlitePool) {
    let app = TestApp::new(pool);
    app.post_form("/new_post", app.post_body("Kept")).await;

    let response = app.post_form("/edit-post/1", app.post_body("")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains(r#"action="/edit-post/1""#));
    assert_eq!(app.posts.get(1).await.expect("post exists").title, "Kept");
}

#[sqlx::test(migrations = "./migrations")]
async fn edit_and_delete_reject_missing_or_forged_tokens(pool: SqlitePool) {
    let app = TestApp::new(pool);
    app.post_form("/new_post", app.post_body("Guarded")).await;

    let forged = FormTokenSigner::new("some-other-secret-key").issue();
    let edit_fields = format!("title=Hijacked&subtitle=s&author=x&image_url={VALID_IMAGE}&body=b");

    for body in [edit_fields.clone(), format!("{edit_fields}&csrf_token={forged}")] {
        let response = app.post_form("/edit-post/1", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    for body in [String::new(), format!("csrf_token={forged}")] {
        let response = app.post_form("/delete/1", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let post = app.posts.get(1).await.expect("post survives");
    assert_eq!(post.title, "Guarded");
    assert_eq!(app.posts.count().await.expect("count"), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_requires_confirmation_post(pool: SqlitePool) {
    let app = TestApp::new(pool);
    app.post_form("/new_post", app.post_body("Doomed")).await;

    let confirm = app.get("/delete/1").await;
    assert_eq!(confirm.status(), StatusCode::OK);
    assert!(body_text(confirm).await.contains("Doomed"));
    assert_eq!(app.posts.count().await.expect("count"), 1);

    let response = app
        .post_form("/delete/1", format!("csrf_token={}", app.tokens.issue()))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    assert_eq!(app.posts.count().await.expect("count"), 0);

    assert_eq!(app.get("/delete/1").await.status(), StatusCode::NOT_FOUND);
    let again = app
        .post_form("/delete/1", format!("csrf_token={}", app.tokens.issue()))
        .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn about_health_and_fallback(pool: SqlitePool) {
    let app = TestApp::new(pool);

    assert_eq!(app.get("/about").await.status(), StatusCode::OK);
    assert_eq!(app.get("/_health/db").await.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.get("/nope").await.status(), StatusCode::NOT_FOUND);
}
