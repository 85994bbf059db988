use crate::application::error::{ErrorReport, HttpError};
use crate::application::posts::{FormErrors, PostDraft, validation};
use crate::domain::posts::PostRecord;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let view = LayoutContext::new(chrome, ErrorPageView::not_found());
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Render an [`HttpError`] as a full error page, keeping its status and report.
pub fn render_error_response(chrome: LayoutChrome, error: HttpError) -> Response {
    let status = error.status();
    let content = ErrorPageView {
        title: status
            .canonical_reason()
            .unwrap_or("Something went wrong")
            .to_string(),
        message: error.public_message().to_string(),
        primary_action: Some(ErrorAction::home()),
    };
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, status);
    error.into_report().attach(&mut response);
    response
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: Vec<NavigationLinkView>,
    pub page_title: String,
}

impl LayoutChrome {
    pub fn new(site_title: &str) -> Self {
        let link = |label: &str, href: &str| NavigationLinkView {
            label: label.to_string(),
            href: href.to_string(),
        };

        Self {
            brand: BrandView {
                title: site_title.to_string(),
                href: "/".to_string(),
            },
            navigation: vec![
                link("Home", "/"),
                link("About", "/about"),
                link("New Post", "/new_post"),
            ],
            page_title: site_title.to_string(),
        }
    }

    pub fn with_page_title(self, title: &str) -> Self {
        let page_title = format!("{title} · {}", self.brand.title);
        Self { page_title, ..self }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: Vec<NavigationLinkView>,
    pub page_title: String,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            page_title: chrome.page_title,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
}

impl From<&PostRecord> for PostCard {
    fn from(post: &PostRecord) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            date: post.date.clone(),
        }
    }
}

pub struct IndexView {
    pub posts: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<IndexView>,
}

pub struct PostDetailView {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub img_url: String,
    /// Sanitized markup, safe to emit unescaped.
    pub body_html: String,
}

impl From<&PostRecord> for PostDetailView {
    fn from(post: &PostRecord) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            date: post.date.clone(),
            img_url: post.img_url.clone(),
            body_html: ammonia::clean(&post.body),
        }
    }
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailView>,
}

pub struct FormFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub value: String,
    pub errors: Vec<String>,
}

impl FormFieldView {
    fn new(
        name: &'static str,
        label: &'static str,
        input_type: &'static str,
        value: &str,
        errors: &FormErrors,
    ) -> Self {
        Self {
            name,
            label,
            input_type,
            value: value.to_string(),
            errors: errors.get(name).to_vec(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub struct PostFormView {
    pub heading: &'static str,
    pub action: String,
    pub cancel_href: String,
    pub csrf_token: String,
    pub inputs: Vec<FormFieldView>,
    pub body: FormFieldView,
}

impl PostFormView {
    pub fn create(draft: &PostDraft, errors: &FormErrors, csrf_token: String) -> Self {
        Self::build(
            "New Post",
            "/new_post".to_string(),
            "/".to_string(),
            draft,
            errors,
            csrf_token,
        )
    }

    pub fn edit(id: i64, draft: &PostDraft, errors: &FormErrors, csrf_token: String) -> Self {
        Self::build(
            "Edit Post",
            format!("/edit-post/{id}"),
            format!("/post/{id}"),
            draft,
            errors,
            csrf_token,
        )
    }

    fn build(
        heading: &'static str,
        action: String,
        cancel_href: String,
        draft: &PostDraft,
        errors: &FormErrors,
        csrf_token: String,
    ) -> Self {
        let inputs = vec![
            FormFieldView::new(
                validation::FIELD_TITLE,
                "Blog Post Title",
                "text",
                &draft.title,
                errors,
            ),
            FormFieldView::new(
                validation::FIELD_SUBTITLE,
                "Subtitle",
                "text",
                &draft.subtitle,
                errors,
            ),
            FormFieldView::new(
                validation::FIELD_AUTHOR,
                "Your Name",
                "text",
                &draft.author,
                errors,
            ),
            FormFieldView::new(
                validation::FIELD_IMAGE_URL,
                "Blog Image URL",
                "url",
                &draft.image_url,
                errors,
            ),
        ];
        let body = FormFieldView::new(
            validation::FIELD_BODY,
            "Blog Content",
            "textarea",
            &draft.body,
            errors,
        );

        Self {
            heading,
            action,
            cancel_href,
            csrf_token,
            inputs,
            body,
        }
    }
}

#[derive(Template)]
#[template(path = "make-post.html")]
pub struct MakePostTemplate {
    pub view: LayoutContext<PostFormView>,
}

pub struct DeletePostView {
    pub id: i64,
    pub title: String,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "delete-post.html")]
pub struct DeletePostTemplate {
    pub view: LayoutContext<DeletePostView>,
}

pub struct AboutView;

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub view: LayoutContext<AboutView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage."
                .to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
