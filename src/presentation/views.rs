use crate::application::error::{ErrorReport, HttpError};
use crate::domain::entities::BlogPostRecord;
use crate::domain::posts::PostField;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

const SITE_TITLE: &str = "Blogpad";

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

pub fn render_not_found_response(detail: impl Into<String>) -> Response {
    let view = LayoutContext::new("Page Not Found", ErrorPageView::not_found());
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        detail,
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub site_title: &'static str,
    pub page_title: String,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(page_title: impl Into<String>, content: T) -> Self {
        Self {
            site_title: SITE_TITLE,
            page_title: page_title.into(),
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub detail_href: String,
    pub edit_href: String,
    pub delete_href: String,
}

impl From<BlogPostRecord> for PostView {
    fn from(post: BlogPostRecord) -> Self {
        let id = post.id.get();
        Self {
            id,
            title: post.title,
            content: post.content,
            detail_href: format!("/details/{id}"),
            edit_href: format!("/edit/{id}"),
            delete_href: format!("/delete/{id}"),
        }
    }
}

/// One input of the post form, carrying the same limits the server enforces.
#[derive(Clone)]
pub struct PostFormFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub max_length: usize,
    pub multiline: bool,
    pub value: String,
}

#[derive(Clone)]
pub struct PostFormView {
    pub action: String,
    pub submit_label: &'static str,
    pub fields: Vec<PostFormFieldView>,
}

impl PostFormView {
    pub fn new_post() -> Self {
        Self {
            action: "/add".to_string(),
            submit_label: "Publish",
            fields: PostField::ALL
                .into_iter()
                .map(|field| form_field(field, String::new()))
                .collect(),
        }
    }

    pub fn edit_post(post: &PostView) -> Self {
        Self {
            action: post.edit_href.clone(),
            submit_label: "Save changes",
            fields: vec![
                form_field(PostField::Title, post.title.clone()),
                form_field(PostField::Content, post.content.clone()),
            ],
        }
    }
}

fn form_field(field: PostField, value: String) -> PostFormFieldView {
    PostFormFieldView {
        name: field.name(),
        label: field.label(),
        max_length: field.max_chars(),
        multiline: matches!(field, PostField::Content),
        value,
    }
}

#[derive(Clone)]
pub struct IndexView {
    pub posts: Vec<PostView>,
    pub form: PostFormView,
}

impl IndexView {
    pub fn new(posts: Vec<BlogPostRecord>) -> Self {
        Self {
            posts: posts.into_iter().map(PostView::from).collect(),
            form: PostFormView::new_post(),
        }
    }
}

#[derive(Clone)]
pub struct PostDetailView {
    pub post: PostView,
    pub form: PostFormView,
}

impl PostDetailView {
    pub fn new(post: BlogPostRecord) -> Self {
        let post = PostView::from(post);
        let form = PostFormView::edit_post(&post);
        Self { post, form }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<IndexView>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub home_href: &'static str,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The post or page you requested does not exist.".to_string(),
            home_href: "/",
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
