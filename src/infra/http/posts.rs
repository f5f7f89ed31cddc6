//! Blog post routes: listing, detail, add, edit, delete.
//!
//! Routing is method-agnostic; `add` and `edit` only act on POST and answer
//! every other method, every rejected form and every malformed body with the
//! same redirect to the listing.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State, rejection::PathRejection},
    http::{Method, StatusCode, Uri, header::LOCATION},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
};
use tracing::warn;

use crate::{
    application::{
        posts::{PostService, PostServiceError, PostSubmission},
        repos::HealthRepo,
    },
    domain::types::PostId,
    presentation::views::{
        IndexTemplate, IndexView, LayoutContext, PostDetailView, PostTemplate,
        render_not_found_response, render_template_response,
    },
};

use super::{
    db_health_response,
    form::{PostFormBody, PostFormRejection},
    middleware::{log_responses, set_request_context},
    repo_error_to_http,
};

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub health: Arc<dyn HealthRepo>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", any(list_posts))
        .route("/details/{id}", any(post_detail))
        .route("/delete/{id}", any(remove_post))
        .route("/edit/{id}", any(edit_post))
        .route("/add", any(add_post))
        .route("/_health/db", get(db_health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn list_posts(State(state): State<HttpState>) -> Response {
    const SOURCE: &str = "infra::http::posts::list_posts";

    match state.posts.list().await {
        Ok(posts) => {
            let view = LayoutContext::new("All posts", IndexView::new(posts));
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => post_error_response(SOURCE, err),
    }
}

async fn post_detail(
    State(state): State<HttpState>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    const SOURCE: &str = "infra::http::posts::post_detail";

    let id = match resolve_post_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.posts.detail(id).await {
        Ok(post) => {
            let title = post.title.clone();
            let view = LayoutContext::new(title, PostDetailView::new(post));
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Err(err) => post_error_response(SOURCE, err),
    }
}

async fn add_post(
    State(state): State<HttpState>,
    method: Method,
    form: Result<PostFormBody, PostFormRejection>,
) -> Response {
    const SOURCE: &str = "infra::http::posts::add_post";

    let Some(submission) = accepted_submission(SOURCE, &method, form) else {
        return redirect_to_index();
    };

    match state.posts.add(submission).await {
        Ok(_) => redirect_to_index(),
        Err(err) => post_error_response(SOURCE, err),
    }
}

async fn edit_post(
    State(state): State<HttpState>,
    method: Method,
    path: Result<Path<String>, PathRejection>,
    form: Result<PostFormBody, PostFormRejection>,
) -> Response {
    const SOURCE: &str = "infra::http::posts::edit_post";

    let id = match resolve_post_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let Some(submission) = accepted_submission(SOURCE, &method, form) else {
        return redirect_to_index();
    };

    match state.posts.edit(id, submission).await {
        Ok(_) => redirect_to_index(),
        Err(err) => post_error_response(SOURCE, err),
    }
}

async fn remove_post(
    State(state): State<HttpState>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    const SOURCE: &str = "infra::http::posts::remove_post";

    let id = match resolve_post_id(path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.posts.remove(id).await {
        Ok(()) => redirect_to_index(),
        Err(err) => post_error_response(SOURCE, err),
    }
}

async fn db_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}

async fn fallback(uri: Uri) -> Response {
    render_not_found_response(format!("no route for `{}`", uri.path()))
}

/// Undecodable or non-numeric id segments answer with the 404 page.
fn resolve_post_id(path: Result<Path<String>, PathRejection>) -> Result<PostId, Response> {
    let Path(raw) = path.map_err(|rejection| render_not_found_response(rejection.body_text()))?;
    PostId::parse(&raw).map_err(|err| render_not_found_response(err.to_string()))
}

/// Only POST bodies that decode as a form are handed on to validation.
fn accepted_submission(
    source: &'static str,
    method: &Method,
    form: Result<PostFormBody, PostFormRejection>,
) -> Option<PostSubmission> {
    if method != Method::POST {
        return None;
    }

    match form {
        Ok(PostFormBody(submission)) => Some(submission),
        Err(rejection) => {
            warn!(
                target = "blogpad::http::posts",
                source = source,
                error = %rejection,
                "discarding unreadable post form"
            );
            None
        }
    }
}

fn post_error_response(source: &'static str, err: PostServiceError) -> Response {
    match err {
        PostServiceError::NotFound { id } => {
            render_not_found_response(format!("blog post {id} not found"))
        }
        PostServiceError::Invalid(errors) => {
            warn!(
                target = "blogpad::http::posts",
                source = source,
                errors = %errors,
                "post form rejected"
            );
            redirect_to_index()
        }
        PostServiceError::Repo(err) => repo_error_to_http(source, err).into_response(),
    }
}

fn redirect_to_index() -> Response {
    (StatusCode::FOUND, [(LOCATION, "/")]).into_response()
}
