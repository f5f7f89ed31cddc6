//! Post form body decoding.
//!
//! Accepts urlencoded and `multipart/form-data` bodies. Repeated keys resolve
//! to the last value, file parts are ignored and unknown keys are dropped.

use axum::{
    extract::{
        Form, FromRequest, Multipart, Request,
        multipart::{MultipartError, MultipartRejection},
        rejection::FormRejection,
    },
    http::{HeaderMap, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::application::posts::PostSubmission;
use crate::domain::posts::PostField;

#[derive(Debug)]
pub(crate) struct PostFormBody(pub(crate) PostSubmission);

#[derive(Debug, Error)]
pub(crate) enum PostFormRejection {
    #[error(transparent)]
    Form(#[from] FormRejection),
    #[error(transparent)]
    Multipart(#[from] MultipartRejection),
    #[error(transparent)]
    MultipartField(#[from] MultipartError),
}

impl IntoResponse for PostFormRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Form(rejection) => rejection.into_response(),
            Self::Multipart(rejection) => rejection.into_response(),
            Self::MultipartField(error) => error.into_response(),
        }
    }
}

impl<S> FromRequest<S> for PostFormBody
where
    S: Send + Sync,
{
    type Rejection = PostFormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(req.headers()) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
            return Ok(Self::from_pairs(pairs));
        }

        let mut multipart = Multipart::from_request(req, state).await?;
        let mut pairs = Vec::new();
        while let Some(field) = multipart.next_field().await? {
            if field.file_name().is_some() {
                continue;
            }
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            pairs.push((name, field.text().await?));
        }

        Ok(Self::from_pairs(pairs))
    }
}

impl PostFormBody {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut submission = PostSubmission::default();
        for (name, value) in pairs {
            if name == PostField::Title.name() {
                submission.title = value;
            } else if name == PostField::Content.name() {
                submission.content = value;
            }
        }
        Self(submission)
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let PostFormBody(submission) = PostFormBody::from_pairs(pairs(&[
            ("title", "a"),
            ("title", "b"),
            ("content", "c"),
        ]));
        assert_eq!(submission.title, "b");
        assert_eq!(submission.content, "c");
    }

    #[test]
    fn missing_and_unknown_keys() {
        let PostFormBody(submission) =
            PostFormBody::from_pairs(pairs(&[("content", "c"), ("author", "x")]));
        assert_eq!(submission.title, "");
        assert_eq!(submission.content, "c");
    }

    #[test]
    fn detects_multipart_content_type() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("Multipart/Form-Data; boundary=x"),
        );
        assert!(is_multipart(&headers));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        assert!(!is_multipart(&headers));
    }
}
