//! Blog post form rules.
//!
//! Submitted values are stripped of surrounding whitespace before any check
//! runs, and lengths are counted in Unicode scalar values. A field that is
//! blank after stripping is missing; otherwise every rule runs and all of its
//! failures are reported.

use std::fmt;

use thiserror::Error;

pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Title,
    Content,
}

impl PostField {
    pub const ALL: [PostField; 2] = [PostField::Title, PostField::Content];

    pub fn name(self) -> &'static str {
        match self {
            PostField::Title => "title",
            PostField::Content => "content",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PostField::Title => "Title",
            PostField::Content => "Content",
        }
    }

    pub fn max_chars(self) -> usize {
        match self {
            PostField::Title => TITLE_MAX_CHARS,
            PostField::Content => CONTENT_MAX_CHARS,
        }
    }
}

impl fmt::Display for PostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(PostField),
    #[error("{0} must not contain null characters")]
    NullCharacter(PostField),
    #[error("{field} has {actual} characters, at most {max} are allowed")]
    TooLong {
        field: PostField,
        max: usize,
        actual: usize,
    },
}

/// Every field that failed validation, in form order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid post form: {}", summarize(.errors))]
pub struct PostFormErrors {
    errors: Vec<FieldError>,
}

impl PostFormErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Cleaned values ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

pub fn validate_post_form(title: &str, content: &str) -> Result<PostDraft, PostFormErrors> {
    let mut errors = Vec::new();
    let title = clean_field(PostField::Title, title, &mut errors);
    let content = clean_field(PostField::Content, content, &mut errors);

    match (title, content) {
        (Some(title), Some(content)) => Ok(PostDraft { title, content }),
        _ => Err(PostFormErrors { errors }),
    }
}

fn clean_field(field: PostField, raw: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = raw.trim_matches(is_strippable);

    if value.is_empty() {
        errors.push(FieldError::Required(field));
        return None;
    }

    let before = errors.len();

    if value.contains('\0') {
        errors.push(FieldError::NullCharacter(field));
    }

    let actual = value.chars().count();
    let max = field.max_chars();
    if actual > max {
        errors.push(FieldError::TooLong { field, max, actual });
    }

    (errors.len() == before).then(|| value.to_string())
}

/// Unicode whitespace plus the ASCII file, group, record and unit separators.
fn is_strippable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}
