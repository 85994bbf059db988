//! Explicit validation for the post form.
//!
//! Every rule runs on every field, so a single submission reports all of its
//! problems at once. Nothing here touches storage.

use std::collections::BTreeMap;

use url::Url;

use crate::domain::posts::{MAX_FIELD_CHARS, PostFields};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_SUBTITLE: &str = "subtitle";
pub const FIELD_AUTHOR: &str = "author";
pub const FIELD_IMAGE_URL: &str = "image_url";
pub const FIELD_BODY: &str = "body";

const MSG_REQUIRED: &str = "This field is required.";
const MSG_INVALID_URL: &str = "Invalid URL.";

/// Raw, unvalidated form values as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub image_url: String,
    pub body: String,
}

impl From<&PostFields> for PostDraft {
    fn from(fields: &PostFields) -> Self {
        Self {
            title: fields.title.clone(),
            subtitle: fields.subtitle.clone(),
            author: fields.author.clone(),
            image_url: fields.img_url.clone(),
            body: fields.body.clone(),
        }
    }
}

/// Field-level error messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }
}

/// Validate a draft, returning trimmed fields or every field error found.
///
/// Short fields are trimmed before checking. The body keeps its markup untouched
/// but must contain more than whitespace.
pub fn validate_post_form(draft: &PostDraft) -> Result<PostFields, FormErrors> {
    let mut errors = FormErrors::new();

    let title = required_short(&mut errors, FIELD_TITLE, &draft.title);
    let subtitle = required_short(&mut errors, FIELD_SUBTITLE, &draft.subtitle);
    let author = required_short(&mut errors, FIELD_AUTHOR, &draft.author);
    let img_url = required_short(&mut errors, FIELD_IMAGE_URL, &draft.image_url);

    if !img_url.is_empty() && !is_absolute_web_url(&img_url) {
        errors.add(FIELD_IMAGE_URL, MSG_INVALID_URL);
    }

    if draft.body.trim().is_empty() {
        errors.add(FIELD_BODY, MSG_REQUIRED);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(PostFields {
        title,
        subtitle,
        body: draft.body.clone(),
        author,
        img_url,
    })
}

fn required_short(errors: &mut FormErrors, field: &'static str, raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        errors.add(field, MSG_REQUIRED);
    } else if value.chars().count() > MAX_FIELD_CHARS {
        errors.add(
            field,
            format!("Field cannot be longer than {MAX_FIELD_CHARS} characters."),
        );
    }
    value.to_string()
}

fn is_absolute_web_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> PostDraft {
        PostDraft {
            title: "A".into(),
            subtitle: "s".into(),
            author: "x".into(),
            image_url: "http://e.com/i.png".into(),
            body: "<p>b</p>".into(),
        }
    }

    #[test]
    fn valid_draft_produces_fields() {
        let fields = validate_post_form(&valid_draft()).expect("valid");
        assert_eq!(fields.title, "A");
        assert_eq!(fields.img_url, "http://e.com/i.png");
        assert_eq!(fields.body, "<p>b</p>");
    }

    #[test]
    fn empty_title_is_required() {
        let draft = PostDraft {
            title: "   ".into(),
            ..valid_draft()
        };

        let errors = validate_post_form(&draft).unwrap_err();
        assert_eq!(errors.get(FIELD_TITLE), [MSG_REQUIRED.to_string()]);
        assert!(errors.get(FIELD_SUBTITLE).is_empty());
    }

    #[test]
    fn all_missing_fields_are_reported_together() {
        let errors = validate_post_form(&PostDraft::default()).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            [FIELD_AUTHOR, FIELD_BODY, FIELD_IMAGE_URL, FIELD_SUBTITLE, FIELD_TITLE]
        );
    }

    #[test]
    fn relative_or_schemeless_urls_are_rejected() {
        for candidate in ["/images/a.png", "e.com/i.png", "not a url", "ftp://e.com/a.png"] {
            let draft = PostDraft {
                image_url: candidate.into(),
                ..valid_draft()
            };
            let errors = validate_post_form(&draft).unwrap_err();
            assert_eq!(
                errors.get(FIELD_IMAGE_URL),
                [MSG_INVALID_URL.to_string()],
                "{candidate} should be rejected"
            );
        }
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let draft = PostDraft {
            subtitle: "s".repeat(MAX_FIELD_CHARS + 1),
            ..valid_draft()
        };
        let errors = validate_post_form(&draft).unwrap_err();
        assert_eq!(errors.get(FIELD_SUBTITLE).len(), 1);
    }

    #[test]
    fn length_limit_counts_characters_not_bytes() {
        let draft = PostDraft {
            author: "é".repeat(MAX_FIELD_CHARS),
            ..valid_draft()
        };
        assert!(validate_post_form(&draft).is_ok());
    }

    #[test]
    fn short_fields_are_trimmed() {
        let draft = PostDraft {
            title: "  Spaced  ".into(),
            ..valid_draft()
        };
        let fields = validate_post_form(&draft).expect("valid");
        assert_eq!(fields.title, "Spaced");
    }
}
