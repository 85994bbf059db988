//! The blog post entity and the invariants attached to its fields.

use serde::Serialize;
use time::{Date, format_description::FormatItem, macros::format_description};

/// Upper bound, in characters, for every short text column.
pub const MAX_FIELD_CHARS: usize = 250;

/// Creation dates are stored pre-formatted, e.g. `April 05, 2024`.
pub const LONG_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:zero], [year]");

/// A persisted blog post.
///
/// `id` is assigned by the store and never reused. `date` is fixed at creation
/// and is not part of [`PostFields`], so no update path can change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub author: String,
    pub img_url: String,
}

/// The user-editable part of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub author: String,
    pub img_url: String,
}

impl From<&PostRecord> for PostFields {
    fn from(post: &PostRecord) -> Self {
        Self {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            body: post.body.clone(),
            author: post.author.clone(),
            img_url: post.img_url.clone(),
        }
    }
}

pub fn format_long_date(date: Date) -> String {
    date.format(LONG_DATE_FORMAT).expect("valid calendar date")
}
