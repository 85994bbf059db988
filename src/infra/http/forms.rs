use serde::Deserialize;

use crate::application::posts::PostDraft;

/// URL-encoded body of the create and edit forms. Absent fields decode as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct PostForm {
    title: String,
    subtitle: String,
    author: String,
    image_url: String,
    body: String,
    csrf_token: Option<String>,
}

impl PostForm {
    pub(super) fn into_parts(self) -> (PostDraft, Option<String>) {
        let draft = PostDraft {
            title: self.title,
            subtitle: self.subtitle,
            author: self.author,
            image_url: self.image_url,
            body: self.body,
        };
        (draft, self.csrf_token)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct DeleteForm {
    pub(super) csrf_token: Option<String>,
}
