use tracing::info;

use crate::application::repos::{CreatePostParams, UpdatePostParams};
use crate::domain::posts::{PostFields, PostRecord, format_long_date};

use super::service::PostService;
use super::types::PostServiceError;

impl PostService {
    /// Store a new post dated today in the site's time zone.
    pub async fn create(&self, fields: PostFields) -> Result<PostRecord, PostServiceError> {
        let date = format_long_date(self.clock.today());
        let post = self
            .writer
            .create_post(CreatePostParams { fields, date })
            .await?;

        info!(
            target = "quire::posts",
            post_id = post.id,
            title = %post.title,
            "post created"
        );
        Ok(post)
    }

    /// Replace the editable fields of a post. `id` and `date` are left as stored.
    pub async fn update(
        &self,
        id: i64,
        fields: PostFields,
    ) -> Result<PostRecord, PostServiceError> {
        let post = self
            .writer
            .update_post(UpdatePostParams { id, fields })
            .await?;

        info!(
            target = "quire::posts",
            post_id = post.id,
            title = %post.title,
            "post updated"
        );
        Ok(post)
    }

    pub async fn delete(&self, id: i64) -> Result<(), PostServiceError> {
        self.writer.delete_post(id).await?;

        info!(target = "quire::posts", post_id = id, "post deleted");
        Ok(())
    }
}
