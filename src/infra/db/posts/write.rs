use async_trait::async_trait;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};
use crate::domain::posts::PostRecord;
use crate::infra::db::map_sqlx_error;

use super::SqliteRepositories;
use super::types::PostRow;

#[async_trait]
impl PostsWriteRepo for SqliteRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams { fields, date } = params;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, subtitle, date, body, author, img_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id, title, subtitle, date, body, author, img_url
            "#,
        )
        .bind(fields.title)
        .bind(fields.subtitle)
        .bind(date)
        .bind(fields.body)
        .bind(fields.author)
        .bind(fields.img_url)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams { id, fields } = params;

        // `fetch_one` surfaces an unknown id as RowNotFound, which maps to NotFound.
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = ?2,
                subtitle = ?3,
                body = ?4,
                author = ?5,
                img_url = ?6
            WHERE id = ?1
            RETURNING id, title, subtitle, date, body, author, img_url
            "#,
        )
        .bind(id)
        .bind(fields.title)
        .bind(fields.subtitle)
        .bind(fields.body)
        .bind(fields.author)
        .bind(fields.img_url)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
