use crate::domain::posts::PostRecord;

use super::service::PostService;
use super::types::PostServiceError;

impl PostService {
    pub async fn list_all(&self) -> Result<Vec<PostRecord>, PostServiceError> {
        self.reader.list_all().await.map_err(PostServiceError::from)
    }

    pub async fn get(&self, id: i64) -> Result<PostRecord, PostServiceError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(PostServiceError::NotFound)
    }

    pub async fn count(&self) -> Result<u64, PostServiceError> {
        self.reader
            .count_posts()
            .await
            .map_err(PostServiceError::from)
    }
}
