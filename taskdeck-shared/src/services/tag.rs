/// Tag service
///
/// Plain CRUD over the global tag namespace. Tags carry no authorization
/// layer: they are shared labels, not project resources, so any caller may
/// create, rename, or delete any tag. Deleting a tag detaches it from every
/// task via the schema's cascade.
use sqlx::PgPool;
use tracing::error;

use crate::models::tag::Tag;
use crate::pagination::{offset, Page};
use crate::services::{ServiceError, ServiceResult};

/// Tag service
#[derive(Clone)]
pub struct TagService {
    db: PgPool,
}

impl TagService {
    /// Creates a new tag service over the given pool
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Creates a tag
    pub async fn create(&self, title: &str) -> ServiceResult<Tag> {
        let tag = Tag::create(&self.db, title).await.map_err(|e| {
            error!("Failed to create tag: {}", e);
            ServiceError::from(e)
        })?;

        Ok(tag)
    }

    /// Fetches a tag by id
    pub async fn detail(&self, tag_id: i32) -> ServiceResult<Tag> {
        let tag = Tag::find_by_id(&self.db, tag_id).await?.ok_or_else(|| {
            error!(tag_id, "Tag not found");
            ServiceError::NotFound("Tag not found".to_string())
        })?;

        Ok(tag)
    }

    /// Renames a tag
    pub async fn update(&self, tag_id: i32, title: &str) -> ServiceResult<Tag> {
        Tag::find_by_id(&self.db, tag_id).await?.ok_or_else(|| {
            error!(tag_id, "Tag not found");
            ServiceError::NotFound("Tag not found".to_string())
        })?;

        let tag = Tag::update(&self.db, tag_id, title)
            .await
            .map_err(|e| {
                error!("Failed to update tag: {}", e);
                ServiceError::from(e)
            })?
            .ok_or_else(|| ServiceError::NotFound("Tag not found".to_string()))?;

        Ok(tag)
    }

    /// Deletes a tag
    pub async fn delete(&self, tag_id: i32) -> ServiceResult<()> {
        Tag::find_by_id(&self.db, tag_id).await?.ok_or_else(|| {
            error!(tag_id, "Tag not found");
            ServiceError::NotFound("Tag not found".to_string())
        })?;

        Tag::delete(&self.db, tag_id).await.map_err(|e| {
            error!("Failed to delete tag: {}", e);
            ServiceError::from(e)
        })?;

        Ok(())
    }

    /// Lists tags one page at a time
    pub async fn find_all(&self, page: i64, size: i64) -> ServiceResult<Page<Tag>> {
        let skip = offset(page, size);

        let (tags, total) = tokio::try_join!(Tag::list(&self.db, size, skip), Tag::count(&self.db))?;

        Ok(Page::new(tags, total, page, size))
    }
}
