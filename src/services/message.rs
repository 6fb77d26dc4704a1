//! Leadership message service
//!
//! Wraps the director and finance-minister message repositories. The
//! "active" message (the latest revision) sits on the public front page,
//! so it is cached; every write invalidates it.

use crate::cache::{CacheLayer, MemoryCache};
use crate::db::repositories::{DirectorMessageRepository, MinisterMessageRepository};
use crate::models::{
    DirectorMessage, DirectorMessageInput, MinisterMessage, MinisterMessageInput,
};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

const CACHE_KEY_DIRECTOR_ACTIVE: &str = "messages:director:active";
const CACHE_KEY_MINISTER_ACTIVE: &str = "messages:minister:active";

/// Cache TTL for active messages (10 minutes)
const MESSAGE_CACHE_TTL_SECS: u64 = 600;

/// Error types for message service operations
#[derive(Debug, thiserror::Error)]
pub enum MessageServiceError {
    /// Message not found
    #[error("Message not found")]
    NotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Leadership message service
pub struct MessageService {
    directors: Arc<dyn DirectorMessageRepository>,
    ministers: Arc<dyn MinisterMessageRepository>,
    cache: Arc<MemoryCache>,
}

impl MessageService {
    /// Create a new message service
    pub fn new(
        directors: Arc<dyn DirectorMessageRepository>,
        ministers: Arc<dyn MinisterMessageRepository>,
        cache: Arc<MemoryCache>,
    ) -> Self {
        Self {
            directors,
            ministers,
            cache,
        }
    }

    // ------------------------------------------------------------------
    // Director messages
    // ------------------------------------------------------------------

    /// List all director message revisions
    pub async fn list_director(&self) -> Result<Vec<DirectorMessage>, MessageServiceError> {
        Ok(self
            .directors
            .list()
            .await
            .context("Failed to list director messages")?)
    }

    /// Get the active (latest) director message, cached
    pub async fn active_director(&self) -> Result<Option<DirectorMessage>, MessageServiceError> {
        if let Ok(Some(cached)) = self
            .cache
            .get::<Option<DirectorMessage>>(CACHE_KEY_DIRECTOR_ACTIVE)
            .await
        {
            return Ok(cached);
        }

        let latest = self
            .directors
            .latest()
            .await
            .context("Failed to get active director message")?;

        if let Err(e) = self
            .cache
            .set(
                CACHE_KEY_DIRECTOR_ACTIVE,
                &latest,
                Duration::from_secs(MESSAGE_CACHE_TTL_SECS),
            )
            .await
        {
            tracing::warn!("Failed to cache active director message: {}", e);
        }

        Ok(latest)
    }

    /// Get a director message by ID
    pub async fn get_director(&self, id: i64) -> Result<Option<DirectorMessage>, MessageServiceError> {
        Ok(self
            .directors
            .get_by_id(id)
            .await
            .context("Failed to get director message")?)
    }

    /// Create a new director message revision
    pub async fn create_director(
        &self,
        input: DirectorMessageInput,
    ) -> Result<DirectorMessage, MessageServiceError> {
        let now = Utc::now();
        let message = DirectorMessage {
            id: 0,
            director_name: input.director_name,
            title_en: input.title_en,
            title_fr: input.title_fr,
            excerpt_en: input.excerpt_en,
            excerpt_fr: input.excerpt_fr,
            content_en: input.content_en,
            content_fr: input.content_fr,
            image_url: input.image_url,
            x: input.x,
            linkedin: input.linkedin,
            email: input.email,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .directors
            .create(&message)
            .await
            .context("Failed to create director message")?;

        self.invalidate(CACHE_KEY_DIRECTOR_ACTIVE).await;

        Ok(created)
    }

    /// Update a director message. Only provided fields are changed.
    pub async fn update_director(
        &self,
        id: i64,
        input: DirectorMessageInput,
    ) -> Result<DirectorMessage, MessageServiceError> {
        let mut message = self
            .directors
            .get_by_id(id)
            .await
            .context("Failed to get director message")?
            .ok_or(MessageServiceError::NotFound)?;

        apply_option(&mut message.director_name, input.director_name);
        apply_option(&mut message.title_en, input.title_en);
        apply_option(&mut message.title_fr, input.title_fr);
        apply_option(&mut message.excerpt_en, input.excerpt_en);
        apply_option(&mut message.excerpt_fr, input.excerpt_fr);
        apply_option(&mut message.content_en, input.content_en);
        apply_option(&mut message.content_fr, input.content_fr);
        apply_option(&mut message.image_url, input.image_url);
        apply_option(&mut message.x, input.x);
        apply_option(&mut message.linkedin, input.linkedin);
        apply_option(&mut message.email, input.email);

        let updated = self
            .directors
            .update(&message)
            .await
            .context("Failed to update director message")?;

        self.invalidate(CACHE_KEY_DIRECTOR_ACTIVE).await;

        Ok(updated)
    }

    /// Delete a director message
    pub async fn delete_director(&self, id: i64) -> Result<(), MessageServiceError> {
        if self
            .directors
            .get_by_id(id)
            .await
            .context("Failed to get director message")?
            .is_none()
        {
            return Err(MessageServiceError::NotFound);
        }

        self.directors
            .delete(id)
            .await
            .context("Failed to delete director message")?;

        self.invalidate(CACHE_KEY_DIRECTOR_ACTIVE).await;

        Ok(())
    }

    // ------------------------------------------------------------------
    // Finance minister messages
    // ------------------------------------------------------------------

    /// List all minister message revisions
    pub async fn list_minister(&self) -> Result<Vec<MinisterMessage>, MessageServiceError> {
        Ok(self
            .ministers
            .list()
            .await
            .context("Failed to list minister messages")?)
    }

    /// Get the active (latest) minister message, cached
    pub async fn active_minister(&self) -> Result<Option<MinisterMessage>, MessageServiceError> {
        if let Ok(Some(cached)) = self
            .cache
            .get::<Option<MinisterMessage>>(CACHE_KEY_MINISTER_ACTIVE)
            .await
        {
            return Ok(cached);
        }

        let latest = self
            .ministers
            .latest()
            .await
            .context("Failed to get active minister message")?;

        if let Err(e) = self
            .cache
            .set(
                CACHE_KEY_MINISTER_ACTIVE,
                &latest,
                Duration::from_secs(MESSAGE_CACHE_TTL_SECS),
            )
            .await
        {
            tracing::warn!("Failed to cache active minister message: {}", e);
        }

        Ok(latest)
    }

    /// Get a minister message by ID
    pub async fn get_minister(&self, id: i64) -> Result<Option<MinisterMessage>, MessageServiceError> {
        Ok(self
            .ministers
            .get_by_id(id)
            .await
            .context("Failed to get minister message")?)
    }

    /// Create a new minister message revision
    pub async fn create_minister(
        &self,
        input: MinisterMessageInput,
    ) -> Result<MinisterMessage, MessageServiceError> {
        let now = Utc::now();
        let message = MinisterMessage {
            id: 0,
            minister_name: input.minister_name,
            content_en: input.content_en,
            content_fr: input.content_fr,
            image_url: input.image_url,
            telephone: input.telephone,
            email: input.email,
            website: input.website,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .ministers
            .create(&message)
            .await
            .context("Failed to create minister message")?;

        self.invalidate(CACHE_KEY_MINISTER_ACTIVE).await;

        Ok(created)
    }

    /// Update a minister message. Only provided fields are changed.
    pub async fn update_minister(
        &self,
        id: i64,
        input: MinisterMessageInput,
    ) -> Result<MinisterMessage, MessageServiceError> {
        let mut message = self
            .ministers
            .get_by_id(id)
            .await
            .context("Failed to get minister message")?
            .ok_or(MessageServiceError::NotFound)?;

        apply_option(&mut message.minister_name, input.minister_name);
        apply_option(&mut message.content_en, input.content_en);
        apply_option(&mut message.content_fr, input.content_fr);
        apply_option(&mut message.image_url, input.image_url);
        apply_option(&mut message.telephone, input.telephone);
        apply_option(&mut message.email, input.email);
        apply_option(&mut message.website, input.website);

        let updated = self
            .ministers
            .update(&message)
            .await
            .context("Failed to update minister message")?;

        self.invalidate(CACHE_KEY_MINISTER_ACTIVE).await;

        Ok(updated)
    }

    /// Delete a minister message
    pub async fn delete_minister(&self, id: i64) -> Result<(), MessageServiceError> {
        if self
            .ministers
            .get_by_id(id)
            .await
            .context("Failed to get minister message")?
            .is_none()
        {
            return Err(MessageServiceError::NotFound);
        }

        self.ministers
            .delete(id)
            .await
            .context("Failed to delete minister message")?;

        self.invalidate(CACHE_KEY_MINISTER_ACTIVE).await;

        Ok(())
    }

    async fn invalidate(&self, key: &str) {
        if let Err(e) = self.cache.delete(key).await {
            tracing::warn!("Failed to invalidate message cache: {}", e);
        }
    }
}

/// Overwrite `target` only when the input carries a value
fn apply_option<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxDirectorMessageRepository, SqlxMinisterMessageRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> MessageService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        MessageService::new(
            SqlxDirectorMessageRepository::boxed(pool.clone()),
            SqlxMinisterMessageRepository::boxed(pool),
            Arc::new(MemoryCache::new()),
        )
    }

    #[tokio::test]
    async fn test_active_director_tracks_latest_revision() {
        let service = setup().await;
        assert!(service.active_director().await.unwrap().is_none());

        service
            .create_director(DirectorMessageInput {
                director_name: Some("First Director".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        service
            .create_director(DirectorMessageInput {
                director_name: Some("Second Director".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let active = service.active_director().await.unwrap().unwrap();
        assert_eq!(active.director_name.as_deref(), Some("Second Director"));
    }

    #[tokio::test]
    async fn test_update_director_partial_fields() {
        let service = setup().await;
        let created = service
            .create_director(DirectorMessageInput {
                director_name: Some("Director".to_string()),
                content_en: Some("Welcome".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = service
            .update_director(
                created.id,
                DirectorMessageInput {
                    content_fr: Some("Bienvenue".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Unspecified fields survive the update
        assert_eq!(updated.director_name.as_deref(), Some("Director"));
        assert_eq!(updated.content_en.as_deref(), Some("Welcome"));
        assert_eq!(updated.content_fr.as_deref(), Some("Bienvenue"));
    }

    #[tokio::test]
    async fn test_minister_message_not_found() {
        let service = setup().await;
        let result = service
            .update_minister(42, MinisterMessageInput::default())
            .await;
        assert!(matches!(result, Err(MessageServiceError::NotFound)));

        let result = service.delete_minister(42).await;
        assert!(matches!(result, Err(MessageServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_director_invalidates_active_cache() {
        let service = setup().await;
        let created = service
            .create_director(DirectorMessageInput {
                director_name: Some("Only".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        // Warm the cache
        assert!(service.active_director().await.unwrap().is_some());

        service.delete_director(created.id).await.unwrap();
        assert!(service.active_director().await.unwrap().is_none());
    }
}
