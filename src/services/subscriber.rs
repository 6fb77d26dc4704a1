//! Subscriber service
//!
//! Newsletter subscription management. Subscribing an address that
//! previously unsubscribed reactivates it; a confirmation email is sent
//! best-effort and never fails the subscription.

use crate::db::repositories::SubscriberRepository;
use crate::models::{ListParams, PagedResult, Subscriber, SubscriberStatus};
use crate::services::email::Mailer;
use anyhow::Context;
use std::sync::Arc;

/// Error types for subscriber service operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriberServiceError {
    /// Email is already an active subscriber
    #[error("This email is already subscribed")]
    AlreadySubscribed,

    /// Email already opted out
    #[error("Email already unsubscribed")]
    AlreadyUnsubscribed,

    /// Email not found
    #[error("Email not found in subscribers")]
    NotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Outcome of a subscribe call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// A brand new subscription was created
    Created,
    /// A previously unsubscribed address was reactivated
    Reactivated,
}

/// Subscriber service
pub struct SubscriberService {
    repo: Arc<dyn SubscriberRepository>,
    mailer: Option<Arc<Mailer>>,
}

impl SubscriberService {
    /// Create a new subscriber service without mail support
    pub fn new(repo: Arc<dyn SubscriberRepository>) -> Self {
        Self { repo, mailer: None }
    }

    /// Create a new subscriber service that sends confirmation emails
    pub fn with_mailer(repo: Arc<dyn SubscriberRepository>, mailer: Arc<Mailer>) -> Self {
        Self {
            repo,
            mailer: Some(mailer),
        }
    }

    /// Subscribe an email address.
    ///
    /// - A new address is created as active and a confirmation email is
    ///   sent (best-effort).
    /// - An unsubscribed address is reactivated.
    /// - An already-active address is a conflict.
    pub async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome, SubscriberServiceError> {
        if let Some(existing) = self
            .repo
            .get_by_email(email)
            .await
            .context("Failed to look up subscriber")?
        {
            if existing.is_active() {
                return Err(SubscriberServiceError::AlreadySubscribed);
            }

            self.repo
                .set_status(existing.id, SubscriberStatus::Active)
                .await
                .context("Failed to reactivate subscription")?;

            tracing::info!("Email resubscribed: {}", email);
            return Ok(SubscribeOutcome::Reactivated);
        }

        self.repo
            .create(email)
            .await
            .context("Failed to create subscriber")?;

        tracing::info!("New subscriber: {}", email);

        // Confirmation mail must never fail the subscription
        if let Some(ref mailer) = self.mailer {
            if mailer.is_configured() {
                if let Err(e) = mailer.send_subscribe_confirmation(email).await {
                    tracing::error!("Failed to send subscription confirmation: {}", e);
                }
            }
        }

        Ok(SubscribeOutcome::Created)
    }

    /// Unsubscribe an email address.
    pub async fn unsubscribe(&self, email: &str) -> Result<(), SubscriberServiceError> {
        let subscriber = self
            .repo
            .get_by_email(email)
            .await
            .context("Failed to look up subscriber")?
            .ok_or(SubscriberServiceError::NotFound)?;

        if !subscriber.is_active() {
            return Err(SubscriberServiceError::AlreadyUnsubscribed);
        }

        self.repo
            .set_status(subscriber.id, SubscriberStatus::Unsubscribed)
            .await
            .context("Failed to unsubscribe")?;

        tracing::info!("Email unsubscribed: {}", email);

        Ok(())
    }

    /// List subscribers with an optional status filter (admin operation)
    pub async fn list(
        &self,
        status: Option<SubscriberStatus>,
        params: &ListParams,
    ) -> Result<PagedResult<Subscriber>, SubscriberServiceError> {
        let (items, total) = self
            .repo
            .list(status, params)
            .await
            .context("Failed to list subscribers")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Delete a subscriber outright (admin operation)
    pub async fn delete(&self, id: i64) -> Result<(), SubscriberServiceError> {
        if self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get subscriber")?
            .is_none()
        {
            return Err(SubscriberServiceError::NotFound);
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete subscriber")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxSubscriberRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SubscriberService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SubscriberService::new(SqlxSubscriberRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_subscribe_new_email() {
        let service = setup().await;
        let outcome = service.subscribe("reader@example.com").await.unwrap();
        assert_eq!(outcome, SubscribeOutcome::Created);
    }

    #[tokio::test]
    async fn test_subscribe_twice_conflicts() {
        let service = setup().await;
        service.subscribe("reader@example.com").await.unwrap();

        let result = service.subscribe("reader@example.com").await;
        assert!(matches!(result, Err(SubscriberServiceError::AlreadySubscribed)));
    }

    #[tokio::test]
    async fn test_unsubscribe_then_resubscribe_reactivates() {
        let service = setup().await;
        service.subscribe("reader@example.com").await.unwrap();
        service.unsubscribe("reader@example.com").await.unwrap();

        let outcome = service.subscribe("reader@example.com").await.unwrap();
        assert_eq!(outcome, SubscribeOutcome::Reactivated);
    }

    #[tokio::test]
    async fn test_unsubscribe_unknown_email() {
        let service = setup().await;
        let result = service.unsubscribe("missing@example.com").await;
        assert!(matches!(result, Err(SubscriberServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_unsubscribe_twice() {
        let service = setup().await;
        service.subscribe("reader@example.com").await.unwrap();
        service.unsubscribe("reader@example.com").await.unwrap();

        let result = service.unsubscribe("reader@example.com").await;
        assert!(matches!(result, Err(SubscriberServiceError::AlreadyUnsubscribed)));
    }

    #[tokio::test]
    async fn test_list_with_status_filter() {
        let service = setup().await;
        service.subscribe("a@example.com").await.unwrap();
        service.subscribe("b@example.com").await.unwrap();
        service.unsubscribe("a@example.com").await.unwrap();

        let active = service
            .list(Some(SubscriberStatus::Active), &ListParams::new(1, 50))
            .await
            .unwrap();
        assert_eq!(active.total, 1);
        assert_eq!(active.items[0].email, "b@example.com");

        let all = service.list(None, &ListParams::new(1, 50)).await.unwrap();
        assert_eq!(all.total, 2);
    }

    #[tokio::test]
    async fn test_delete_subscriber() {
        let service = setup().await;
        service.subscribe("gone@example.com").await.unwrap();

        let all = service.list(None, &ListParams::new(1, 50)).await.unwrap();
        let id = all.items[0].id;

        service.delete(id).await.unwrap();
        assert!(matches!(
            service.delete(id).await,
            Err(SubscriberServiceError::NotFound)
        ));
    }
}
