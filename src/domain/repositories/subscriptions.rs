use anyhow::Result;
use axum::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    payments::InsertPaymentEntity,
    plans::PlanEntity,
    subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    users::UserEntity,
};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    /// Latest-ending grant with `ends_at > now`, ties broken by larger id.
    async fn find_active(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>>;

    /// Inserts the grant and its payment record in one transaction.
    /// Returns None without writing anything when the grant carries a
    /// `provider_ref` that has already been recorded.
    async fn record_grant(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
        insert_payment_entity: InsertPaymentEntity,
    ) -> Result<Option<SubscriptionEntity>>;

    /// Shortens the active grant's `ends_at` to `now` with a conditional
    /// update, so a racing writer cannot be lost. Returns the updated grant
    /// or None when nothing was active.
    async fn shorten_active(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>>;

    async fn overview(&self) -> Result<Vec<(SubscriptionEntity, PlanEntity, UserEntity)>>;
}
