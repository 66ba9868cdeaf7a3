use std::sync::Arc;

use anyhow::{Result as AnyResult, anyhow};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    application::usecases::entitlements::{EntitlementError, EntitlementUseCase},
    domain::{
        clock::Clock,
        repositories::{
            plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::subscriptions::SubscriptionModel,
    },
    infrastructure::payments::{PaymentEvent, PaymentWebhookVerifier},
};

#[cfg_attr(test, mockall::automock)]
pub trait WebhookVerifier: Send + Sync {
    fn verify_signature(&self, payload: &[u8], signature_header: &str) -> AnyResult<PaymentEvent>;
}

impl WebhookVerifier for PaymentWebhookVerifier {
    fn verify_signature(&self, payload: &[u8], signature_header: &str) -> AnyResult<PaymentEvent> {
        self.verify_signature(payload, signature_header)
    }
}

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("plan not found")]
    PlanNotFound,
    #[error("invalid webhook signature")]
    InvalidSignature,
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PurchaseError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PurchaseError::PlanNotFound => StatusCode::NOT_FOUND,
            PurchaseError::InvalidSignature | PurchaseError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            PurchaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PurchaseResult<T> = std::result::Result<T, PurchaseError>;

/// Webhook dispositions that are all acknowledged with 200 so the provider
/// stops redelivering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
    Processed,
    Duplicate,
    Anomalous,
    Ignored,
}

/// Payment intake: the synchronous purchase action and the asynchronous
/// provider callback, both converging on the entitlement ledger.
pub struct PurchaseUseCase<P, S, C, U, V>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
    U: UserRepository + Send + Sync + 'static,
    V: WebhookVerifier + 'static,
{
    entitlements: Arc<EntitlementUseCase<P, S, C>>,
    user_repo: Arc<U>,
    verifier: Arc<V>,
}

impl<P, S, C, U, V> PurchaseUseCase<P, S, C, U, V>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
    U: UserRepository + Send + Sync + 'static,
    V: WebhookVerifier + 'static,
{
    pub fn new(
        entitlements: Arc<EntitlementUseCase<P, S, C>>,
        user_repo: Arc<U>,
        verifier: Arc<V>,
    ) -> Self {
        Self {
            entitlements,
            user_repo,
            verifier,
        }
    }

    /// Direct path: the signed-in user confirms a purchase. One grant and
    /// one payment record, or neither.
    pub async fn purchase(&self, user_id: Uuid, plan_id: i64) -> PurchaseResult<SubscriptionModel> {
        info!(%user_id, plan_id, "purchases: direct purchase requested");

        let granted = self
            .entitlements
            .grant(user_id, plan_id, None)
            .await
            .map_err(|err| match err {
                EntitlementError::PlanNotFound => PurchaseError::PlanNotFound,
                other => PurchaseError::Internal(other.into()),
            })?
            .ok_or_else(|| {
                PurchaseError::Internal(anyhow!("direct grant unexpectedly deduplicated"))
            })?;

        info!(
            %user_id,
            plan_id,
            subscription_id = granted.id,
            "purchases: direct purchase completed"
        );
        Ok(granted)
    }

    /// Callback path: fails closed on signature or schema problems (the
    /// provider must not retry), acknowledges anomalies so permanently
    /// invalid messages stop being redelivered.
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> PurchaseResult<WebhookOutcome> {
        let event = self
            .verifier
            .verify_signature(payload, signature_header)
            .map_err(|err| {
                warn!(error = %err, "purchases: webhook signature verification failed");
                PurchaseError::InvalidSignature
            })?;

        info!(event_type = %event.type_, event_id = ?event.id, "purchases: webhook verified");

        if event.type_ != "checkout.session.completed" {
            debug!(event_type = %event.type_, "purchases: ignoring unhandled event type");
            return Ok(WebhookOutcome::Ignored);
        }

        let event_id = event.id.clone().ok_or_else(|| {
            PurchaseError::InvalidPayload("missing event id".to_string())
        })?;

        let session = PaymentWebhookVerifier::extract_checkout_session(&event).ok_or_else(|| {
            PurchaseError::InvalidPayload("missing checkout session".to_string())
        })?;
        let metadata = session
            .metadata
            .ok_or_else(|| PurchaseError::InvalidPayload("missing metadata".to_string()))?;

        let user_id = metadata
            .get("user_id")
            .and_then(|value| Uuid::parse_str(value).ok())
            .ok_or_else(|| PurchaseError::InvalidPayload("missing user_id".to_string()))?;
        let plan_id = metadata
            .get("plan_id")
            .and_then(|value| value.parse::<i64>().ok())
            .ok_or_else(|| PurchaseError::InvalidPayload("missing plan_id".to_string()))?;

        let user = self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "purchases: failed to load user for webhook");
            PurchaseError::Internal(err)
        })?;
        if user.is_none() {
            error!(
                %user_id,
                plan_id,
                event_id = %event_id,
                "purchases: webhook references unknown user, acknowledging without grant"
            );
            return Ok(WebhookOutcome::Anomalous);
        }

        match self
            .entitlements
            .grant(user_id, plan_id, Some(event_id.clone()))
            .await
        {
            Ok(Some(granted)) => {
                info!(
                    %user_id,
                    plan_id,
                    subscription_id = granted.id,
                    event_id = %event_id,
                    "purchases: webhook grant recorded"
                );
                Ok(WebhookOutcome::Processed)
            }
            Ok(None) => {
                info!(
                    %user_id,
                    plan_id,
                    event_id = %event_id,
                    "purchases: webhook redelivery, grant already recorded"
                );
                Ok(WebhookOutcome::Duplicate)
            }
            Err(EntitlementError::PlanNotFound) => {
                error!(
                    %user_id,
                    plan_id,
                    event_id = %event_id,
                    "purchases: webhook references unknown plan, acknowledging without grant"
                );
                Ok(WebhookOutcome::Anomalous)
            }
            Err(err) => Err(PurchaseError::Internal(err.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    use crate::domain::{
        clock::MockClock,
        entities::{plans::PlanEntity, subscriptions::SubscriptionEntity, users::UserEntity},
        repositories::{
            plans::MockPlanRepository, subscriptions::MockSubscriptionRepository,
            users::MockUserRepository,
        },
    };

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn user_id() -> Uuid {
        Uuid::parse_str("9f2c8d3e-1111-2222-3333-444455556666").unwrap()
    }

    fn premium_plan() -> PlanEntity {
        PlanEntity {
            id: 1,
            name: "Premium".to_string(),
            price_minor: 599,
            duration_days: 30,
            created_at: t0(),
        }
    }

    fn user_row() -> UserEntity {
        UserEntity {
            id: user_id(),
            email: "viewer@example.com".to_string(),
            username: "viewer".to_string(),
            password_hash: "hash".to_string(),
            is_admin: false,
            profile_pic: None,
            created_at: t0(),
        }
    }

    fn completed_event(event_id: &str) -> PaymentEvent {
        let payload = serde_json::json!({
            "id": event_id,
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "metadata": {
                        "user_id": user_id().to_string(),
                        "plan_id": "1",
                    }
                }
            }
        });
        serde_json::from_value(payload).unwrap()
    }

    fn fixed_clock() -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().returning(t0);
        clock
    }

    fn intake(
        plan_repo: MockPlanRepository,
        subscription_repo: MockSubscriptionRepository,
        user_repo: MockUserRepository,
        verifier: MockWebhookVerifier,
    ) -> PurchaseUseCase<
        MockPlanRepository,
        MockSubscriptionRepository,
        MockClock,
        MockUserRepository,
        MockWebhookVerifier,
    > {
        let entitlements = Arc::new(EntitlementUseCase::new(
            Arc::new(plan_repo),
            Arc::new(subscription_repo),
            Arc::new(fixed_clock()),
        ));
        PurchaseUseCase::new(entitlements, Arc::new(user_repo), Arc::new(verifier))
    }

    fn granted_row(provider_ref: Option<String>) -> SubscriptionEntity {
        SubscriptionEntity {
            id: 10,
            user_id: user_id(),
            plan_id: 1,
            starts_at: t0(),
            ends_at: t0() + chrono::Duration::days(30),
            provider_ref,
            created_at: t0(),
        }
    }

    #[tokio::test]
    async fn test_direct_purchase_grants_and_pays() {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(premium_plan())));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_record_grant()
            .withf(|grant, payment| {
                grant.provider_ref.is_none() && payment.amount_minor == 599
            })
            .returning(|_, _| Ok(Some(granted_row(None))));

        let intake = intake(
            plan_repo,
            subscription_repo,
            MockUserRepository::new(),
            MockWebhookVerifier::new(),
        );

        let granted = intake.purchase(user_id(), 1).await.unwrap();
        assert_eq!(granted.ends_at, t0() + chrono::Duration::days(30));
    }

    #[tokio::test]
    async fn test_direct_purchase_of_unknown_plan_fails_without_writes() {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo.expect_find_by_id().returning(|_| Ok(None));

        let intake = intake(
            plan_repo,
            MockSubscriptionRepository::new(),
            MockUserRepository::new(),
            MockWebhookVerifier::new(),
        );

        let result = intake.purchase(user_id(), 42).await;
        assert!(matches!(result, Err(PurchaseError::PlanNotFound)));
    }

    #[tokio::test]
    async fn test_invalid_signature_is_rejected_with_no_side_effects() {
        let mut verifier = MockWebhookVerifier::new();
        verifier
            .expect_verify_signature()
            .returning(|_, _| Err(anyhow!("invalid webhook signature")));

        // No repository expectations: any write would panic the mocks.
        let intake = intake(
            MockPlanRepository::new(),
            MockSubscriptionRepository::new(),
            MockUserRepository::new(),
            verifier,
        );

        let result = intake.handle_webhook(b"{}", "t=1,v1=bad").await;
        assert!(matches!(result, Err(PurchaseError::InvalidSignature)));
    }

    #[tokio::test]
    async fn test_valid_webhook_records_grant() {
        let mut verifier = MockWebhookVerifier::new();
        verifier
            .expect_verify_signature()
            .returning(|_, _| Ok(completed_event("evt_1")));

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(user_row())));

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(premium_plan())));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_record_grant()
            .withf(|grant, _| grant.provider_ref.as_deref() == Some("evt_1"))
            .returning(|grant, _| {
                Ok(Some(granted_row(grant.provider_ref.clone())))
            });

        let intake = intake(plan_repo, subscription_repo, user_repo, verifier);

        let outcome = intake.handle_webhook(b"{}", "t=1,v1=ok").await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Processed);
    }

    #[tokio::test]
    async fn test_redelivered_webhook_is_acknowledged_as_duplicate() {
        let mut verifier = MockWebhookVerifier::new();
        verifier
            .expect_verify_signature()
            .returning(|_, _| Ok(completed_event("evt_1")));

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(user_row())));

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(premium_plan())));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_record_grant()
            .returning(|_, _| Ok(None));

        let intake = intake(plan_repo, subscription_repo, user_repo, verifier);

        let outcome = intake.handle_webhook(b"{}", "t=1,v1=ok").await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Duplicate);
    }

    #[tokio::test]
    async fn test_webhook_with_unknown_plan_is_acknowledged_anomaly() {
        let mut verifier = MockWebhookVerifier::new();
        verifier
            .expect_verify_signature()
            .returning(|_, _| Ok(completed_event("evt_2")));

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(user_row())));

        let mut plan_repo = MockPlanRepository::new();
        plan_repo.expect_find_by_id().returning(|_| Ok(None));

        // No record_grant expectation: the ledger must stay untouched.
        let intake = intake(
            plan_repo,
            MockSubscriptionRepository::new(),
            user_repo,
            verifier,
        );

        let outcome = intake.handle_webhook(b"{}", "t=1,v1=ok").await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Anomalous);
    }

    #[tokio::test]
    async fn test_webhook_with_unknown_user_is_acknowledged_anomaly() {
        let mut verifier = MockWebhookVerifier::new();
        verifier
            .expect_verify_signature()
            .returning(|_, _| Ok(completed_event("evt_3")));

        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().returning(|_| Ok(None));

        let intake = intake(
            MockPlanRepository::new(),
            MockSubscriptionRepository::new(),
            user_repo,
            verifier,
        );

        let outcome = intake.handle_webhook(b"{}", "t=1,v1=ok").await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Anomalous);
    }

    #[tokio::test]
    async fn test_webhook_missing_metadata_is_schema_failure() {
        let mut verifier = MockWebhookVerifier::new();
        verifier.expect_verify_signature().returning(|_, _| {
            Ok(serde_json::from_value(serde_json::json!({
                "id": "evt_4",
                "type": "checkout.session.completed",
                "data": { "object": {} }
            }))
            .unwrap())
        });

        let intake = intake(
            MockPlanRepository::new(),
            MockSubscriptionRepository::new(),
            MockUserRepository::new(),
            verifier,
        );

        let result = intake.handle_webhook(b"{}", "t=1,v1=ok").await;
        assert!(matches!(result, Err(PurchaseError::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_unhandled_event_type_is_ignored() {
        let mut verifier = MockWebhookVerifier::new();
        verifier.expect_verify_signature().returning(|_, _| {
            Ok(serde_json::from_value(serde_json::json!({
                "id": "evt_5",
                "type": "invoice.payment_failed",
                "data": { "object": {} }
            }))
            .unwrap())
        });

        let intake = intake(
            MockPlanRepository::new(),
            MockSubscriptionRepository::new(),
            MockUserRepository::new(),
            verifier,
        );

        let outcome = intake.handle_webhook(b"{}", "t=1,v1=ok").await.unwrap();
        assert_eq!(outcome, WebhookOutcome::Ignored);
    }
}
