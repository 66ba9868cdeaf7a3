use std::sync::Arc;

use anyhow::{Context, anyhow};
use chrono::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    clock::Clock,
    entities::{
        payments::InsertPaymentEntity, plans::InsertPlanEntity,
        subscriptions::InsertSubscriptionEntity,
    },
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        enums::payment_statuses::PaymentStatus,
        plans::{InsertPlanModel, PlanModel},
        subscriptions::{CurrentSubscriptionModel, SubscriptionModel, SubscriptionOverviewModel},
    },
};

#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("plan not found")]
    PlanNotFound,
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EntitlementError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            EntitlementError::PlanNotFound => StatusCode::NOT_FOUND,
            EntitlementError::InvalidPlan(_) => StatusCode::BAD_REQUEST,
            EntitlementError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type EntitlementResult<T> = std::result::Result<T, EntitlementError>;

/// Plan catalog plus the subscription ledger: who bought what, until when,
/// and whether a user is currently entitled to premium content.
pub struct EntitlementUseCase<P, S, C>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
    clock: Arc<C>,
}

impl<P, S, C> EntitlementUseCase<P, S, C>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    pub fn new(plan_repo: Arc<P>, subscription_repo: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            plan_repo,
            subscription_repo,
            clock,
        }
    }

    pub async fn list_plans(&self) -> EntitlementResult<Vec<PlanModel>> {
        let plans = self.plan_repo.list_by_price().await.map_err(|err| {
            error!(db_error = ?err, "entitlements: failed to list plans");
            EntitlementError::Internal(err)
        })?;

        Ok(plans.into_iter().map(PlanModel::from).collect())
    }

    pub async fn create_plan(&self, insert_plan_model: InsertPlanModel) -> EntitlementResult<PlanModel> {
        if insert_plan_model.price_minor < 0 {
            let err = EntitlementError::InvalidPlan("price must not be negative".to_string());
            warn!(
                price_minor = insert_plan_model.price_minor,
                status = err.status_code().as_u16(),
                "entitlements: rejected plan with negative price"
            );
            return Err(err);
        }
        if insert_plan_model.duration_days <= 0 {
            let err = EntitlementError::InvalidPlan("duration must be positive".to_string());
            warn!(
                duration_days = insert_plan_model.duration_days,
                status = err.status_code().as_u16(),
                "entitlements: rejected plan with non-positive duration"
            );
            return Err(err);
        }

        let plan = self
            .plan_repo
            .add(InsertPlanEntity {
                name: insert_plan_model.name,
                price_minor: insert_plan_model.price_minor,
                duration_days: insert_plan_model.duration_days,
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, "entitlements: failed to insert plan");
                EntitlementError::Internal(err)
            })?;

        info!(plan_id = plan.id, plan_name = %plan.name, "entitlements: plan created");
        Ok(PlanModel::from(plan))
    }

    /// The grant, if any, whose `ends_at` is in the future and is the latest
    /// among the user's grants. Pure read.
    pub async fn active_subscription(
        &self,
        user_id: Uuid,
    ) -> EntitlementResult<Option<CurrentSubscriptionModel>> {
        let now = self.clock.now();
        let subscription = match self
            .subscription_repo
            .find_active(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "entitlements: failed to load active subscription");
                EntitlementError::Internal(err)
            })? {
            Some(subscription) => subscription,
            None => return Ok(None),
        };

        let plan = self
            .plan_repo
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    plan_id = subscription.plan_id,
                    db_error = ?err,
                    "entitlements: failed to load plan for active subscription"
                );
                EntitlementError::Internal(err)
            })?
            .ok_or_else(|| {
                EntitlementError::Internal(anyhow!(
                    "grant {} references missing plan {}",
                    subscription.id,
                    subscription.plan_id
                ))
            })?;

        Ok(Some(CurrentSubscriptionModel {
            subscription_id: subscription.id,
            plan_id: plan.id,
            plan_name: plan.name,
            price_minor: plan.price_minor,
            starts_at: subscription.starts_at,
            ends_at: subscription.ends_at,
        }))
    }

    pub async fn is_entitled(&self, user_id: Uuid) -> EntitlementResult<bool> {
        let now = self.clock.now();
        let active = self
            .subscription_repo
            .find_active(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "entitlements: entitlement check failed");
                EntitlementError::Internal(err)
            })?;

        Ok(active.is_some())
    }

    /// Creates a grant ending `duration_days` from now plus the matching
    /// payment record, in one transaction. Deliberately not idempotent
    /// without a `provider_ref`: a second purchase stacks a later-ending
    /// grant, and the active-subscription query resolves the overlap.
    /// Returns None when a `provider_ref` was already recorded.
    pub async fn grant(
        &self,
        user_id: Uuid,
        plan_id: i64,
        provider_ref: Option<String>,
    ) -> EntitlementResult<Option<SubscriptionModel>> {
        let plan = self
            .plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%user_id, plan_id, db_error = ?err, "entitlements: failed to load plan for grant");
                EntitlementError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = EntitlementError::PlanNotFound;
                warn!(
                    %user_id,
                    plan_id,
                    status = err.status_code().as_u16(),
                    "entitlements: grant requested for unknown plan"
                );
                err
            })?;

        let starts_at = self.clock.now();
        let ends_at = starts_at
            .checked_add_signed(Duration::days(plan.duration_days.into()))
            .context("failed to compute subscription end date")?;

        let grant = self
            .subscription_repo
            .record_grant(
                InsertSubscriptionEntity {
                    user_id,
                    plan_id: plan.id,
                    starts_at,
                    ends_at,
                    provider_ref,
                },
                InsertPaymentEntity {
                    user_id,
                    amount_minor: plan.price_minor,
                    status: PaymentStatus::Completed.to_string(),
                },
            )
            .await
            .map_err(|err| {
                error!(%user_id, plan_id, db_error = ?err, "entitlements: failed to record grant");
                EntitlementError::Internal(err)
            })?;

        match grant {
            Some(grant) => {
                info!(
                    %user_id,
                    plan_id,
                    subscription_id = grant.id,
                    ends_at = %grant.ends_at,
                    "entitlements: grant recorded"
                );
                Ok(Some(SubscriptionModel::from(grant)))
            }
            None => {
                info!(%user_id, plan_id, "entitlements: duplicate provider ref, grant skipped");
                Ok(None)
            }
        }
    }

    /// Immediate cancellation: shortens the active grant's `ends_at` to now.
    /// Returns None when the user has nothing active.
    pub async fn cancel(&self, user_id: Uuid) -> EntitlementResult<Option<SubscriptionModel>> {
        let now = self.clock.now();
        let canceled = self
            .subscription_repo
            .shorten_active(user_id, now)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "entitlements: cancel failed");
                EntitlementError::Internal(err)
            })?;

        match canceled {
            Some(subscription) => {
                info!(
                    %user_id,
                    subscription_id = subscription.id,
                    ends_at = %subscription.ends_at,
                    "entitlements: subscription canceled"
                );
                Ok(Some(SubscriptionModel::from(subscription)))
            }
            None => {
                info!(%user_id, "entitlements: no active subscription to cancel");
                Ok(None)
            }
        }
    }

    pub async fn overview(&self) -> EntitlementResult<Vec<SubscriptionOverviewModel>> {
        let rows = self.subscription_repo.overview().await.map_err(|err| {
            error!(db_error = ?err, "entitlements: failed to load subscription overview");
            EntitlementError::Internal(err)
        })?;

        Ok(rows.into_iter().map(SubscriptionOverviewModel::from).collect())
    }
}
