use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{
    plans::PlanEntity, subscriptions::SubscriptionEntity, users::UserEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionModel {
    pub id: i64,
    pub user_id: Uuid,
    pub plan_id: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for SubscriptionModel {
    fn from(entity: SubscriptionEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            plan_id: entity.plan_id,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
        }
    }
}

/// Entitlement state shown on the user dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentSubscriptionModel {
    pub subscription_id: i64,
    pub plan_id: i64,
    pub plan_name: String,
    pub price_minor: i32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseModel {
    pub plan_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionOverviewModel {
    pub subscription_id: i64,
    pub username: String,
    pub email: String,
    pub plan_name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl From<(SubscriptionEntity, PlanEntity, UserEntity)> for SubscriptionOverviewModel {
    fn from((subscription, plan, user): (SubscriptionEntity, PlanEntity, UserEntity)) -> Self {
        Self {
            subscription_id: subscription.id,
            username: user.username,
            email: user.email,
            plan_name: plan.name,
            starts_at: subscription.starts_at,
            ends_at: subscription.ends_at,
        }
    }
}
