use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::plans::PlanEntity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanModel {
    pub id: i64,
    pub name: String,
    pub price_minor: i32,
    pub duration_days: i32,
    pub created_at: DateTime<Utc>,
}

impl From<PlanEntity> for PlanModel {
    fn from(entity: PlanEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            price_minor: entity.price_minor,
            duration_days: entity.duration_days,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertPlanModel {
    pub name: String,
    pub price_minor: i32,
    pub duration_days: i32,
}
