use anyhow::Result;
use axum::async_trait;
use mockall::automock;

use crate::domain::entities::plans::{InsertPlanEntity, PlanEntity};

#[automock]
#[async_trait]
pub trait PlanRepository {
    async fn list_by_price(&self) -> Result<Vec<PlanEntity>>;
    async fn find_by_id(&self, plan_id: i64) -> Result<Option<PlanEntity>>;
    async fn add(&self, insert_plan_entity: InsertPlanEntity) -> Result<PlanEntity>;
}
