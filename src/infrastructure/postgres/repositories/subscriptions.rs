use std::sync::Arc;

use anyhow::Result;
use axum::async_trait;
use chrono::{DateTime, Utc};
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            payments::InsertPaymentEntity,
            plans::PlanEntity,
            subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
            users::UserEntity,
        },
        repositories::subscriptions::SubscriptionRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{payments, plans, subscriptions, users},
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_active(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::ends_at.gt(now))
            .order((subscriptions::ends_at.desc(), subscriptions::id.desc()))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn record_grant(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
        insert_payment_entity: InsertPaymentEntity,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Grant and payment commit together or not at all. A provider_ref
        // that is already recorded makes the insert a no-op, and the payment
        // insert is skipped with it (webhook redelivery).
        let result = conn.transaction::<Option<SubscriptionEntity>, diesel::result::Error, _>(
            |conn| {
                let grant = insert_into(subscriptions::table)
                    .values(&insert_subscription_entity)
                    .on_conflict(subscriptions::provider_ref)
                    .do_nothing()
                    .returning(SubscriptionEntity::as_returning())
                    .get_result::<SubscriptionEntity>(conn)
                    .optional()?;

                let Some(grant) = grant else {
                    return Ok(None);
                };

                insert_into(payments::table)
                    .values(&insert_payment_entity)
                    .execute(conn)?;

                Ok(Some(grant))
            },
        )?;

        Ok(result)
    }

    async fn shorten_active(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<Option<SubscriptionEntity>, diesel::result::Error, _>(
            |conn| {
                let active_id = subscriptions::table
                    .filter(subscriptions::user_id.eq(user_id))
                    .filter(subscriptions::ends_at.gt(now))
                    .order((subscriptions::ends_at.desc(), subscriptions::id.desc()))
                    .select(subscriptions::id)
                    .first::<i64>(conn)
                    .optional()?;

                let Some(active_id) = active_id else {
                    return Ok(None);
                };

                // The ends_at guard makes this a conditional update: if a
                // concurrent writer already shortened the grant, zero rows
                // match and the cancel reports nothing active.
                update(subscriptions::table)
                    .filter(subscriptions::id.eq(active_id))
                    .filter(subscriptions::ends_at.gt(now))
                    .set(subscriptions::ends_at.eq(now))
                    .returning(SubscriptionEntity::as_returning())
                    .get_result::<SubscriptionEntity>(conn)
                    .optional()
            },
        )?;

        Ok(result)
    }

    async fn overview(&self) -> Result<Vec<(SubscriptionEntity, PlanEntity, UserEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscriptions::table
            .inner_join(plans::table)
            .inner_join(users::table)
            .order(subscriptions::ends_at.desc())
            .select((
                SubscriptionEntity::as_select(),
                PlanEntity::as_select(),
                UserEntity::as_select(),
            ))
            .load::<(SubscriptionEntity, PlanEntity, UserEntity)>(&mut conn)?;

        Ok(results)
    }
}
