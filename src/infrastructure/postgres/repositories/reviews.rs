use std::sync::Arc;

use anyhow::Result;
use axum::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};

use crate::{
    domain::{
        entities::{
            reviews::{InsertReviewEntity, ReviewEntity},
            users::UserEntity,
        },
        repositories::reviews::ReviewRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{reviews, users},
    },
};

pub struct ReviewPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ReviewPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ReviewRepository for ReviewPostgres {
    async fn list_by_movie(&self, movie_id: i64) -> Result<Vec<(ReviewEntity, UserEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = reviews::table
            .inner_join(users::table)
            .filter(reviews::movie_id.eq(movie_id))
            .order(reviews::created_at.desc())
            .select((ReviewEntity::as_select(), UserEntity::as_select()))
            .load::<(ReviewEntity, UserEntity)>(&mut conn)?;

        Ok(results)
    }

    async fn add(&self, insert_review_entity: InsertReviewEntity) -> Result<ReviewEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(reviews::table)
            .values(&insert_review_entity)
            .returning(ReviewEntity::as_returning())
            .get_result::<ReviewEntity>(&mut conn)?;

        Ok(result)
    }
}
