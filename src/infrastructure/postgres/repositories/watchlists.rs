use std::sync::Arc;

use anyhow::Result;
use axum::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*};
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            movies::MovieEntity,
            watchlist_items::{InsertWatchlistItemEntity, WatchlistItemEntity},
        },
        repositories::watchlists::WatchlistRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{movies, watchlist_items},
    },
};

pub struct WatchlistPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl WatchlistPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl WatchlistRepository for WatchlistPostgres {
    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(WatchlistItemEntity, MovieEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = watchlist_items::table
            .inner_join(movies::table)
            .filter(watchlist_items::user_id.eq(user_id))
            .order(watchlist_items::created_at.desc())
            .select((WatchlistItemEntity::as_select(), MovieEntity::as_select()))
            .load::<(WatchlistItemEntity, MovieEntity)>(&mut conn)?;

        Ok(results)
    }

    async fn add(&self, user_id: Uuid, movie_id: i64) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(watchlist_items::table)
            .values(&InsertWatchlistItemEntity { user_id, movie_id })
            .on_conflict((watchlist_items::user_id, watchlist_items::movie_id))
            .do_nothing()
            .execute(&mut conn)?;

        Ok(inserted > 0)
    }

    async fn remove(&self, user_id: Uuid, movie_id: i64) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let removed = delete(
            watchlist_items::table
                .filter(watchlist_items::user_id.eq(user_id))
                .filter(watchlist_items::movie_id.eq(movie_id)),
        )
        .execute(&mut conn)?;

        Ok(removed)
    }
}
