use std::sync::Arc;

use anyhow::Result;
use axum::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};

use crate::{
    domain::{
        entities::movies::{EditMovieEntity, InsertMovieEntity, MovieEntity},
        repositories::movies::MovieRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::movies},
};

pub struct MoviePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MoviePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MovieRepository for MoviePostgres {
    async fn browse(&self, q: Option<String>, genre: Option<String>) -> Result<Vec<MovieEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = movies::table.into_boxed();

        if let Some(q) = q {
            let pattern = format!("%{}%", q);
            query = query.filter(
                movies::title
                    .ilike(pattern.clone())
                    .or(movies::description.ilike(pattern.clone()))
                    .or(movies::genre.assume_not_null().ilike(pattern)),
            );
        }

        if let Some(genre) = genre {
            let pattern = format!("%{}%", genre);
            query = query.filter(movies::genre.assume_not_null().ilike(pattern));
        }

        let results = query
            .order(movies::created_at.desc())
            .select(MovieEntity::as_select())
            .load::<MovieEntity>(&mut conn)?;

        Ok(results)
    }

    async fn featured(&self, limit: i64) -> Result<Vec<MovieEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = movies::table
            .filter(
                movies::tags
                    .assume_not_null()
                    .ilike("%trending%")
                    .or(movies::tags.assume_not_null().ilike("%featured%"))
                    .or(movies::tags.assume_not_null().ilike("%popular%")),
            )
            .order(movies::created_at.desc())
            .limit(limit)
            .select(MovieEntity::as_select())
            .load::<MovieEntity>(&mut conn)?;

        Ok(results)
    }

    async fn latest(&self, limit: i64) -> Result<Vec<MovieEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = movies::table
            .order(movies::created_at.desc())
            .limit(limit)
            .select(MovieEntity::as_select())
            .load::<MovieEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, movie_id: i64) -> Result<Option<MovieEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = movies::table
            .filter(movies::id.eq(movie_id))
            .select(MovieEntity::as_select())
            .first::<MovieEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn add(&self, insert_movie_entity: InsertMovieEntity) -> Result<MovieEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(movies::table)
            .values(&insert_movie_entity)
            .returning(MovieEntity::as_returning())
            .get_result::<MovieEntity>(&mut conn)?;

        Ok(result)
    }

    async fn edit(
        &self,
        movie_id: i64,
        edit_movie_entity: EditMovieEntity,
    ) -> Result<Option<MovieEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(movies::table)
            .filter(movies::id.eq(movie_id))
            .set(&edit_movie_entity)
            .returning(MovieEntity::as_returning())
            .get_result::<MovieEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, movie_id: i64) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(movies::table.filter(movies::id.eq(movie_id))).execute(&mut conn)?;

        Ok(deleted)
    }
}
