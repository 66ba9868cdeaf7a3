use anyhow::Result;
use axum::async_trait;
use mockall::automock;

use crate::domain::entities::movies::{EditMovieEntity, InsertMovieEntity, MovieEntity};

#[automock]
#[async_trait]
pub trait MovieRepository {
    async fn browse(&self, q: Option<String>, genre: Option<String>) -> Result<Vec<MovieEntity>>;
    async fn featured(&self, limit: i64) -> Result<Vec<MovieEntity>>;
    async fn latest(&self, limit: i64) -> Result<Vec<MovieEntity>>;
    async fn find_by_id(&self, movie_id: i64) -> Result<Option<MovieEntity>>;
    async fn add(&self, insert_movie_entity: InsertMovieEntity) -> Result<MovieEntity>;
    async fn edit(
        &self,
        movie_id: i64,
        edit_movie_entity: EditMovieEntity,
    ) -> Result<Option<MovieEntity>>;
    async fn delete(&self, movie_id: i64) -> Result<usize>;
}
