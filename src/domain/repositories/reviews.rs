use anyhow::Result;
use axum::async_trait;
use mockall::automock;

use crate::domain::entities::{
    reviews::{InsertReviewEntity, ReviewEntity},
    users::UserEntity,
};

#[automock]
#[async_trait]
pub trait ReviewRepository {
    async fn list_by_movie(&self, movie_id: i64) -> Result<Vec<(ReviewEntity, UserEntity)>>;
    async fn add(&self, insert_review_entity: InsertReviewEntity) -> Result<ReviewEntity>;
}
