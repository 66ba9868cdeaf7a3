use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{reviews::ReviewEntity, users::UserEntity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewModel {
    pub id: i64,
    pub movie_id: i64,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl From<(ReviewEntity, UserEntity)> for ReviewModel {
    fn from((review, user): (ReviewEntity, UserEntity)) -> Self {
        Self {
            id: review.id,
            movie_id: review.movie_id,
            user_id: review.user_id,
            username: user.username,
            content: review.content,
            rating: review.rating,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertReviewModel {
    pub content: String,
    pub rating: i32,
}
