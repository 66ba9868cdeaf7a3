use anyhow::Result;
use axum::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{movies::MovieEntity, watchlist_items::WatchlistItemEntity};

#[automock]
#[async_trait]
pub trait WatchlistRepository {
    async fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(WatchlistItemEntity, MovieEntity)>>;
    /// Returns false when the movie is already on the user's watchlist.
    async fn add(&self, user_id: Uuid, movie_id: i64) -> Result<bool>;
    async fn remove(&self, user_id: Uuid, movie_id: i64) -> Result<usize>;
}
