use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{
    repositories::{movies::MovieRepository, watchlists::WatchlistRepository},
    value_objects::watchlists::WatchlistEntryModel,
};

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("movie not found")]
    MovieNotFound,
    #[error("movie is not on the watchlist")]
    NotOnWatchlist,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl WatchlistError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            WatchlistError::MovieNotFound | WatchlistError::NotOnWatchlist => {
                StatusCode::NOT_FOUND
            }
            WatchlistError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type WatchlistResult<T> = std::result::Result<T, WatchlistError>;

pub struct WatchlistUseCase<W, M>
where
    W: WatchlistRepository + Send + Sync + 'static,
    M: MovieRepository + Send + Sync + 'static,
{
    watchlist_repo: Arc<W>,
    movie_repo: Arc<M>,
}

impl<W, M> WatchlistUseCase<W, M>
where
    W: WatchlistRepository + Send + Sync + 'static,
    M: MovieRepository + Send + Sync + 'static,
{
    pub fn new(watchlist_repo: Arc<W>, movie_repo: Arc<M>) -> Self {
        Self {
            watchlist_repo,
            movie_repo,
        }
    }

    pub async fn list(&self, user_id: Uuid) -> WatchlistResult<Vec<WatchlistEntryModel>> {
        let entries = self
            .watchlist_repo
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "watchlist: failed to load entries");
                WatchlistError::Internal(err)
            })?;

        Ok(entries.into_iter().map(WatchlistEntryModel::from).collect())
    }

    /// Adding an already-listed movie is a no-op, not an error.
    pub async fn add(&self, user_id: Uuid, movie_id: i64) -> WatchlistResult<bool> {
        let movie = self
            .movie_repo
            .find_by_id(movie_id)
            .await
            .map_err(|err| {
                error!(movie_id, db_error = ?err, "watchlist: failed to load movie");
                WatchlistError::Internal(err)
            })?
            .ok_or(WatchlistError::MovieNotFound)?;

        let inserted = self
            .watchlist_repo
            .add(user_id, movie.id)
            .await
            .map_err(|err| {
                error!(%user_id, movie_id, db_error = ?err, "watchlist: failed to add entry");
                WatchlistError::Internal(err)
            })?;

        if inserted {
            info!(%user_id, movie_id, "watchlist: entry added");
        }
        Ok(inserted)
    }

    pub async fn remove(&self, user_id: Uuid, movie_id: i64) -> WatchlistResult<()> {
        let removed = self
            .watchlist_repo
            .remove(user_id, movie_id)
            .await
            .map_err(|err| {
                error!(%user_id, movie_id, db_error = ?err, "watchlist: failed to remove entry");
                WatchlistError::Internal(err)
            })?;

        if removed == 0 {
            return Err(WatchlistError::NotOnWatchlist);
        }

        info!(%user_id, movie_id, "watchlist: entry removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::{
        entities::movies::MovieEntity,
        repositories::{movies::MockMovieRepository, watchlists::MockWatchlistRepository},
    };

    fn user_id() -> Uuid {
        Uuid::parse_str("9f2c8d3e-1111-2222-3333-444455556666").unwrap()
    }

    fn movie(id: i64) -> MovieEntity {
        MovieEntity {
            id,
            title: "Heat".to_string(),
            description: "Crime drama".to_string(),
            genre: Some("Crime".to_string()),
            trailer_url: None,
            poster_url: None,
            release_date: None,
            language: None,
            runtime_minutes: Some(170),
            age_rating: None,
            imdb_rating: Some(8.3),
            tags: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_add_rejects_unknown_movie() {
        let mut movie_repo = MockMovieRepository::new();
        movie_repo.expect_find_by_id().returning(|_| Ok(None));

        // No add expectation: a write for a missing movie would panic.
        let watchlist =
            WatchlistUseCase::new(Arc::new(MockWatchlistRepository::new()), Arc::new(movie_repo));

        let result = watchlist.add(user_id(), 42).await;
        assert!(matches!(result, Err(WatchlistError::MovieNotFound)));
    }

    #[tokio::test]
    async fn test_add_reports_duplicates_without_error() {
        let mut movie_repo = MockMovieRepository::new();
        movie_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(movie(id))));

        let mut watchlist_repo = MockWatchlistRepository::new();
        watchlist_repo.expect_add().returning(|_, _| Ok(false));

        let watchlist = WatchlistUseCase::new(Arc::new(watchlist_repo), Arc::new(movie_repo));

        let inserted = watchlist.add(user_id(), 42).await.unwrap();
        assert!(!inserted);
    }

    #[tokio::test]
    async fn test_remove_missing_entry_is_not_found() {
        let mut watchlist_repo = MockWatchlistRepository::new();
        watchlist_repo.expect_remove().returning(|_, _| Ok(0));

        let watchlist =
            WatchlistUseCase::new(Arc::new(watchlist_repo), Arc::new(MockMovieRepository::new()));

        let result = watchlist.remove(user_id(), 42).await;
        assert!(matches!(result, Err(WatchlistError::NotOnWatchlist)));
    }
}
