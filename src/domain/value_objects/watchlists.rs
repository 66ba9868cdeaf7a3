use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    entities::{movies::MovieEntity, watchlist_items::WatchlistItemEntity},
    value_objects::movies::MovieModel,
};

#[derive(Debug, Clone, Serialize)]
pub struct WatchlistEntryModel {
    pub movie: MovieModel,
    pub added_at: DateTime<Utc>,
}

impl From<(WatchlistItemEntity, MovieEntity)> for WatchlistEntryModel {
    fn from((item, movie): (WatchlistItemEntity, MovieEntity)) -> Self {
        Self {
            movie: MovieModel::from(movie),
            added_at: item.created_at,
        }
    }
}
