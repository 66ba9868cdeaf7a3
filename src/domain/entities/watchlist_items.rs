use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::watchlist_items;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = watchlist_items)]
pub struct WatchlistItemEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub movie_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = watchlist_items)]
pub struct InsertWatchlistItemEntity {
    pub user_id: Uuid,
    pub movie_id: i64,
}
