use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::movies;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = movies)]
pub struct MovieEntity {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub genre: Option<String>,
    pub trailer_url: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub language: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub age_rating: Option<String>,
    pub imdb_rating: Option<f64>,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = movies)]
pub struct InsertMovieEntity {
    pub title: String,
    pub description: String,
    pub genre: Option<String>,
    pub trailer_url: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub language: Option<String>,
    pub runtime_minutes: Option<i32>,
    pub age_rating: Option<String>,
    pub imdb_rating: Option<f64>,
    pub tags: Option<String>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = movies)]
pub struct EditMovieEntity {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub trailer_url: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
}
