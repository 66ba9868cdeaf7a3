use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::movies::{EditMovieEntity, InsertMovieEntity, MovieEntity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieModel {
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

impl From<MovieEntity> for MovieModel {
    fn from(entity: MovieEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            genre: entity.genre,
            trailer_url: entity.trailer_url,
            poster_url: entity.poster_url,
            release_date: entity.release_date,
            language: entity.language,
            runtime_minutes: entity.runtime_minutes,
            age_rating: entity.age_rating,
            imdb_rating: entity.imdb_rating,
            tags: entity.tags,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertMovieModel {
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

impl From<InsertMovieModel> for InsertMovieEntity {
    fn from(model: InsertMovieModel) -> Self {
        Self {
            title: model.title,
            description: model.description,
            genre: model.genre,
            trailer_url: model.trailer_url,
            poster_url: model.poster_url,
            release_date: model.release_date,
            language: model.language,
            runtime_minutes: model.runtime_minutes,
            age_rating: model.age_rating,
            imdb_rating: model.imdb_rating,
            tags: model.tags,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditMovieModel {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub trailer_url: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
}

impl From<EditMovieModel> for EditMovieEntity {
    fn from(model: EditMovieModel) -> Self {
        Self {
            title: model.title,
            description: model.description,
            genre: model.genre,
            trailer_url: model.trailer_url,
            poster_url: model.poster_url,
            release_date: model.release_date,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQueryModel {
    pub q: Option<String>,
    pub genre: Option<String>,
}
