use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};

use crate::{
    application::usecases::watchlists::WatchlistUseCase,
    domain::repositories::{movies::MovieRepository, watchlists::WatchlistRepository},
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{movies::MoviePostgres, watchlists::WatchlistPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let watchlist_usecase = WatchlistUseCase::new(
        Arc::new(WatchlistPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MoviePostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route("/", get(list))
        .route("/:movie_id", post(add))
        .route("/:movie_id", delete(remove))
        .with_state(Arc::new(watchlist_usecase))
}

pub async fn list<W, M>(
    State(watchlist_usecase): State<Arc<WatchlistUseCase<W, M>>>,
    auth_user: AuthUser,
) -> Response
where
    W: WatchlistRepository + Send + Sync + 'static,
    M: MovieRepository + Send + Sync + 'static,
{
    match watchlist_usecase.list(auth_user.user_id).await {
        Ok(entries) => Json(entries).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn add<W, M>(
    State(watchlist_usecase): State<Arc<WatchlistUseCase<W, M>>>,
    auth_user: AuthUser,
    Path(movie_id): Path<i64>,
) -> Response
where
    W: WatchlistRepository + Send + Sync + 'static,
    M: MovieRepository + Send + Sync + 'static,
{
    match watchlist_usecase.add(auth_user.user_id, movie_id).await {
        Ok(true) => StatusCode::CREATED.into_response(),
        Ok(false) => StatusCode::OK.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn remove<W, M>(
    State(watchlist_usecase): State<Arc<WatchlistUseCase<W, M>>>,
    auth_user: AuthUser,
    Path(movie_id): Path<i64>,
) -> Response
where
    W: WatchlistRepository + Send + Sync + 'static,
    M: MovieRepository + Send + Sync + 'static,
{
    match watchlist_usecase.remove(auth_user.user_id, movie_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}
