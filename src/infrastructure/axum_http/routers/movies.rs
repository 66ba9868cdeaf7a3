use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    application::usecases::{entitlements::EntitlementUseCase, movies::MovieUseCase},
    domain::{
        clock::{Clock, SystemClock},
        repositories::{
            movies::MovieRepository, plans::PlanRepository, reviews::ReviewRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::movies::BrowseQueryModel,
        value_objects::reviews::InsertReviewModel,
    },
    infrastructure::{
        axum_http::{
            auth::{AuthUser, MaybeAuthUser},
            error_responses::error_response,
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                movies::MoviePostgres, plans::PlanPostgres, reviews::ReviewPostgres,
                subscriptions::SubscriptionPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let entitlement_usecase = EntitlementUseCase::new(
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SystemClock),
    );
    let movie_usecase = MovieUseCase::new(
        Arc::new(MoviePostgres::new(Arc::clone(&db_pool))),
        Arc::new(ReviewPostgres::new(Arc::clone(&db_pool))),
        Arc::new(entitlement_usecase),
    );

    Router::new()
        .route("/", get(browse))
        .route("/featured", get(featured))
        .route("/:movie_id", get(detail))
        .route("/:movie_id/reviews", post(add_review))
        .with_state(Arc::new(movie_usecase))
}

pub async fn browse<M, R, P, S, C>(
    State(movie_usecase): State<Arc<MovieUseCase<M, R, P, S, C>>>,
    Query(browse_query_model): Query<BrowseQueryModel>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    R: ReviewRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    match movie_usecase.browse(browse_query_model).await {
        Ok(movies) => Json(movies).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), err.redirect_hint()),
    }
}

pub async fn featured<M, R, P, S, C>(
    State(movie_usecase): State<Arc<MovieUseCase<M, R, P, S, C>>>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    R: ReviewRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    match movie_usecase.featured().await {
        Ok(movies) => Json(movies).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), err.redirect_hint()),
    }
}

pub async fn detail<M, R, P, S, C>(
    State(movie_usecase): State<Arc<MovieUseCase<M, R, P, S, C>>>,
    MaybeAuthUser(auth_user): MaybeAuthUser,
    Path(movie_id): Path<i64>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    R: ReviewRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    let viewer = auth_user.map(|auth_user| auth_user.viewer());
    match movie_usecase.detail(viewer, movie_id).await {
        Ok(detail) => Json(detail).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), err.redirect_hint()),
    }
}

pub async fn add_review<M, R, P, S, C>(
    State(movie_usecase): State<Arc<MovieUseCase<M, R, P, S, C>>>,
    auth_user: AuthUser,
    Path(movie_id): Path<i64>,
    Json(insert_review_model): Json<InsertReviewModel>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    R: ReviewRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    match movie_usecase
        .add_review(auth_user.viewer(), movie_id, insert_review_model)
        .await
    {
        Ok(review_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "review_id": review_id })),
        )
            .into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), err.redirect_hint()),
    }
}
