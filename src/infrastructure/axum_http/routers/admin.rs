use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use tracing::warn;

use crate::{
    application::usecases::{entitlements::EntitlementUseCase, movies::MovieUseCase},
    domain::{
        clock::{Clock, SystemClock},
        repositories::{
            movies::MovieRepository, plans::PlanRepository, reviews::ReviewRepository,
            subscriptions::SubscriptionRepository,
        },
        value_objects::{
            movies::{EditMovieModel, InsertMovieModel},
            plans::InsertPlanModel,
        },
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
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
    let entitlement_usecase = Arc::new(EntitlementUseCase::new(
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SystemClock),
    ));
    let movie_usecase = MovieUseCase::new(
        Arc::new(MoviePostgres::new(Arc::clone(&db_pool))),
        Arc::new(ReviewPostgres::new(Arc::clone(&db_pool))),
        Arc::clone(&entitlement_usecase),
    );

    let movie_routes = Router::new()
        .route("/movies", post(add_movie))
        .route("/movies/:movie_id", put(edit_movie))
        .route("/movies/:movie_id", delete(delete_movie))
        .with_state(Arc::new(movie_usecase));

    let entitlement_routes = Router::new()
        .route("/plans", get(list_plans))
        .route("/plans", post(create_plan))
        .route("/subscriptions", get(subscription_overview))
        .with_state(entitlement_usecase);

    movie_routes.merge(entitlement_routes)
}

/// Every admin handler checks the caller's role up front and refuses with
/// 403 before touching any state.
fn ensure_admin(auth_user: &AuthUser) -> Result<(), Response> {
    if auth_user.is_admin {
        return Ok(());
    }

    warn!(user_id = %auth_user.user_id, "admin router: non-admin caller rejected");
    Err(error_response(
        StatusCode::FORBIDDEN,
        "admin access required".to_string(),
        None,
    ))
}

pub async fn add_movie<M, R, P, S, C>(
    State(movie_usecase): State<Arc<MovieUseCase<M, R, P, S, C>>>,
    auth_user: AuthUser,
    Json(insert_movie_model): Json<InsertMovieModel>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    R: ReviewRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    if let Err(rejection) = ensure_admin(&auth_user) {
        return rejection;
    }

    match movie_usecase.add_movie(insert_movie_model).await {
        Ok(movie) => (StatusCode::CREATED, Json(movie)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn edit_movie<M, R, P, S, C>(
    State(movie_usecase): State<Arc<MovieUseCase<M, R, P, S, C>>>,
    auth_user: AuthUser,
    Path(movie_id): Path<i64>,
    Json(edit_movie_model): Json<EditMovieModel>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    R: ReviewRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    if let Err(rejection) = ensure_admin(&auth_user) {
        return rejection;
    }

    match movie_usecase.edit_movie(movie_id, edit_movie_model).await {
        Ok(movie) => Json(movie).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn delete_movie<M, R, P, S, C>(
    State(movie_usecase): State<Arc<MovieUseCase<M, R, P, S, C>>>,
    auth_user: AuthUser,
    Path(movie_id): Path<i64>,
) -> Response
where
    M: MovieRepository + Send + Sync + 'static,
    R: ReviewRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    if let Err(rejection) = ensure_admin(&auth_user) {
        return rejection;
    }

    match movie_usecase.delete_movie(movie_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn list_plans<P, S, C>(
    State(entitlement_usecase): State<Arc<EntitlementUseCase<P, S, C>>>,
    auth_user: AuthUser,
) -> Response
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    if let Err(rejection) = ensure_admin(&auth_user) {
        return rejection;
    }

    match entitlement_usecase.list_plans().await {
        Ok(plans) => Json(plans).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn create_plan<P, S, C>(
    State(entitlement_usecase): State<Arc<EntitlementUseCase<P, S, C>>>,
    auth_user: AuthUser,
    Json(insert_plan_model): Json<InsertPlanModel>,
) -> Response
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    if let Err(rejection) = ensure_admin(&auth_user) {
        return rejection;
    }

    match entitlement_usecase.create_plan(insert_plan_model).await {
        Ok(plan) => (StatusCode::CREATED, Json(plan)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn subscription_overview<P, S, C>(
    State(entitlement_usecase): State<Arc<EntitlementUseCase<P, S, C>>>,
    auth_user: AuthUser,
) -> Response
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    if let Err(rejection) = ensure_admin(&auth_user) {
        return rejection;
    }

    match entitlement_usecase.overview().await {
        Ok(overview) => Json(overview).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}
