use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, patch},
};

use crate::{
    application::usecases::{entitlements::EntitlementUseCase, users::UserUseCase},
    domain::{
        clock::{Clock, SystemClock},
        repositories::{
            plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
            watchlists::WatchlistRepository,
        },
        value_objects::users::EditProfileModel,
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                plans::PlanPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
                watchlists::WatchlistPostgres,
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
    let user_usecase = UserUseCase::new(
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(WatchlistPostgres::new(Arc::clone(&db_pool))),
        Arc::new(entitlement_usecase),
    );

    Router::new()
        .route("/me", get(dashboard))
        .route("/me", patch(update_username))
        .with_state(Arc::new(user_usecase))
}

pub async fn dashboard<U, W, P, S, C>(
    State(user_usecase): State<Arc<UserUseCase<U, W, P, S, C>>>,
    auth_user: AuthUser,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    W: WatchlistRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    match user_usecase.dashboard(auth_user.user_id).await {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn update_username<U, W, P, S, C>(
    State(user_usecase): State<Arc<UserUseCase<U, W, P, S, C>>>,
    auth_user: AuthUser,
    Json(edit_profile_model): Json<EditProfileModel>,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
    W: WatchlistRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    match user_usecase
        .update_username(auth_user.user_id, edit_profile_model)
        .await
    {
        Ok(user) => Json(user).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}
