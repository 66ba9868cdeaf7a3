use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::error;

use crate::{
    application::usecases::auth::AuthUseCase,
    domain::{
        repositories::users::UserRepository,
        value_objects::users::{LoginModel, LoginResponseModel, RegisterUserModel},
    },
    infrastructure::{
        axum_http::{auth, error_responses::error_response},
        postgres::{postgres_connection::PgPoolSquad, repositories::users::UserPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let auth_usecase = AuthUseCase::new(Arc::new(user_repository));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(Arc::new(auth_usecase))
}

pub async fn register<U>(
    State(auth_usecase): State<Arc<AuthUseCase<U>>>,
    Json(register_user_model): Json<RegisterUserModel>,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
{
    match auth_usecase.register(register_user_model).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn login<U>(
    State(auth_usecase): State<Arc<AuthUseCase<U>>>,
    Json(login_model): Json<LoginModel>,
) -> Response
where
    U: UserRepository + Send + Sync + 'static,
{
    match auth_usecase.login(login_model).await {
        Ok(user) => match auth::generate_token(user.id, user.is_admin) {
            Ok(access_token) => {
                Json(LoginResponseModel { access_token, user }).into_response()
            }
            Err(err) => {
                error!(error = %err, "auth router: failed to issue token");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to issue token".to_string(),
                    None,
                )
            }
        },
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}
