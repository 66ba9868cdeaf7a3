use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    application::usecases::{
        entitlements::EntitlementUseCase,
        purchases::{PurchaseUseCase, WebhookVerifier},
    },
    config::config_model::DotEnvyConfig,
    domain::{
        clock::{Clock, SystemClock},
        repositories::{
            plans::PlanRepository, subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::subscriptions::PurchaseModel,
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::error_response},
        payments::PaymentWebhookVerifier,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                plans::PlanPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let entitlement_usecase = Arc::new(EntitlementUseCase::new(
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SystemClock),
    ));
    let purchase_usecase = PurchaseUseCase::new(
        Arc::clone(&entitlement_usecase),
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PaymentWebhookVerifier::new(config.payment.secret.clone())),
    );

    let entitlement_routes = Router::new()
        .route("/plans", get(list_plans))
        .route("/current", get(current))
        .route("/cancel", post(cancel))
        .with_state(entitlement_usecase);

    let purchase_routes = Router::new()
        .route("/purchase", post(purchase))
        .with_state(Arc::new(purchase_usecase));

    entitlement_routes.merge(purchase_routes)
}

pub async fn list_plans<P, S, C>(
    State(entitlement_usecase): State<Arc<EntitlementUseCase<P, S, C>>>,
) -> Response
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    match entitlement_usecase.list_plans().await {
        Ok(plans) => Json(plans).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn current<P, S, C>(
    State(entitlement_usecase): State<Arc<EntitlementUseCase<P, S, C>>>,
    auth_user: AuthUser,
) -> Response
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    match entitlement_usecase.active_subscription(auth_user.user_id).await {
        Ok(Some(subscription)) => Json(subscription).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "no active subscription".to_string(),
            Some("/api/v1/subscriptions/plans"),
        ),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn cancel<P, S, C>(
    State(entitlement_usecase): State<Arc<EntitlementUseCase<P, S, C>>>,
    auth_user: AuthUser,
) -> Response
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    match entitlement_usecase.cancel(auth_user.user_id).await {
        Ok(Some(subscription)) => Json(serde_json::json!({
            "message": "Your subscription has been canceled",
            "subscription": subscription,
        }))
        .into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "no active subscription to cancel".to_string(),
            None,
        ),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}

pub async fn purchase<P, S, C, U, V>(
    State(purchase_usecase): State<Arc<PurchaseUseCase<P, S, C, U, V>>>,
    auth_user: AuthUser,
    Json(purchase_model): Json<PurchaseModel>,
) -> Response
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
    U: UserRepository + Send + Sync + 'static,
    V: WebhookVerifier + 'static,
{
    match purchase_usecase
        .purchase(auth_user.user_id, purchase_model.plan_id)
        .await
    {
        Ok(subscription) => (StatusCode::CREATED, Json(subscription)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}
