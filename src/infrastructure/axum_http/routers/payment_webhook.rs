use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::warn;

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
    },
    infrastructure::{
        axum_http::error_responses::error_response,
        payments::PaymentWebhookVerifier,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                plans::PlanPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
            },
        },
    },
};

pub const SIGNATURE_HEADER: &str = "payment-signature";

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let entitlement_usecase = Arc::new(EntitlementUseCase::new(
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SystemClock),
    ));
    let purchase_usecase = PurchaseUseCase::new(
        entitlement_usecase,
        Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PaymentWebhookVerifier::new(config.payment.secret.clone())),
    );

    Router::new()
        .route("/", post(receive))
        .with_state(Arc::new(purchase_usecase))
}

/// The provider retries on anything but 2xx, so every permanently invalid
/// message must be acknowledged and only transient failures may 5xx.
pub async fn receive<P, S, C, U, V>(
    State(purchase_usecase): State<Arc<PurchaseUseCase<P, S, C, U, V>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
    U: UserRepository + Send + Sync + 'static,
    V: WebhookVerifier + 'static,
{
    let signature_header = match headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) {
        Some(signature_header) => signature_header,
        None => {
            warn!("payment webhook: missing signature header");
            return error_response(
                StatusCode::BAD_REQUEST,
                "missing signature header".to_string(),
                None,
            );
        }
    };

    match purchase_usecase.handle_webhook(&body, signature_header).await {
        Ok(outcome) => Json(serde_json::json!({ "outcome": outcome })).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string(), None),
    }
}
