use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    application::usecases::entitlements::EntitlementUseCase,
    domain::{
        clock::Clock,
        repositories::{
            plans::PlanRepository, subscriptions::SubscriptionRepository,
            users::UserRepository, watchlists::WatchlistRepository,
        },
        value_objects::{
            subscriptions::CurrentSubscriptionModel,
            users::{EditProfileModel, UserModel},
            watchlists::WatchlistEntryModel,
        },
    },
};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UserError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::Validation(_) => StatusCode::BAD_REQUEST,
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UserResult<T> = std::result::Result<T, UserError>;

/// Everything the account page needs in one response: who the viewer is,
/// what they have saved, and whether they currently hold an entitlement.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardModel {
    pub user: UserModel,
    pub watchlist: Vec<WatchlistEntryModel>,
    pub subscription: Option<CurrentSubscriptionModel>,
}

pub struct UserUseCase<U, W, P, S, C>
where
    U: UserRepository + Send + Sync + 'static,
    W: WatchlistRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    user_repo: Arc<U>,
    watchlist_repo: Arc<W>,
    entitlements: Arc<EntitlementUseCase<P, S, C>>,
}

impl<U, W, P, S, C> UserUseCase<U, W, P, S, C>
where
    U: UserRepository + Send + Sync + 'static,
    W: WatchlistRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: Clock + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        watchlist_repo: Arc<W>,
        entitlements: Arc<EntitlementUseCase<P, S, C>>,
    ) -> Self {
        Self {
            user_repo,
            watchlist_repo,
            entitlements,
        }
    }

    pub async fn dashboard(&self, user_id: Uuid) -> UserResult<DashboardModel> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to load profile");
                UserError::Internal(err)
            })?
            .ok_or(UserError::NotFound)?;

        let watchlist = self
            .watchlist_repo
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to load watchlist");
                UserError::Internal(err)
            })?;

        let subscription = self
            .entitlements
            .active_subscription(user_id)
            .await
            .map_err(|err| UserError::Internal(err.into()))?;

        Ok(DashboardModel {
            user: UserModel::from(user),
            watchlist: watchlist.into_iter().map(WatchlistEntryModel::from).collect(),
            subscription,
        })
    }

    pub async fn update_username(
        &self,
        user_id: Uuid,
        edit_profile_model: EditProfileModel,
    ) -> UserResult<UserModel> {
        let username = edit_profile_model.username.trim().to_string();
        if username.is_empty() {
            return Err(UserError::Validation("username must not be empty".to_string()));
        }

        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to load user for update");
                UserError::Internal(err)
            })?
            .ok_or(UserError::NotFound)?;

        let user = self
            .user_repo
            .update_username(user_id, username)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to update username");
                UserError::Internal(err)
            })?;

        info!(%user_id, username = %user.username, "users: username updated");
        Ok(UserModel::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    use crate::domain::{
        clock::MockClock,
        entities::{subscriptions::SubscriptionEntity, users::UserEntity},
        repositories::{
            plans::MockPlanRepository, subscriptions::MockSubscriptionRepository,
            users::MockUserRepository, watchlists::MockWatchlistRepository,
        },
    };

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn user_id() -> Uuid {
        Uuid::parse_str("9f2c8d3e-1111-2222-3333-444455556666").unwrap()
    }

    fn stored_user() -> UserEntity {
        UserEntity {
            id: user_id(),
            email: "viewer@example.com".to_string(),
            username: "viewer".to_string(),
            password_hash: "hash".to_string(),
            is_admin: false,
            profile_pic: None,
            created_at: t0(),
        }
    }

    fn usecase(
        user_repo: MockUserRepository,
        watchlist_repo: MockWatchlistRepository,
        plan_repo: MockPlanRepository,
        subscription_repo: MockSubscriptionRepository,
    ) -> UserUseCase<
        MockUserRepository,
        MockWatchlistRepository,
        MockPlanRepository,
        MockSubscriptionRepository,
        MockClock,
    > {
        let mut clock = MockClock::new();
        clock.expect_now().returning(t0);
        let entitlements = Arc::new(EntitlementUseCase::new(
            Arc::new(plan_repo),
            Arc::new(subscription_repo),
            Arc::new(clock),
        ));
        UserUseCase::new(Arc::new(user_repo), Arc::new(watchlist_repo), entitlements)
    }

    #[tokio::test]
    async fn test_dashboard_composes_profile_watchlist_and_entitlement() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(stored_user())));

        let mut watchlist_repo = MockWatchlistRepository::new();
        watchlist_repo.expect_list_by_user().returning(|_| Ok(vec![]));

        let mut plan_repo = MockPlanRepository::new();
        plan_repo.expect_find_by_id().returning(|id| {
            Ok(Some(crate::domain::entities::plans::PlanEntity {
                id,
                name: "Premium".to_string(),
                price_minor: 599,
                duration_days: 30,
                created_at: t0(),
            }))
        });

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_find_active().returning(|user_id, _| {
            Ok(Some(SubscriptionEntity {
                id: 7,
                user_id,
                plan_id: 1,
                starts_at: t0(),
                ends_at: t0() + Duration::days(30),
                provider_ref: None,
                created_at: t0(),
            }))
        });

        let users = usecase(user_repo, watchlist_repo, plan_repo, subscription_repo);

        let dashboard = users.dashboard(user_id()).await.unwrap();
        assert_eq!(dashboard.user.username, "viewer");
        assert!(dashboard.subscription.is_some());
    }

    #[tokio::test]
    async fn test_update_username_rejects_blank() {
        let users = usecase(
            MockUserRepository::new(),
            MockWatchlistRepository::new(),
            MockPlanRepository::new(),
            MockSubscriptionRepository::new(),
        );

        let result = users
            .update_username(
                user_id(),
                EditProfileModel {
                    username: "   ".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_username_for_unknown_user_is_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().returning(|_| Ok(None));

        let users = usecase(
            user_repo,
            MockWatchlistRepository::new(),
            MockPlanRepository::new(),
            MockSubscriptionRepository::new(),
        );

        let result = users
            .update_username(
                user_id(),
                EditProfileModel {
                    username: "newname".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::NotFound)));
    }
}
