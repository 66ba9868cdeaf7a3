use anyhow::Result;
use axum::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::{RegisterUserEntity, UserEntity};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn register(&self, register_user_entity: RegisterUserEntity) -> Result<UserEntity>;
    async fn find_by_email(&self, email: String) -> Result<Option<UserEntity>>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;
    async fn update_username(&self, user_id: Uuid, username: String) -> Result<UserEntity>;
}
