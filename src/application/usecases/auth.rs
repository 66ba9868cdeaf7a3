use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::users::RegisterUserEntity,
    repositories::users::UserRepository,
    value_objects::users::{LoginModel, RegisterUserModel, UserModel},
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("all fields are required")]
    MissingFields,
    #[error("email already exists")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AuthError::MissingFields => StatusCode::BAD_REQUEST,
            AuthError::EmailTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

pub struct AuthUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
}

impl<U> AuthUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn register(&self, register_user_model: RegisterUserModel) -> AuthResult<UserModel> {
        let email = register_user_model.email.trim().to_lowercase();
        let username = register_user_model.username.trim().to_string();

        if email.is_empty() || username.is_empty() || register_user_model.password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let existing = self
            .user_repo
            .find_by_email(email.clone())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "auth: failed to check existing email");
                AuthError::Internal(err)
            })?;
        if existing.is_some() {
            warn!(%email, "auth: registration rejected, email already exists");
            return Err(AuthError::EmailTaken);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(register_user_model.password.as_bytes(), &salt)
            .map_err(|err| AuthError::Internal(anyhow!("password hashing failed: {}", err)))?
            .to_string();

        let user = self
            .user_repo
            .register(RegisterUserEntity {
                id: Uuid::new_v4(),
                email,
                username,
                password_hash,
                is_admin: false,
            })
            .await
            .map_err(|err| {
                error!(db_error = ?err, "auth: failed to insert user");
                AuthError::Internal(err)
            })?;

        info!(user_id = %user.id, "auth: account created");
        Ok(UserModel::from(user))
    }

    pub async fn login(&self, login_model: LoginModel) -> AuthResult<UserModel> {
        let email = login_model.email.trim().to_lowercase();

        let user = self
            .user_repo
            .find_by_email(email.clone())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "auth: failed to load user for login");
                AuthError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%email, "auth: login with unknown email");
                AuthError::InvalidCredentials
            })?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|err| AuthError::Internal(anyhow!("stored hash is invalid: {}", err)))?;

        if Argon2::default()
            .verify_password(login_model.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            warn!(user_id = %user.id, "auth: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = %user.id, "auth: login succeeded");
        Ok(UserModel::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::domain::{entities::users::UserEntity, repositories::users::MockUserRepository};

    fn hash(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string()
    }

    fn stored_user(password: &str) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            email: "viewer@example.com".to_string(),
            username: "viewer".to_string(),
            password_hash: hash(password),
            is_admin: false,
            profile_pic: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("hunter2"))));

        let auth = AuthUseCase::new(Arc::new(user_repo));
        let result = auth
            .register(RegisterUserModel {
                email: "Viewer@Example.com".to_string(),
                username: "viewer".to_string(),
                password: "hunter2".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_fields() {
        let auth = AuthUseCase::new(Arc::new(MockUserRepository::new()));
        let result = auth
            .register(RegisterUserModel {
                email: "  ".to_string(),
                username: "viewer".to_string(),
                password: "hunter2".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::MissingFields)));
    }

    #[tokio::test]
    async fn test_register_normalizes_email_and_hashes_password() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_email().returning(|_| Ok(None));
        user_repo
            .expect_register()
            .withf(|entity| {
                entity.email == "viewer@example.com"
                    && entity.password_hash != "hunter2"
                    && !entity.is_admin
            })
            .returning(|entity| {
                Ok(UserEntity {
                    id: entity.id,
                    email: entity.email,
                    username: entity.username,
                    password_hash: entity.password_hash,
                    is_admin: entity.is_admin,
                    profile_pic: None,
                    created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                })
            });

        let auth = AuthUseCase::new(Arc::new(user_repo));
        let user = auth
            .register(RegisterUserModel {
                email: " Viewer@Example.com ".to_string(),
                username: "viewer".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.email, "viewer@example.com");
    }

    #[tokio::test]
    async fn test_login_verifies_password() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_email()
            .returning(|_| Ok(Some(stored_user("hunter2"))));

        let auth = AuthUseCase::new(Arc::new(user_repo));

        let ok = auth
            .login(LoginModel {
                email: "viewer@example.com".to_string(),
                password: "hunter2".to_string(),
            })
            .await;
        assert!(ok.is_ok());

        let bad = auth
            .login(LoginModel {
                email: "viewer@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(bad, Err(AuthError::InvalidCredentials)));
    }
}
