use std::sync::Arc;

use async_trait::async_trait;
use staybook_core::{AppResult, NonEmptyString};
use staybook_domain::{EmailAddress, User, UserId, UserWithRoles};

use crate::AuthorizationRepository;

/// Input for creating a user account.
///
/// The credential digest is produced by the (out-of-scope) authentication
/// layer; this core stores it opaquely.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Pre-hashed credential material.
    pub password_hash: String,
}

/// Profile fields applied by an update.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
}

/// Repository port for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user, returning the stored row. A live user with the
    /// same email or phone surfaces as [`staybook_core::AppError::Conflict`].
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Loads a live user by id, failing with
    /// [`staybook_core::AppError::NotFound`] when absent or soft-deleted.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<User>;

    /// Loads a live user by email.
    async fn find_by_email(&self, email: &str) -> AppResult<User>;

    /// Loads a live user by phone.
    async fn find_by_phone(&self, phone: &str) -> AppResult<User>;

    /// Applies profile fields to a live user.
    async fn update(&self, user_id: UserId, update: UserUpdate) -> AppResult<()>;

    /// Tombstones a live user. Membership facts are left in place; the
    /// soft-delete filter excludes them from resolution.
    async fn soft_delete(&self, user_id: UserId) -> AppResult<()>;

    /// Lists live users, newest first.
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<User>>;
}

/// Application service for user account management.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    authorization_repository: Arc<dyn AuthorizationRepository>,
}

impl UserService {
    /// Creates a new user service from repository implementations.
    #[must_use]
    pub fn new(
        repository: Arc<dyn UserRepository>,
        authorization_repository: Arc<dyn AuthorizationRepository>,
    ) -> Self {
        Self {
            repository,
            authorization_repository,
        }
    }

    /// Validates and persists a new user account.
    pub async fn create_user(&self, input: NewUser) -> AppResult<User> {
        let name = NonEmptyString::new(input.name)?;
        let email = EmailAddress::new(input.email)?;
        let phone = NonEmptyString::new(input.phone)?;

        self.repository
            .create(NewUser {
                name: name.into(),
                email: email.into(),
                phone: phone.into(),
                password_hash: input.password_hash,
            })
            .await
    }

    /// Loads a user by id.
    pub async fn get_user(&self, user_id: UserId) -> AppResult<User> {
        self.repository.find_by_id(user_id).await
    }

    /// Loads a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.repository.find_by_email(email).await
    }

    /// Loads a user by phone.
    pub async fn get_user_by_phone(&self, phone: &str) -> AppResult<User> {
        self.repository.find_by_phone(phone).await
    }

    /// Validates and applies a profile update.
    pub async fn update_user(&self, user_id: UserId, input: UserUpdate) -> AppResult<()> {
        let name = NonEmptyString::new(input.name)?;
        let email = EmailAddress::new(input.email)?;
        let phone = NonEmptyString::new(input.phone)?;

        self.repository
            .update(
                user_id,
                UserUpdate {
                    name: name.into(),
                    email: email.into(),
                    phone: phone.into(),
                },
            )
            .await
    }

    /// Soft-deletes a user.
    pub async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.repository.soft_delete(user_id).await
    }

    /// Lists live users, newest first.
    pub async fn list_users(&self, limit: i64, offset: i64) -> AppResult<Vec<User>> {
        self.repository.list(limit, offset).await
    }

    /// Loads a user together with the live roles bound to it.
    pub async fn user_with_roles(&self, user_id: UserId) -> AppResult<UserWithRoles> {
        let user = self.repository.find_by_id(user_id).await?;
        let roles = self.authorization_repository.roles_for_user(user_id).await?;

        Ok(UserWithRoles { user, roles })
    }
}
