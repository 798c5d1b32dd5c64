//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use staybook_application::{NewUser, UserRepository, UserUpdate};
use staybook_core::{AppError, AppResult};
use staybook_domain::{User, UserId};

use crate::store_error::map_store_error;

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    phone: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_i64(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, name, email, phone, password_hash, created_at, updated_at, deleted_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            format!(
                r#"
                INSERT INTO users (name, email, phone, password_hash)
                VALUES ($1, $2, $3, $4)
                RETURNING {USER_COLUMNS}
                "#
            )
            .as_str(),
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.phone)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "create user"))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            format!(
                r#"
                SELECT {USER_COLUMNS}
                FROM users
                WHERE id = $1 AND deleted_at IS NULL
                "#
            )
            .as_str(),
        )
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "load user by id"))?;

        row.map(User::from)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            format!(
                r#"
                SELECT {USER_COLUMNS}
                FROM users
                WHERE email = $1 AND deleted_at IS NULL
                "#
            )
            .as_str(),
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "load user by email"))?;

        row.map(User::from)
            .ok_or_else(|| AppError::NotFound(format!("user with email '{email}' was not found")))
    }

    async fn find_by_phone(&self, phone: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            format!(
                r#"
                SELECT {USER_COLUMNS}
                FROM users
                WHERE phone = $1 AND deleted_at IS NULL
                "#
            )
            .as_str(),
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "load user by phone"))?;

        row.map(User::from)
            .ok_or_else(|| AppError::NotFound(format!("user with phone '{phone}' was not found")))
    }

    async fn update(&self, user_id: UserId, update: UserUpdate) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2, phone = $3, updated_at = NOW()
            WHERE id = $4 AND deleted_at IS NULL
            "#,
        )
        .bind(update.name)
        .bind(update.email)
        .bind(update.phone)
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "update user"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        }

        Ok(())
    }

    async fn soft_delete(&self, user_id: UserId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "delete user"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' was not found")));
        }

        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            format!(
                r#"
                SELECT {USER_COLUMNS}
                FROM users
                WHERE deleted_at IS NULL
                ORDER BY created_at DESC
                LIMIT $1 OFFSET $2
                "#
            )
            .as_str(),
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "list users"))?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
