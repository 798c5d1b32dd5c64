//! PostgreSQL-backed authorization store.
//!
//! Membership facts live in `user_roles`; permission checks traverse the
//! one-hop join chain user -> user_roles -> roles -> role_permissions ->
//! permissions with soft-delete filtering applied at every hop.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use staybook_application::AuthorizationRepository;
use staybook_core::{AppError, AppResult};
use staybook_domain::{Role, RoleId, UserId};

use crate::store_error::map_store_error;

/// PostgreSQL implementation of the authorization repository port.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            id: RoleId::from_i64(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        // The conditional insert absorbs re-assertion of an existing pair;
        // a foreign-key violation still surfaces as ReferenceNotFound.
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "assign role"))?;

        Ok(())
    }

    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1 AND role_id = $2
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "remove role assignment"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "role assignment '{user_id}:{role_id}' was not found"
            )));
        }

        Ok(())
    }

    async fn roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id,
                roles.name,
                roles.description,
                roles.created_at,
                roles.updated_at,
                roles.deleted_at
            FROM roles
            INNER JOIN user_roles
                ON user_roles.role_id = roles.id
            WHERE user_roles.user_id = $1
                AND roles.deleted_at IS NULL
            ORDER BY roles.name
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "list roles for user"))?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    async fn has_permission(&self, user_id: UserId, permission_name: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM users
                INNER JOIN user_roles
                    ON user_roles.user_id = users.id
                INNER JOIN roles
                    ON roles.id = user_roles.role_id
                INNER JOIN role_permissions
                    ON role_permissions.role_id = roles.id
                INNER JOIN permissions
                    ON permissions.id = role_permissions.permission_id
                WHERE users.id = $1
                    AND users.deleted_at IS NULL
                    AND roles.deleted_at IS NULL
                    AND permissions.name = $2
                    AND permissions.deleted_at IS NULL
            )
            "#,
        )
        .bind(user_id.as_i64())
        .bind(permission_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_store_error(error, "resolve permission"))
    }
}
