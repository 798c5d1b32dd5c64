use std::sync::Arc;

use async_trait::async_trait;
use staybook_core::{AppError, AppResult};
use staybook_domain::{Role, RoleId, UserId};

/// Repository port for membership facts and permission resolution.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Inserts a membership fact binding the user to the role.
    ///
    /// Idempotent: re-asserting an existing pair succeeds without creating a
    /// duplicate. Referencing a missing user or role surfaces as
    /// [`AppError::ReferenceNotFound`].
    async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Deletes a membership fact.
    ///
    /// Fails with [`AppError::NotFound`] when the pair does not exist, so
    /// callers can distinguish "nothing to remove" from "removed". The error
    /// is scoped to the membership pair, not to the user or role rows.
    async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Lists every live role bound to the user, excluding soft-deleted
    /// roles. An empty set is a valid answer, not an error.
    async fn roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>>;

    /// Resolves whether a live membership binds the user to a live role
    /// that is granted the live permission with this exact name.
    async fn has_permission(&self, user_id: UserId, permission_name: &str) -> AppResult<bool>;
}

/// Application service answering authorization questions for route handlers.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Binds the role to the user. Safe to call for an already-held role.
    pub async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.repository.assign_role(user_id, role_id).await
    }

    /// Removes the role from the user.
    pub async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.repository.remove_role(user_id, role_id).await
    }

    /// Returns the live roles currently bound to the user.
    pub async fn roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        self.repository.roles_for_user(user_id).await
    }

    /// Returns whether the user currently holds the named permission.
    pub async fn has_permission(
        &self,
        user_id: UserId,
        permission_name: &str,
    ) -> AppResult<bool> {
        self.repository.has_permission(user_id, permission_name).await
    }

    /// Ensures the user holds the named permission.
    pub async fn require_permission(
        &self,
        user_id: UserId,
        permission_name: &str,
    ) -> AppResult<()> {
        if self.has_permission(user_id, permission_name).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "user '{user_id}' is missing permission '{permission_name}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use staybook_core::{AppError, AppResult};
    use staybook_domain::{Role, RoleId, UserId};
    use tokio::sync::Mutex;

    use super::{AuthorizationRepository, AuthorizationService};

    /// In-memory model of the store: adjacency sets plus tombstones, so the
    /// soft-delete filtering contract can be exercised without a database.
    #[derive(Default)]
    struct FakeAuthorizationRepository {
        state: Mutex<FakeState>,
    }

    #[derive(Default)]
    struct FakeState {
        memberships: BTreeSet<(UserId, RoleId)>,
        roles: HashMap<RoleId, Role>,
        grants: BTreeSet<(RoleId, String)>,
        deleted_users: BTreeSet<UserId>,
        deleted_permissions: BTreeSet<String>,
    }

    #[async_trait]
    impl AuthorizationRepository for FakeAuthorizationRepository {
        async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
            self.state.lock().await.memberships.insert((user_id, role_id));
            Ok(())
        }

        async fn remove_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
            if self.state.lock().await.memberships.remove(&(user_id, role_id)) {
                Ok(())
            } else {
                Err(AppError::NotFound(format!(
                    "role assignment '{user_id}:{role_id}' was not found"
                )))
            }
        }

        async fn roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>> {
            let state = self.state.lock().await;
            Ok(state
                .memberships
                .iter()
                .filter(|(member, _)| *member == user_id)
                .filter_map(|(_, role_id)| state.roles.get(role_id))
                .filter(|role| !role.is_deleted())
                .cloned()
                .collect())
        }

        async fn has_permission(
            &self,
            user_id: UserId,
            permission_name: &str,
        ) -> AppResult<bool> {
            let state = self.state.lock().await;
            if state.deleted_users.contains(&user_id)
                || state.deleted_permissions.contains(permission_name)
            {
                return Ok(false);
            }

            Ok(state.memberships.iter().any(|(member, role_id)| {
                *member == user_id
                    && state.roles.get(role_id).is_some_and(|role| !role.is_deleted())
                    && state
                        .grants
                        .contains(&(*role_id, permission_name.to_owned()))
            }))
        }
    }

    fn role(id: i64, name: &str) -> Role {
        Role {
            id: RoleId::from_i64(id),
            name: name.to_owned(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    async fn seed_role(repository: &FakeAuthorizationRepository, id: i64, name: &str) {
        let mut state = repository.state.lock().await;
        state.roles.insert(RoleId::from_i64(id), role(id, name));
    }

    async fn seed_grant(repository: &FakeAuthorizationRepository, role_id: i64, name: &str) {
        let mut state = repository.state.lock().await;
        state.grants.insert((RoleId::from_i64(role_id), name.to_owned()));
    }

    #[tokio::test]
    async fn assigning_twice_keeps_a_single_membership() {
        let repository = Arc::new(FakeAuthorizationRepository::default());
        seed_role(&repository, 10, "listings-admin").await;
        let service = AuthorizationService::new(repository);

        let user = UserId::from_i64(1);
        let role = RoleId::from_i64(10);
        assert!(service.assign_role(user, role).await.is_ok());
        assert!(service.assign_role(user, role).await.is_ok());

        let roles = service.roles_for_user(user).await;
        assert!(roles.is_ok());
        assert_eq!(roles.unwrap_or_default().len(), 1);
    }

    #[tokio::test]
    async fn removing_an_absent_membership_reports_not_found() {
        let service = AuthorizationService::new(Arc::new(FakeAuthorizationRepository::default()));

        let result = service
            .remove_role(UserId::from_i64(1), RoleId::from_i64(10))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn removal_undoes_assignment() {
        let repository = Arc::new(FakeAuthorizationRepository::default());
        seed_role(&repository, 10, "listings-admin").await;
        let service = AuthorizationService::new(repository);

        let user = UserId::from_i64(1);
        let role = RoleId::from_i64(10);
        assert!(service.assign_role(user, role).await.is_ok());
        assert!(service.remove_role(user, role).await.is_ok());

        let roles = service.roles_for_user(user).await;
        assert!(roles.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn permission_resolves_only_through_a_live_path() {
        let repository = Arc::new(FakeAuthorizationRepository::default());
        seed_role(&repository, 10, "listings-admin").await;
        seed_grant(&repository, 10, "listings.delete").await;
        let service = AuthorizationService::new(repository.clone());

        let user = UserId::from_i64(1);
        assert_eq!(service.has_permission(user, "listings.delete").await.ok(), Some(false));

        assert!(service.assign_role(user, RoleId::from_i64(10)).await.is_ok());
        assert_eq!(service.has_permission(user, "listings.delete").await.ok(), Some(true));

        {
            let mut state = repository.state.lock().await;
            if let Some(role) = state.roles.get_mut(&RoleId::from_i64(10)) {
                role.deleted_at = Some(Utc::now());
            }
        }

        assert_eq!(service.has_permission(user, "listings.delete").await.ok(), Some(false));
        let roles = service.roles_for_user(user).await;
        assert!(roles.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn permission_names_match_case_sensitively() {
        let repository = Arc::new(FakeAuthorizationRepository::default());
        seed_role(&repository, 10, "listings-admin").await;
        seed_grant(&repository, 10, "listings.delete").await;
        let service = AuthorizationService::new(repository);

        let user = UserId::from_i64(1);
        assert!(service.assign_role(user, RoleId::from_i64(10)).await.is_ok());

        assert_eq!(service.has_permission(user, "listings.delete").await.ok(), Some(true));
        assert_eq!(service.has_permission(user, "Listings.Delete").await.ok(), Some(false));
    }

    #[tokio::test]
    async fn soft_deleted_user_resolves_no_permissions() {
        let repository = Arc::new(FakeAuthorizationRepository::default());
        seed_role(&repository, 10, "listings-admin").await;
        seed_grant(&repository, 10, "listings.delete").await;
        let service = AuthorizationService::new(repository.clone());

        let user = UserId::from_i64(1);
        assert!(service.assign_role(user, RoleId::from_i64(10)).await.is_ok());

        repository.state.lock().await.deleted_users.insert(user);
        assert_eq!(service.has_permission(user, "listings.delete").await.ok(), Some(false));
    }

    #[tokio::test]
    async fn soft_deleted_permission_stops_resolving() {
        let repository = Arc::new(FakeAuthorizationRepository::default());
        seed_role(&repository, 10, "listings-admin").await;
        seed_grant(&repository, 10, "listings.delete").await;
        let service = AuthorizationService::new(repository.clone());

        let user = UserId::from_i64(1);
        assert!(service.assign_role(user, RoleId::from_i64(10)).await.is_ok());

        repository
            .state
            .lock()
            .await
            .deleted_permissions
            .insert("listings.delete".to_owned());
        assert_eq!(service.has_permission(user, "listings.delete").await.ok(), Some(false));
    }

    #[tokio::test]
    async fn require_permission_denies_missing_grant() {
        let service = AuthorizationService::new(Arc::new(FakeAuthorizationRepository::default()));

        let result = service
            .require_permission(UserId::from_i64(1), "listings.delete")
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
