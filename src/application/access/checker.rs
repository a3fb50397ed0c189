//! Permission check behind every guarded route.
//!
//! A user is granted `permission` when they are active and either their
//! role or one of their direct grants names it. Any failure along the way
//! (missing claim, unknown user, storage error) is a denial.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::permission::PermissionStore;
use crate::domain::DomainResult;

#[derive(Clone)]
pub struct PermissionChecker {
    store: Arc<dyn PermissionStore>,
}

impl PermissionChecker {
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    /// `user_id` is the subject claim of the caller's token, if any.
    pub async fn check(&self, user_id: Option<&str>, permission: &str) -> bool {
        let Some(user_id) = user_id
            .map(str::trim)
            .filter(|id| uuid::Uuid::parse_str(id).is_ok())
        else {
            debug!(permission, "Denied: no usable user id claim");
            return false;
        };

        match self.decide(user_id, permission).await {
            Ok(true) => true,
            Ok(false) => {
                debug!(user_id, permission, "Denied: permission not granted");
                false
            }
            Err(e) => {
                warn!(user_id, permission, error = %e, "Permission lookup failed, denying");
                false
            }
        }
    }

    async fn decide(&self, user_id: &str, permission: &str) -> DomainResult<bool> {
        let Some(user) = self.store.find_user(user_id).await? else {
            return Ok(false);
        };
        if !user.is_active {
            return Ok(false);
        }

        if let Some(role_id) = user.role_id.as_deref() {
            if self.store.role_grants(role_id, permission).await? {
                return Ok(true);
            }
        }

        self.store.user_grants(&user.id, permission).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::domain::{DomainError, User};

    const ROLE_ID: &str = "role-cashier";

    #[derive(Default)]
    struct FakeStore {
        users: Vec<User>,
        role_grants: HashSet<(String, String)>,
        user_grants: HashSet<(String, String)>,
        failing: bool,
        calls: AtomicUsize,
    }

    impl FakeStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) -> DomainResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                Err(DomainError::Storage("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl PermissionStore for FakeStore {
        async fn find_user(&self, user_id: &str) -> DomainResult<Option<User>> {
            self.hit()?;
            Ok(self.users.iter().find(|u| u.id == user_id).cloned())
        }

        async fn role_grants(&self, role_id: &str, permission: &str) -> DomainResult<bool> {
            self.hit()?;
            Ok(self
                .role_grants
                .contains(&(role_id.to_string(), permission.to_string())))
        }

        async fn user_grants(&self, user_id: &str, permission: &str) -> DomainResult<bool> {
            self.hit()?;
            Ok(self
                .user_grants
                .contains(&(user_id.to_string(), permission.to_string())))
        }
    }

    fn user(role: Option<&str>) -> User {
        User::new("alice", "alice@example.com", "Alice", "hash", role.map(String::from))
    }

    fn checker_with(store: FakeStore) -> (PermissionChecker, Arc<FakeStore>) {
        let store = Arc::new(store);
        (PermissionChecker::new(store.clone()), store)
    }

    #[tokio::test]
    async fn missing_claim_is_denied_without_lookup() {
        let (checker, store) = checker_with(FakeStore::default());
        assert!(!checker.check(None, "ticket.view").await);
        assert!(!checker.check(Some(""), "ticket.view").await);
        assert!(!checker.check(Some("   "), "ticket.view").await);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_claim_is_denied_without_lookup() {
        let (checker, store) = checker_with(FakeStore::default());
        assert!(!checker.check(Some("not-a-uuid"), "ticket.view").await);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn role_grant_allows() {
        let u = user(Some(ROLE_ID));
        let id = u.id.clone();
        let mut store = FakeStore::default();
        store.users.push(u);
        store
            .role_grants
            .insert((ROLE_ID.into(), "ticket.view".into()));
        let (checker, _) = checker_with(store);

        assert!(checker.check(Some(&id), "ticket.view").await);
        assert!(!checker.check(Some(&id), "ticket.delete").await);
    }

    #[tokio::test]
    async fn direct_grant_allows_without_role() {
        let u = user(None);
        let id = u.id.clone();
        let mut store = FakeStore::default();
        store.user_grants.insert((id.clone(), "card.view".into()));
        store.users.push(u);
        let (checker, _) = checker_with(store);

        assert!(checker.check(Some(&id), "card.view").await);
        assert!(!checker.check(Some(&id), "card.update").await);
    }

    #[tokio::test]
    async fn unknown_user_is_denied() {
        let (checker, _) = checker_with(FakeStore::default());
        let id = uuid::Uuid::new_v4().to_string();
        assert!(!checker.check(Some(&id), "ticket.view").await);
    }

    #[tokio::test]
    async fn inactive_user_is_denied() {
        let mut u = user(Some(ROLE_ID));
        u.is_active = false;
        let id = u.id.clone();
        let mut store = FakeStore::default();
        store
            .role_grants
            .insert((ROLE_ID.into(), "ticket.view".into()));
        store.users.push(u);
        let (checker, _) = checker_with(store);

        assert!(!checker.check(Some(&id), "ticket.view").await);
    }

    #[tokio::test]
    async fn storage_failure_is_denied() {
        let u = user(Some(ROLE_ID));
        let id = u.id.clone();
        let mut store = FakeStore::default();
        store.users.push(u);
        store.failing = true;
        let (checker, store) = checker_with(store);

        assert!(!checker.check(Some(&id), "ticket.view").await);
        assert_eq!(store.calls(), 1);
    }
}
