use crate::{
    abstract_trait::{DynPermissionCache, DynRoleApiClient, DynSessionSource, SessionSourceTrait},
    domain::{PermissionSet, Requirement, SessionUser},
};
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, error, info, warn};

/// Outcome of one permission check, shaped for UI consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
    pub is_allowed: bool,
    pub is_loading: bool,
    pub user_permissions: Vec<String>,
}

/// Resolved session and permissions for the current caller.
#[derive(Debug, Clone, Default)]
pub struct AccessSnapshot {
    user: Option<SessionUser>,
    permissions: PermissionSet,
    bypass: bool,
}

impl AccessSnapshot {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user: SessionUser, permissions: PermissionSet) -> Self {
        Self {
            user: Some(user),
            permissions,
            bypass: false,
        }
    }

    pub fn for_permissions(permissions: PermissionSet) -> Self {
        Self {
            user: None,
            permissions,
            bypass: false,
        }
    }

    #[cfg(any(test, feature = "test-mode"))]
    pub fn bypass() -> Self {
        Self {
            user: None,
            permissions: PermissionSet::new(),
            bypass: true,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn is_super_admin(&self) -> bool {
        self.user.as_ref().is_some_and(SessionUser::is_super_admin)
    }

    pub fn is_allowed(&self, requirement: &Requirement) -> bool {
        self.bypass
            || requirement.is_none()
            || self.is_super_admin()
            || requirement.satisfied_by(&self.permissions)
    }

    pub fn access(&self, requirement: &Requirement) -> Access {
        Access {
            is_allowed: self.is_allowed(requirement),
            is_loading: false,
            user_permissions: self.permissions.to_strings(),
        }
    }
}

pub struct PermissionResolver {
    role_client: DynRoleApiClient,
    cache: DynPermissionCache,
    cache_ttl: Duration,
    bypass: bool,
}

impl PermissionResolver {
    pub fn new(role_client: DynRoleApiClient, cache: DynPermissionCache, cache_ttl: Duration) -> Self {
        Self {
            role_client,
            cache,
            cache_ttl,
            bypass: false,
        }
    }

    /// Every check passes. Only compiled into test builds.
    #[cfg(any(test, feature = "test-mode"))]
    pub fn with_test_bypass(mut self) -> Self {
        warn!("Permission checks are bypassed (test mode)");
        self.bypass = true;
        self
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypass
    }

    fn cache_key(role_id: i64) -> String {
        format!("permissions:role:{role_id}")
    }

    /// Never fails: every error resolves to a caller with no permissions.
    pub async fn resolve(&self, source: &(dyn SessionSourceTrait + Send + Sync)) -> AccessSnapshot {
        #[cfg(any(test, feature = "test-mode"))]
        if self.bypass {
            return AccessSnapshot::bypass();
        }

        let user = match source.current_session().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                debug!("No active session");
                return AccessSnapshot::anonymous();
            }
            Err(e) => {
                error!("Failed to load session: {e}");
                return AccessSnapshot::anonymous();
            }
        };

        let permissions = match user.permissions.as_deref() {
            Some(embedded) => PermissionSet::from_strings(embedded),
            None => {
                self.role_permissions(user.role_id, source.credentials().as_deref())
                    .await
            }
        };

        debug!(
            "Resolved {} permissions for user {} ({})",
            permissions.len(),
            user.user_id,
            user.role
        );

        AccessSnapshot::for_user(user, permissions)
    }

    async fn role_permissions(&self, role_id: i64, credentials: Option<&str>) -> PermissionSet {
        let key = Self::cache_key(role_id);

        if let Some(cached) = self.cache.get_permissions(&key).await {
            debug!("Permission cache hit for role {role_id}");
            return PermissionSet::from_strings(cached);
        }

        match self.role_client.find_permissions(role_id, credentials).await {
            Ok(records) => {
                let permissions = PermissionSet::from_records(&records);
                self.cache
                    .set_permissions(&key, &permissions.to_strings(), self.cache_ttl)
                    .await;
                permissions
            }
            Err(e) => {
                error!("Failed to fetch permissions for role {role_id}: {e}");
                PermissionSet::new()
            }
        }
    }

    pub async fn invalidate_role(&self, role_id: i64) {
        if self.cache.delete_permissions(&Self::cache_key(role_id)).await {
            info!("Invalidated cached permissions for role {role_id}");
        }
    }
}

#[derive(Debug, Clone)]
pub enum ScopeState {
    Loading,
    Ready(AccessSnapshot),
}

/// A mounted permission consumer.
///
/// Resolution runs in the background; dropping the scope aborts it, so a
/// result that arrives after the consumer went away is discarded.
pub struct PermissionScope {
    rx: watch::Receiver<ScopeState>,
    task: Option<JoinHandle<()>>,
}

impl PermissionScope {
    pub fn mount(resolver: Arc<PermissionResolver>, source: DynSessionSource) -> Self {
        #[cfg(any(test, feature = "test-mode"))]
        if resolver.is_bypassed() {
            let (_tx, rx) = watch::channel(ScopeState::Ready(AccessSnapshot::bypass()));
            return Self { rx, task: None };
        }

        let (tx, rx) = watch::channel(ScopeState::Loading);
        let task = tokio::spawn(async move {
            let snapshot = resolver.resolve(source.as_ref()).await;
            if tx.send(ScopeState::Ready(snapshot)).is_err() {
                debug!("Permission scope closed before resolution finished");
            }
        });

        Self {
            rx,
            task: Some(task),
        }
    }

    pub fn state(&self) -> ScopeState {
        self.rx.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.rx.borrow(), ScopeState::Loading)
    }

    pub fn access(&self, requirement: &Requirement) -> Access {
        match &*self.rx.borrow() {
            ScopeState::Loading => Access {
                is_allowed: false,
                is_loading: true,
                user_permissions: Vec::new(),
            },
            ScopeState::Ready(snapshot) => snapshot.access(requirement),
        }
    }

    /// Waits for resolution. A resolution task that died resolves to an
    /// anonymous snapshot.
    pub async fn ready(&mut self) -> AccessSnapshot {
        match self
            .rx
            .wait_for(|state| matches!(state, ScopeState::Ready(_)))
            .await
        {
            Ok(state) => match &*state {
                ScopeState::Ready(snapshot) => snapshot.clone(),
                ScopeState::Loading => AccessSnapshot::anonymous(),
            },
            Err(_) => {
                warn!("Permission resolution ended without a result");
                AccessSnapshot::anonymous()
            }
        }
    }
}

impl Drop for PermissionScope {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
