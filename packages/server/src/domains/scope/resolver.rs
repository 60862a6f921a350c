//! Pushes scope to the Policy Engine and reads it back for display.

use std::sync::Arc;

use sktai_client::Policy;
use tracing::{debug, info, warn};

use super::models::{resolve_scope, ProjectAsset, Scope};
use super::stores::ProjectAssetStore;
use crate::common::{Actor, DomainError, RecoverableError};
use crate::kernel::BasePolicyEngine;

pub struct ScopeResolver {
    policy: Arc<dyn BasePolicyEngine>,
    assets: Arc<dyn ProjectAssetStore>,
}

impl ScopeResolver {
    pub fn new(policy: Arc<dyn BasePolicyEngine>, assets: Arc<dyn ProjectAssetStore>) -> Self {
        Self { policy, assets }
    }

    /// Push the actor's project policy for a freshly created (or re-saved) resource.
    ///
    /// The pushed policy restricts the resource to the actor's project, so a
    /// success means the enforced scope is `Private`. A failure is returned as
    /// recoverable: the resource stays and reads as the default scope.
    pub async fn set_scope(&self, resource_url: &str, actor: &Actor) -> Result<Scope, RecoverableError> {
        self.push(resource_url, actor)
            .await
            .map_err(|e| RecoverableError::ScopeNotApplied {
                resource_url: resource_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Same push as [`ScopeResolver::set_scope`] for callers that asked for it
    /// explicitly; a failure ends the operation.
    pub async fn apply_scope(&self, resource_url: &str, actor: &Actor) -> Result<Scope, DomainError> {
        self.push(resource_url, actor)
            .await
            .map_err(|e| DomainError::upstream("policy update", e))
    }

    // Member-scoped when the actor carries a project assignment, otherwise
    // the group carried by the actor's own token.
    async fn push(&self, resource_url: &str, actor: &Actor) -> sktai_client::Result<Scope> {
        if actor.has_project_assignment() {
            self.policy
                .set_policy_by_member(resource_url, &actor.member_id, &actor.project_name)
                .await?;
        } else {
            self.policy
                .set_policy_by_current_group(resource_url, &actor.access_token)
                .await?;
        }
        info!(
            resource_url,
            member_id = %actor.member_id,
            project = %actor.project_name,
            "Resource policy applied"
        );
        Ok(Scope::Private)
    }

    /// Displayed scope for one resource. Never fails: a lookup error reads as the default.
    pub async fn get_scope(&self, resource_url: &str) -> Scope {
        match self.assets.find_by_url(resource_url).await {
            Ok(row) => resolve_scope(row.as_ref()),
            Err(e) => {
                warn!(resource_url, error = %e, "Scope lookup failed, using default");
                Scope::DEFAULT
            }
        }
    }

    /// Active policies for a resource, excluding role-based ones.
    pub async fn get_policy(&self, resource_url: &str) -> Result<Vec<Policy>, DomainError> {
        let policies = self
            .policy
            .get_policy(resource_url)
            .await
            .map_err(|e| DomainError::upstream("policy read", e))?;
        let total = policies.len();
        let kept = without_role_policies(policies);
        debug!(resource_url, total, kept = kept.len(), "Policies read back");
        Ok(kept)
    }

    /// Move a resource between projects: enforce first, then record for display.
    ///
    /// The table row is only written once the Policy Engine accepted the push,
    /// so display never claims a scope that is not enforced.
    pub async fn move_asset(
        &self,
        resource_url: &str,
        owning_project_seq: i64,
        sharing_project_seq: i64,
        actor: &Actor,
    ) -> Result<ProjectAsset, DomainError> {
        if resource_url.trim().is_empty() {
            return Err(DomainError::invalid("asset_url is required"));
        }
        if owning_project_seq <= 0 {
            return Err(DomainError::invalid("owning_project_seq must be positive"));
        }
        if sharing_project_seq == 0 {
            return Err(DomainError::invalid(
                "sharing_project_seq must be a project seq or negative for public",
            ));
        }

        if !actor.has_project_assignment() {
            return Err(DomainError::invalid("actor has no project assignment"));
        }
        self.policy
            .set_policy_by_member(resource_url, &actor.member_id, &actor.project_name)
            .await
            .map_err(|e| DomainError::upstream("policy update", e))?;

        let asset = self
            .assets
            .upsert(resource_url, owning_project_seq, sharing_project_seq)
            .await?;
        info!(
            resource_url,
            owning_project_seq,
            sharing_project_seq,
            scope = %resolve_scope(Some(&asset)),
            "Asset moved"
        );
        Ok(asset)
    }

    /// Drop the scope row of a deleted resource.
    pub async fn forget_asset(&self, resource_url: &str) -> anyhow::Result<bool> {
        self.assets.delete_by_url(resource_url).await
    }
}

/// Keep only policies that have no role-typed item; RBAC is managed elsewhere.
pub fn without_role_policies(policies: Vec<Policy>) -> Vec<Policy> {
    policies
        .into_iter()
        .filter(|policy| !policy.policies.iter().any(|item| item.is_role()))
        .collect()
}
