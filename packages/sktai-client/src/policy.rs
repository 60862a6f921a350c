//! Authorization Policy Engine endpoints.

use reqwest::Method;

use crate::error::Result;
use crate::types::{GroupPolicyRequest, MemberPolicyRequest, Policy};
use crate::SktaiClient;

const POLICY_PATH: &str = "/api/v1/auth/resource/policy";

impl SktaiClient {
    /// Attach a policy derived from the calling user's current group.
    ///
    /// The group is read from `user_token`, so this call is made as the user.
    pub async fn set_resource_policy_by_current_group(
        &self,
        resource_url: &str,
        user_token: &str,
    ) -> Result<()> {
        let path = format!("{}/group", POLICY_PATH);
        let body = GroupPolicyRequest {
            resource_url: resource_url.to_string(),
        };
        Self::send_empty(self.request_as(Method::POST, &path, user_token).json(&body)).await
    }

    pub async fn set_resource_policy_by_member(
        &self,
        resource_url: &str,
        member_id: &str,
        project_name: &str,
    ) -> Result<()> {
        let path = format!("{}/member", POLICY_PATH);
        let body = MemberPolicyRequest {
            resource_url: resource_url.to_string(),
            member_id: member_id.to_string(),
            project_name: project_name.to_string(),
        };
        Self::send_empty(self.request(Method::POST, &path).json(&body)).await
    }

    pub async fn get_policy(&self, resource_url: &str) -> Result<Vec<Policy>> {
        let builder = self
            .request(Method::GET, POLICY_PATH)
            .query(&[("resource_url", resource_url)]);
        Self::send_json(builder).await
    }
}
