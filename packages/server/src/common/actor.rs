//! The authenticated caller, as seen by domain operations.

/// Who is acting, and from which project.
///
/// Built from the verified access token by the auth middleware. The raw
/// token is kept because some platform calls (group-derived policies) must be
/// made as the user.
#[derive(Debug, Clone)]
pub struct Actor {
    pub member_id: String,
    /// Home project id; lineage only records prompts owned by this project.
    pub project_id: String,
    pub project_name: String,
    pub project_seq: i64,
    pub access_token: String,
}

impl Actor {
    /// Whether member/project details are complete enough for a member-scoped policy.
    pub fn has_project_assignment(&self) -> bool {
        !self.member_id.trim().is_empty() && !self.project_name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(member_id: &str, project_name: &str) -> Actor {
        Actor {
            member_id: member_id.into(),
            project_id: "p-1".into(),
            project_name: project_name.into(),
            project_seq: 1,
            access_token: "token".into(),
        }
    }

    #[test]
    fn test_project_assignment_requires_member_and_project() {
        assert!(actor("m-1", "alpha").has_project_assignment());
        assert!(!actor("m-1", "  ").has_project_assignment());
        assert!(!actor("", "alpha").has_project_assignment());
    }
}
