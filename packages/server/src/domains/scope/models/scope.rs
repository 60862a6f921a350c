use serde::{Deserialize, Serialize};
use std::fmt;

use super::project_asset::ProjectAsset;

/// Visibility tier of a resource across projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Only the owning project
    Private,
    /// Owning project plus the sharing project
    Shared,
    /// Every project
    Public,
}

impl Scope {
    /// Scope of a resource with no scope-table row.
    pub const DEFAULT: Scope = Scope::Public;

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Private => "private",
            Scope::Shared => "shared",
            Scope::Public => "public",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Displayed scope for a scope-table lookup result.
///
/// No row and a negative sharing seq both read as public; any other row is shared.
pub fn resolve_scope(row: Option<&ProjectAsset>) -> Scope {
    match row {
        None => Scope::DEFAULT,
        Some(asset) if asset.sharing_project_seq < 0 => Scope::Public,
        Some(_) => Scope::Shared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(sharing: i64) -> ProjectAsset {
        ProjectAsset {
            asset_url: "/api/v1/agent/agents/graphs/g-1".into(),
            owning_project_seq: 3,
            sharing_project_seq: sharing,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_row_is_public() {
        assert_eq!(resolve_scope(None), Scope::Public);
    }

    #[test]
    fn test_negative_sharing_is_public() {
        assert_eq!(resolve_scope(Some(&row(-1))), Scope::Public);
    }

    #[test]
    fn test_positive_sharing_is_shared() {
        assert_eq!(resolve_scope(Some(&row(7))), Scope::Shared);
    }

    #[test]
    fn test_scope_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Scope::Shared).unwrap(), "shared");
        assert_eq!(Scope::Public.to_string(), "public");
    }
}
