//! Scope domain - which projects can see a platform resource
//!
//! Two systems hold scope and neither owns the other:
//! - the local `project_assets` table, read for display ("public" / "shared")
//! - the remote Policy Engine, which enforces access per resource URL
//!
//! `ScopeResolver` writes to the Policy Engine and reads the table. The
//! missing-row-means-public rule lives in `models::scope::resolve_scope`.

pub mod models;
pub mod resolver;
pub mod stores;

pub use models::{asset_url, resolve_scope, AssetKind, ProjectAsset, Scope, PUBLIC_SHARING_SEQ};
pub use resolver::{without_role_policies, ScopeResolver};
pub use stores::{MemoryProjectAssetStore, PostgresProjectAssetStore, ProjectAssetStore};
