pub mod project_asset;
pub mod scope;

pub use project_asset::{asset_url, AssetKind, ProjectAsset, PUBLIC_SHARING_SEQ};
pub use scope::{resolve_scope, Scope};
