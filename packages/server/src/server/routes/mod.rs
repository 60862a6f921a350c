// HTTP routes
pub mod agent_builders;
pub mod assets;
pub mod error;
pub mod health;
pub mod mcp_catalogs;

pub use error::ApiError;
pub use health::*;
