//! MCP catalog domain - registered tool servers agents can call.

pub mod actions;

pub use actions::{
    cascade_already_applied, create_mcp_catalog, delete_mcp_catalog, CreatedMcpCatalog,
    DeletedMcpCatalog, CASCADE_SERVING_DELETE_MARKER,
};
