// Business domains
pub mod agent_builder;
pub mod auth;
pub mod mcp_catalog;
pub mod scope;
