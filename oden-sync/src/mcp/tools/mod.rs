//! MCP tools, one submodule per tool category

pub mod github;
