//! MCP capabilities backed by the STAPI adapter
//!
//! Maps `resources/*` and `tools/*` requests onto character lookups and searches.

pub mod resources;
pub mod tools;
