//! STAPI (Star Trek API) adapter
//!
//! Fetches character data over HTTP, validates it against declared shapes and
//! renders it for MCP clients.

pub mod character;
pub mod client;
pub mod format;
pub mod schema;
pub mod search;
