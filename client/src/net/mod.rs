//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles authenticated REST calls and `types` defines the wire schema.

pub mod api;
pub mod types;
