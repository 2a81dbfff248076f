//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render page chrome and read the session from Leptos context.

pub mod navbar;
pub mod storage_debug;
