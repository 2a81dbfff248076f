//! Services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own outbound calls so route handlers can stay focused on
//! protocol translation and response shaping.

pub mod forward;
