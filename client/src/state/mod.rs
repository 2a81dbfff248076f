//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `jobs`) so pages depend on small
//! focused models.

pub mod jobs;
pub mod session;
