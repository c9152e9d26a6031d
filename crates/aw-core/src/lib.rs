//! aw-core: Shared types for the AudioWorks middleware facade
//!
//! This crate provides the handle types, enumerations, and error taxonomy
//! used by both the studio runtime and the host-facing engine.

mod attributes;
mod error;
mod format;
mod ids;

pub use attributes::*;
pub use error::*;
pub use format::*;
pub use ids::*;
