//! # Scene Management
//!
//! The [`Scene`] is the orchestrator of the retained layer: it owns one
//! ordered collection per object category, the active camera selection and
//! the design-mode flag, and drives the per-frame draw pass and (through
//! [`crate::gfx::picking`]) the hit-test pass.

pub mod scene;

pub use scene::{Category, ObjectHandle, Scene};
