//! # Graphics Module
//!
//! Everything graphics-related in Tartan: the backend capability trait, the
//! transform and draw-scope plumbing, the drawable variants, and the scene
//! orchestrator with its draw and pick passes.
//!
//! ## Architecture Overview
//!
//! - **Backend** ([`backend`]) - the immediate-mode capability the scene
//!   graph consumes, plus the headless trace implementation
//! - **Transform & Scope** ([`transform`], [`draw_scope`]) - per-object
//!   placement and balanced matrix-stack discipline
//! - **Drawables** ([`drawable`], [`objects`]) - the polymorphic draw/pick
//!   capability and its concrete variants
//! - **Scene** ([`scene`]) - ordered multi-category draw pass orchestration
//! - **Picking** ([`picking`]) - selection-buffer hit testing
//!
//! The whole pipeline is single threaded and synchronous: a frame or pick
//! pass runs to completion on the calling thread, and a drawable must never
//! re-enter `draw` or `hit_test` on the same scene while a pass is running.

pub mod backend;
pub mod draw_scope;
pub mod drawable;
pub mod objects;
pub mod picking;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use backend::{RenderBackend, TraceBackend};
pub use drawable::{Drawable, PickPart};
pub use scene::Scene;
pub use transform::{Transform, TransformOrder};
