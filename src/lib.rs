// src/lib.rs
//! Tartan Scene Graph
//!
//! A retained-mode 3D scene graph layered over an immediate-mode graphics
//! backend. Callers assemble polygons, quadrics, lights, cameras and custom
//! drawables into a [`Scene`](gfx::Scene); each frame the scene translates
//! that hierarchy into the correct sequence of backend calls, preserving
//! transform composition order and matrix-stack balance, and answers
//! screen-point hit tests through selection-buffer picking.
//!
//! The backend itself is an external collaborator: anything implementing
//! [`RenderBackend`](gfx::RenderBackend) can drive a scene. The bundled
//! [`TraceBackend`](gfx::TraceBackend) records calls headlessly and powers
//! the test suite and demos.

pub mod error;
pub mod gfx;
pub mod prelude;

// Re-export main types for convenience
pub use error::SceneError;
pub use gfx::{Drawable, PickPart, RenderBackend, Scene, Transform};
