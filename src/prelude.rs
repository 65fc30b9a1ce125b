//! # Tartan Prelude
//!
//! A convenient way to import the types a typical Tartan application touches.
//!
//! ```rust
//! use tartan::prelude::*;
//!
//! let mut scene = Scene::new();
//! let mut backend = TraceBackend::new();
//! scene.initialise(&mut backend);
//! scene.add_polygon(Polygon::unit_quad("floor"));
//! scene.draw(&mut backend);
//! ```

// Core scene and pipeline types
pub use crate::error::SceneError;
pub use crate::gfx::backend::{Color, RenderBackend, TraceBackend, Viewport};
pub use crate::gfx::draw_scope::{DrawCache, DrawScope};
pub use crate::gfx::drawable::{Drawable, PickPart};
pub use crate::gfx::picking::{Pick, SelectionConfig};
pub use crate::gfx::scene::{Category, ObjectHandle, Scene};
pub use crate::gfx::transform::{Transform, TransformOrder};

// Drawable variants
pub use crate::gfx::objects::{
    Camera, Light, Material, ParticleSystem, Polygon, PolygonVertex, Quadric, QuadricShape,
};

// Re-export common external dependencies
pub use cgmath::{Deg, Vector3};
