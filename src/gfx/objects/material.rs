//! Named fixed-function materials.
//!
//! Materials live in the scene's own collection and are looked up by name;
//! the draw pass applies a polygon's material just before its geometry is
//! emitted, so material state is scoped to the objects that reference it.

use crate::gfx::backend::{Color, MaterialParams, RenderBackend};

/// A named set of fixed-function surface parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emissive: Color,
    /// Specular exponent, `0.0..=128.0`.
    pub shininess: f32,
}

impl Material {
    /// A matte material with the given diffuse colour.
    pub fn new(name: &str, diffuse: Color) -> Self {
        Self {
            name: name.to_string(),
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse,
            specular: [0.0, 0.0, 0.0, 1.0],
            emissive: [0.0, 0.0, 0.0, 1.0],
            shininess: 0.0,
        }
    }

    /// Convenience constructor from RGB components.
    pub fn from_rgb(name: &str, r: f32, g: f32, b: f32) -> Self {
        Self::new(name, [r, g, b, 1.0])
    }

    /// Uploads this material as the current surface state.
    pub fn apply(&self, ctx: &mut dyn RenderBackend) {
        ctx.set_material(&MaterialParams {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            emissive: self.emissive,
            shininess: self.shininess,
        });
    }
}
