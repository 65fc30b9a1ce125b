//! # Scene Objects
//!
//! Concrete [`Drawable`](crate::gfx::drawable::Drawable) variants: polygons,
//! quadric surfaces, lights, cameras and particle systems, plus the named
//! material type the scene's material collection holds.

use crate::gfx::backend::{PrimitiveMode, RenderBackend};

pub mod camera;
pub mod light;
pub mod material;
pub mod particles;
pub mod polygon;
pub mod quadric;

pub use camera::Camera;
pub use light::Light;
pub use material::Material;
pub use particles::ParticleSystem;
pub use polygon::{Polygon, PolygonVertex};
pub use quadric::{Quadric, QuadricShape};

/// Emits an axis-aligned cube of half-extent `half` centred on the origin.
///
/// Shared by the light and camera gizmos.
pub(crate) fn emit_cube(ctx: &mut dyn RenderBackend, half: f32) {
    // (normal, four corners), one quad per face.
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, 1.0],
            [
                [-half, -half, half],
                [half, -half, half],
                [half, half, half],
                [-half, half, half],
            ],
        ),
        (
            [0.0, 0.0, -1.0],
            [
                [-half, -half, -half],
                [-half, half, -half],
                [half, half, -half],
                [half, -half, -half],
            ],
        ),
        (
            [-1.0, 0.0, 0.0],
            [
                [-half, -half, -half],
                [-half, -half, half],
                [-half, half, half],
                [-half, half, -half],
            ],
        ),
        (
            [1.0, 0.0, 0.0],
            [
                [half, -half, half],
                [half, -half, -half],
                [half, half, -half],
                [half, half, half],
            ],
        ),
        (
            [0.0, 1.0, 0.0],
            [
                [-half, half, half],
                [half, half, half],
                [half, half, -half],
                [-half, half, -half],
            ],
        ),
        (
            [0.0, -1.0, 0.0],
            [
                [-half, -half, -half],
                [half, -half, -half],
                [half, -half, half],
                [-half, -half, half],
            ],
        ),
    ];

    ctx.begin(PrimitiveMode::Quads);
    for (normal, corners) in faces {
        for corner in corners {
            ctx.normal(normal);
            ctx.vertex(corner);
        }
    }
    ctx.end();
}
