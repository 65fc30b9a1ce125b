//! # Quadric Surfaces
//!
//! Procedurally tessellated quadrics: sphere, cylinder and disk. Each draw
//! emits latitude/longitude triangle strips with proper outward normals;
//! geometry is compiled into a display list on first draw and replayed after
//! that, since the tessellation only changes when shape parameters do.

use std::f32::consts::PI;

use crate::gfx::backend::{Color, PrimitiveMode, RenderBackend};
use crate::gfx::draw_scope::{DrawCache, DrawScope};
use crate::gfx::drawable::Drawable;
use crate::gfx::transform::Transform;

/// Shape parameters for a quadric surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadricShape {
    Sphere {
        radius: f32,
        slices: u32,
        stacks: u32,
    },
    /// Swept along +Z, base ring at `z = 0`, top ring at `z = height`.
    Cylinder {
        base_radius: f32,
        top_radius: f32,
        height: f32,
        slices: u32,
        stacks: u32,
    },
    /// Flat annulus in the XY plane at `z = 0`, facing +Z.
    Disk {
        inner_radius: f32,
        outer_radius: f32,
        slices: u32,
        loops: u32,
    },
}

/// A tessellated quadric surface.
pub struct Quadric {
    pub name: String,
    pub transform: Transform,
    shape: QuadricShape,
    pub color: Color,
    cache: DrawCache,
}

impl Quadric {
    pub fn new(name: &str, shape: QuadricShape) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::new(),
            shape,
            color: [1.0, 1.0, 1.0, 1.0],
            cache: DrawCache::new(),
        }
    }

    pub fn sphere(name: &str, radius: f32, slices: u32, stacks: u32) -> Self {
        Self::new(
            name,
            QuadricShape::Sphere {
                radius,
                slices,
                stacks,
            },
        )
    }

    pub fn shape(&self) -> QuadricShape {
        self.shape
    }

    /// Replaces the shape parameters and invalidates the compiled list.
    pub fn set_shape(&mut self, shape: QuadricShape) {
        self.shape = shape;
        self.cache.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn release(&mut self, ctx: &mut dyn RenderBackend) {
        self.cache.release(ctx);
    }

    fn emit(&self, ctx: &mut dyn RenderBackend) {
        match self.shape {
            QuadricShape::Sphere {
                radius,
                slices,
                stacks,
            } => emit_sphere(ctx, radius, slices.max(3), stacks.max(2)),
            QuadricShape::Cylinder {
                base_radius,
                top_radius,
                height,
                slices,
                stacks,
            } => emit_cylinder(
                ctx,
                base_radius,
                top_radius,
                height,
                slices.max(3),
                stacks.max(1),
            ),
            QuadricShape::Disk {
                inner_radius,
                outer_radius,
                slices,
                loops,
            } => emit_disk(ctx, inner_radius, outer_radius, slices.max(3), loops.max(1)),
        }
    }
}

fn emit_sphere(ctx: &mut dyn RenderBackend, radius: f32, slices: u32, stacks: u32) {
    for stack in 0..stacks {
        let theta0 = stack as f32 * PI / stacks as f32;
        let theta1 = (stack + 1) as f32 * PI / stacks as f32;

        ctx.begin(PrimitiveMode::TriangleStrip);
        for slice in 0..=slices {
            let phi = slice as f32 * 2.0 * PI / slices as f32;
            for theta in [theta0, theta1] {
                let n = [
                    theta.sin() * phi.cos(),
                    theta.cos(),
                    theta.sin() * phi.sin(),
                ];
                ctx.normal(n);
                ctx.vertex([n[0] * radius, n[1] * radius, n[2] * radius]);
            }
        }
        ctx.end();
    }
}

fn emit_cylinder(
    ctx: &mut dyn RenderBackend,
    base_radius: f32,
    top_radius: f32,
    height: f32,
    slices: u32,
    stacks: u32,
) {
    // Side normals tilt with the radius taper.
    let slope = if height != 0.0 {
        (base_radius - top_radius) / height
    } else {
        0.0
    };
    let inv_len = 1.0 / (1.0 + slope * slope).sqrt();

    for stack in 0..stacks {
        let t0 = stack as f32 / stacks as f32;
        let t1 = (stack + 1) as f32 / stacks as f32;
        let z0 = t0 * height;
        let z1 = t1 * height;
        let r0 = base_radius + t0 * (top_radius - base_radius);
        let r1 = base_radius + t1 * (top_radius - base_radius);

        ctx.begin(PrimitiveMode::TriangleStrip);
        for slice in 0..=slices {
            let phi = slice as f32 * 2.0 * PI / slices as f32;
            let (sin, cos) = phi.sin_cos();
            ctx.normal([cos * inv_len, sin * inv_len, slope * inv_len]);
            ctx.vertex([cos * r0, sin * r0, z0]);
            ctx.normal([cos * inv_len, sin * inv_len, slope * inv_len]);
            ctx.vertex([cos * r1, sin * r1, z1]);
        }
        ctx.end();
    }
}

fn emit_disk(
    ctx: &mut dyn RenderBackend,
    inner_radius: f32,
    outer_radius: f32,
    slices: u32,
    loops: u32,
) {
    for ring in 0..loops {
        let r0 = inner_radius + ring as f32 / loops as f32 * (outer_radius - inner_radius);
        let r1 = inner_radius + (ring + 1) as f32 / loops as f32 * (outer_radius - inner_radius);

        ctx.begin(PrimitiveMode::TriangleStrip);
        for slice in 0..=slices {
            let phi = slice as f32 * 2.0 * PI / slices as f32;
            let (sin, cos) = phi.sin_cos();
            ctx.normal([0.0, 0.0, 1.0]);
            ctx.vertex([cos * r1, sin * r1, 0.0]);
            ctx.normal([0.0, 0.0, 1.0]);
            ctx.vertex([cos * r0, sin * r0, 0.0]);
        }
        ctx.end();
    }
}

impl Drawable for Quadric {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn draw(&mut self, ctx: &mut dyn RenderBackend) {
        let mut scope = DrawScope::enter(ctx, &self.transform);
        // Colour stays outside the compiled list so a recolour shows up
        // without an explicit invalidate.
        scope.ctx().color(self.color);
        if !scope.replay_or_record(&mut self.cache) {
            self.emit(scope.ctx());
        }
    }

    fn draw_for_picking(&self, ctx: &mut dyn RenderBackend) {
        let mut scope = DrawScope::enter(ctx, &self.transform);
        self.emit(scope.ctx());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::backend::{trace::Command, TraceBackend};

    #[test]
    fn sphere_strips_are_balanced() {
        let mut sphere = Quadric::sphere("ball", 1.0, 8, 4);
        let mut backend = TraceBackend::new();
        sphere.draw(&mut backend);

        let begins = backend.count(|c| matches!(c, Command::Begin(_)));
        let ends = backend.count(|c| *c == Command::End);
        assert_eq!(begins, 4); // one strip per stack
        assert_eq!(begins, ends);
        // Each strip holds two vertices per slice boundary.
        assert_eq!(
            backend.count(|c| matches!(c, Command::Vertex(_))),
            4 * 2 * 9
        );
        assert_eq!(backend.modelview_depth(), 0);
    }

    #[test]
    fn degenerate_parameters_are_clamped() {
        let mut sphere = Quadric::sphere("tiny", 1.0, 0, 0);
        let mut backend = TraceBackend::new();
        sphere.draw(&mut backend);
        // Clamped to 3 slices and 2 stacks: still emits valid strips.
        assert_eq!(backend.count(|c| matches!(c, Command::Begin(_))), 2);
    }

    #[test]
    fn recolouring_shows_up_on_the_replayed_list() {
        let mut sphere = Quadric::sphere("ball", 1.0, 8, 4);
        let mut backend = TraceBackend::new();
        sphere.draw(&mut backend);
        sphere.color = [0.0, 1.0, 0.0, 1.0];
        sphere.draw(&mut backend);

        assert_eq!(backend.count(|c| matches!(c, Command::CallList(_))), 1);
        assert_eq!(
            backend.count(|c| *c == Command::Color([0.0, 1.0, 0.0, 1.0])),
            1
        );
    }

    #[test]
    fn reshaping_invalidates_the_cache() {
        let mut disk = Quadric::new(
            "disk",
            QuadricShape::Disk {
                inner_radius: 0.0,
                outer_radius: 1.0,
                slices: 8,
                loops: 1,
            },
        );
        let mut backend = TraceBackend::new();
        disk.draw(&mut backend);
        disk.set_shape(QuadricShape::Disk {
            inner_radius: 0.5,
            outer_radius: 1.0,
            slices: 8,
            loops: 1,
        });
        disk.draw(&mut backend);

        assert_eq!(backend.count(|c| matches!(c, Command::BeginList(_))), 2);
        assert_eq!(backend.count(|c| matches!(c, Command::CallList(_))), 0);
    }
}
