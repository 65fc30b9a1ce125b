//! # Polygon
//!
//! A flat convex polygon: the workhorse drawable. Geometry is emitted once
//! into a compiled display list and replayed on subsequent frames until a
//! vertex mutation invalidates the cache; colour and texture binding are
//! applied outside the list on every draw. Polygons optionally reference a
//! scene material by name, bind a texture, and cast a planar projected
//! shadow onto the ground plane for every enabled light.

use cgmath::{Matrix4, Vector4};
use log::debug;

use crate::gfx::backend::{Color, PrimitiveMode, RenderBackend, TextureId};
use crate::gfx::draw_scope::{DrawCache, DrawScope};
use crate::gfx::drawable::Drawable;
use crate::gfx::objects::light::Light;
use crate::gfx::transform::Transform;

/// One polygon vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// A flat convex polygon with optional texture, material and shadow casting.
pub struct Polygon {
    pub name: String,
    pub transform: Transform,
    vertices: Vec<PolygonVertex>,
    pub color: Color,
    pub texture: Option<TextureId>,
    /// Name of a scene material applied before emission, if any.
    pub material: Option<String>,
    pub casts_shadow: bool,
    cache: DrawCache,
}

impl Polygon {
    pub fn new(name: &str, vertices: Vec<PolygonVertex>) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::new(),
            vertices,
            color: [1.0, 1.0, 1.0, 1.0],
            texture: None,
            material: None,
            casts_shadow: false,
            cache: DrawCache::new(),
        }
    }

    /// A unit quad in the XY plane at `z = 0`, facing +Z.
    pub fn unit_quad(name: &str) -> Self {
        let normal = [0.0, 0.0, 1.0];
        let corners = [
            ([-0.5, -0.5, 0.0], [0.0, 0.0]),
            ([0.5, -0.5, 0.0], [1.0, 0.0]),
            ([0.5, 0.5, 0.0], [1.0, 1.0]),
            ([-0.5, 0.5, 0.0], [0.0, 1.0]),
        ];
        let vertices = corners
            .iter()
            .map(|&(position, tex_coord)| PolygonVertex {
                position,
                normal,
                tex_coord,
            })
            .collect();
        Self::new(name, vertices)
    }

    pub fn vertices(&self) -> &[PolygonVertex] {
        &self.vertices
    }

    /// Replaces the vertex list and invalidates the compiled list.
    pub fn set_vertices(&mut self, vertices: Vec<PolygonVertex>) {
        self.vertices = vertices;
        self.cache.invalidate();
    }

    /// Marks any cached compiled representation stale.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Frees the compiled list on the backend.
    pub fn release(&mut self, ctx: &mut dyn RenderBackend) {
        self.cache.release(ctx);
    }

    fn emit(&self, ctx: &mut dyn RenderBackend) {
        ctx.begin(PrimitiveMode::Polygon);
        for vertex in &self.vertices {
            ctx.normal(vertex.normal);
            ctx.tex_coord(vertex.tex_coord);
            ctx.vertex(vertex.position);
        }
        ctx.end();
    }

    /// Draws this polygon's projected shadow on the ground plane for every
    /// enabled light.
    pub fn cast_shadow(&self, ctx: &mut dyn RenderBackend, lights: &[Light]) {
        if !self.casts_shadow {
            return;
        }
        for light in lights.iter().filter(|l| l.on) {
            let p = light.transform().translate;
            let shadow = shadow_matrix(
                Vector4::new(p.x, p.y, p.z, 1.0),
                Vector4::new(0.0, 1.0, 0.0, 0.0),
            );
            let mut scope = DrawScope::enter_matrix(ctx, &shadow);
            scope.ctx().color([0.0, 0.0, 0.0, 0.5]);
            self.transform.apply(scope.ctx());
            scope.ctx().begin(PrimitiveMode::Polygon);
            for vertex in &self.vertices {
                scope.ctx().vertex(vertex.position);
            }
            scope.ctx().end();
        }
    }
}

/// Planar projection of geometry away from `light` onto `plane`.
///
/// Standard single-pass shadow matrix: `dot(plane, light) * I - light * planeᵀ`.
pub(crate) fn shadow_matrix(light: Vector4<f32>, plane: Vector4<f32>) -> Matrix4<f32> {
    let dot = plane.x * light.x + plane.y * light.y + plane.z * light.z + plane.w * light.w;
    let col = |basis: Vector4<f32>, coeff: f32| basis * dot - light * coeff;
    Matrix4::from_cols(
        col(Vector4::unit_x(), plane.x),
        col(Vector4::unit_y(), plane.y),
        col(Vector4::unit_z(), plane.z),
        col(Vector4::unit_w(), plane.w),
    )
}

impl Drawable for Polygon {
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
        let textured = match self.texture {
            Some(texture) if !ctx.texture_exists(texture) => {
                // Resource not created yet; skip this object for the frame.
                debug!("polygon '{}': texture not ready, skipping draw", self.name);
                return;
            }
            Some(_) => true,
            None => false,
        };

        let mut scope = DrawScope::enter(ctx, &self.transform);
        // Colour and texture binding stay outside the compiled list; the
        // list holds geometry only, so edits to the public fields show up
        // without an explicit invalidate.
        if textured {
            scope.ctx().bind_texture(self.texture);
        }
        scope.ctx().color(self.color);
        if !scope.replay_or_record(&mut self.cache) {
            self.emit(scope.ctx());
        }
        scope.finish_recording();
        if textured {
            scope.ctx().bind_texture(None);
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
    use approx::assert_relative_eq;
    use cgmath::{Point3, Transform as _, Vector3};

    #[test]
    fn unit_quad_emits_four_vertices_in_one_primitive() {
        let mut quad = Polygon::unit_quad("quad");
        let mut backend = TraceBackend::new();
        quad.draw(&mut backend);

        assert_eq!(backend.count(|c| matches!(c, Command::Begin(_))), 1);
        assert_eq!(backend.count(|c| *c == Command::End), 1);
        assert_eq!(backend.count(|c| matches!(c, Command::Vertex(_))), 4);
        assert_eq!(backend.modelview_depth(), 0);
    }

    #[test]
    fn missing_texture_degrades_to_a_noop() {
        let mut quad = Polygon::unit_quad("quad");
        quad.texture = Some(crate::gfx::backend::TextureId(42));
        let mut backend = TraceBackend::new();
        quad.draw(&mut backend);

        assert!(backend.commands().is_empty());
        assert_eq!(backend.modelview_depth(), 0);
    }

    #[test]
    fn live_texture_is_bound_and_unbound() {
        let mut backend = TraceBackend::new();
        let texture = backend.create_texture();
        let mut quad = Polygon::unit_quad("quad");
        quad.texture = Some(texture);
        quad.draw(&mut backend);

        assert_eq!(
            backend.count(|c| *c == Command::BindTexture(Some(texture))),
            1
        );
        assert_eq!(backend.count(|c| *c == Command::BindTexture(None)), 1);
        assert_eq!(backend.count(|c| matches!(c, Command::TexCoord(_))), 4);
    }

    #[test]
    fn second_draw_replays_the_compiled_list() {
        let mut quad = Polygon::unit_quad("quad");
        let mut backend = TraceBackend::new();
        quad.draw(&mut backend);
        quad.draw(&mut backend);

        assert_eq!(backend.count(|c| matches!(c, Command::BeginList(_))), 1);
        assert_eq!(backend.count(|c| matches!(c, Command::CallList(_))), 1);
        // Vertices were only emitted during the recording draw.
        assert_eq!(backend.count(|c| matches!(c, Command::Vertex(_))), 4);
    }

    #[test]
    fn recolouring_shows_up_on_the_replayed_list() {
        let mut quad = Polygon::unit_quad("quad");
        let mut backend = TraceBackend::new();
        quad.draw(&mut backend);
        quad.color = [0.0, 1.0, 0.0, 1.0];
        quad.draw(&mut backend);

        // The second draw replays the list but carries the new colour.
        assert_eq!(backend.count(|c| matches!(c, Command::CallList(_))), 1);
        assert_eq!(
            backend.count(|c| *c == Command::Color([0.0, 1.0, 0.0, 1.0])),
            1
        );
    }

    #[test]
    fn texture_assigned_after_compilation_is_bound() {
        let mut quad = Polygon::unit_quad("quad");
        let mut backend = TraceBackend::new();
        quad.draw(&mut backend);
        let texture = backend.create_texture();
        quad.texture = Some(texture);
        quad.draw(&mut backend);

        assert_eq!(backend.count(|c| matches!(c, Command::CallList(_))), 1);
        assert_eq!(
            backend.count(|c| *c == Command::BindTexture(Some(texture))),
            1
        );
        assert_eq!(backend.count(|c| *c == Command::BindTexture(None)), 1);
    }

    #[test]
    fn shadow_matrix_flattens_onto_the_ground_plane() {
        let m = shadow_matrix(
            Vector4::new(0.0, 10.0, 0.0, 1.0),
            Vector4::new(0.0, 1.0, 0.0, 0.0),
        );
        let p = m.transform_point(Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(p.x, 1.25, epsilon = 1e-5);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 3.75, epsilon = 1e-5);
    }

    #[test]
    fn shadow_pass_skips_disabled_lights() {
        let mut quad = Polygon::unit_quad("quad");
        quad.casts_shadow = true;
        let mut on = Light::new("key", 0);
        on.on = true;
        on.transform_mut().translate = Vector3::new(0.0, 5.0, 0.0);
        let mut off = Light::new("fill", 1);
        off.on = false;

        let mut backend = TraceBackend::new();
        quad.cast_shadow(&mut backend, &[on, off]);

        assert_eq!(backend.count(|c| matches!(c, Command::Begin(_))), 1);
        assert_eq!(backend.modelview_depth(), 0);
    }
}
