//! # Camera
//!
//! A perspective camera placed by its transform and looking down its local
//! -Z axis. `project` loads the projection matrix and the inverse-transform
//! view matrix at the head of a draw pass; the same pieces are reused by the
//! pick pass, composed under the restricted pick projection.
//!
//! In design mode a camera draws a wireframe frustum gizmo so other cameras
//! can be seen and picked while authoring a scene.

use cgmath::{Deg, Matrix4, Rad, SquareMatrix};
use log::warn;

use crate::gfx::backend::{MatrixMode, PrimitiveMode, RenderBackend};
use crate::gfx::draw_scope::DrawScope;
use crate::gfx::drawable::Drawable;
use crate::gfx::objects::emit_cube;
use crate::gfx::transform::Transform;

/// Depth at which the frustum gizmo's far rectangle is drawn.
const GIZMO_DEPTH: f32 = 1.0;

/// A perspective camera.
pub struct Camera {
    pub name: String,
    pub transform: Transform,
    pub fovy: Deg<f32>,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::new(),
            fovy: Deg(45.0),
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Loads this camera's projection and view matrices, replacing whatever
    /// both stacks currently hold. Called at the head of every draw pass so a
    /// mid-frame resize is reflected immediately.
    pub fn project(&self, ctx: &mut dyn RenderBackend) {
        ctx.matrix_mode(MatrixMode::Projection);
        ctx.load_identity();
        self.apply_perspective(ctx);
        ctx.matrix_mode(MatrixMode::ModelView);
        ctx.load_identity();
        self.apply_view(ctx);
    }

    /// Composes the perspective projection into the current matrix.
    pub fn apply_perspective(&self, ctx: &mut dyn RenderBackend) {
        ctx.perspective(self.fovy, self.aspect, self.near, self.far);
    }

    /// Composes the view matrix (inverse of the camera transform) into the
    /// current matrix.
    pub fn apply_view(&self, ctx: &mut dyn RenderBackend) {
        let view = match self.transform.matrix().invert() {
            Some(view) => view,
            None => {
                // Degenerate transform (zero scale); draw from identity.
                warn!("camera '{}': singular transform, using identity view", self.name);
                Matrix4::identity()
            }
        };
        ctx.mult_matrix(&view);
    }

    fn emit_frustum(&self, ctx: &mut dyn RenderBackend) {
        let half_h = (Rad::from(self.fovy).0 * 0.5).tan() * GIZMO_DEPTH;
        let half_w = half_h * self.aspect;
        let z = -GIZMO_DEPTH;
        let corners = [
            [-half_w, -half_h, z],
            [half_w, -half_h, z],
            [half_w, half_h, z],
            [-half_w, half_h, z],
        ];

        ctx.begin(PrimitiveMode::Lines);
        for corner in corners {
            ctx.vertex([0.0, 0.0, 0.0]);
            ctx.vertex(corner);
        }
        ctx.end();

        ctx.begin(PrimitiveMode::LineLoop);
        for corner in corners {
            ctx.vertex(corner);
        }
        ctx.end();
    }
}

impl Drawable for Camera {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Draws the design-mode frustum gizmo.
    fn draw(&mut self, ctx: &mut dyn RenderBackend) {
        let mut scope = DrawScope::enter(ctx, &self.transform);
        scope.ctx().color([0.6, 0.6, 0.6, 1.0]);
        self.emit_frustum(scope.ctx());
    }

    fn draw_for_picking(&self, ctx: &mut dyn RenderBackend) {
        let mut scope = DrawScope::enter(ctx, &self.transform);
        emit_cube(scope.ctx(), 0.15);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::backend::{trace::Command, TraceBackend};
    use cgmath::Vector3;

    #[test]
    fn project_loads_both_stacks() {
        let camera = Camera::new("main");
        let mut backend = TraceBackend::new();
        camera.project(&mut backend);

        assert_eq!(
            backend.commands()[0],
            Command::MatrixMode(MatrixMode::Projection)
        );
        assert_eq!(backend.count(|c| *c == Command::LoadIdentity), 2);
        assert_eq!(backend.count(|c| matches!(c, Command::Perspective { .. })), 1);
        assert_eq!(backend.count(|c| matches!(c, Command::MultMatrix(_))), 1);
        // project replaces matrices, it does not push.
        assert_eq!(backend.modelview_depth(), 0);
        assert_eq!(backend.projection_depth(), 0);
    }

    #[test]
    fn view_is_the_inverse_of_the_camera_transform() {
        let mut camera = Camera::new("main");
        camera.transform.translate = Vector3::new(0.0, 0.0, 5.0);
        let mut backend = TraceBackend::new();
        camera.apply_view(&mut backend);

        match &backend.commands()[0] {
            Command::MultMatrix(m) => {
                // Camera at +5 Z means the world moves -5 Z.
                assert_eq!(m.w.z, -5.0);
            }
            other => panic!("expected MultMatrix, got {other:?}"),
        }
    }

    #[test]
    fn gizmo_is_balanced() {
        let mut camera = Camera::new("main");
        let mut backend = TraceBackend::new();
        camera.draw(&mut backend);
        assert_eq!(backend.modelview_depth(), 0);
        assert_eq!(backend.count(|c| matches!(c, Command::Begin(_))), 2);
    }
}
