//! # Transform Node
//!
//! Translation, Euler rotation and scale for a single scene object, together
//! with the order in which the three operations compose into the model
//! matrix. The transform is applied either as backend matrix calls
//! ([`Transform::apply`]) during a draw pass, or composed on the CPU
//! ([`Transform::matrix`]) where an explicit matrix is needed (camera view
//! inverse, shadow projection).

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};

use crate::gfx::backend::RenderBackend;

/// Order in which translate, rotate and scale compose into the model matrix.
///
/// The default `TranslateRotateScale` applies translation first when reading
/// call order, i.e. vertices are scaled, then rotated, then translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformOrder {
    #[default]
    TranslateRotateScale,
    ScaleRotateTranslate,
}

/// Per-object placement: translation, Euler rotation (degrees) and scale.
///
/// Euler rotation applies about X, then Y, then Z, within whichever
/// composition order [`TransformOrder`] specifies.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub translate: Vector3<f32>,
    /// Euler angles in degrees.
    pub rotate: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub order: TransformOrder,
}

impl Transform {
    /// Identity transform with the default composition order.
    pub fn new() -> Self {
        Self {
            translate: Vector3::new(0.0, 0.0, 0.0),
            rotate: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            order: TransformOrder::default(),
        }
    }

    /// Identity transform placed at `translate`.
    pub fn at(translate: Vector3<f32>) -> Self {
        Self {
            translate,
            ..Self::new()
        }
    }

    /// Composes this transform into the backend's current matrix.
    ///
    /// No-op components (zero translation, zero angles, unit scale) are
    /// skipped to keep command streams and display lists lean.
    pub fn apply(&self, ctx: &mut dyn RenderBackend) {
        match self.order {
            TransformOrder::TranslateRotateScale => {
                self.apply_translate(ctx);
                self.apply_rotate(ctx);
                self.apply_scale(ctx);
            }
            TransformOrder::ScaleRotateTranslate => {
                self.apply_scale(ctx);
                self.apply_rotate(ctx);
                self.apply_translate(ctx);
            }
        }
    }

    /// The equivalent model matrix, composed in call order.
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.translate);
        let r = self.rotation_matrix();
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        match self.order {
            TransformOrder::TranslateRotateScale => t * r * s,
            TransformOrder::ScaleRotateTranslate => s * r * t,
        }
    }

    fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Deg(self.rotate.x))
            * Matrix4::from_angle_y(Deg(self.rotate.y))
            * Matrix4::from_angle_z(Deg(self.rotate.z))
    }

    fn apply_translate(&self, ctx: &mut dyn RenderBackend) {
        if self.translate != Vector3::new(0.0, 0.0, 0.0) {
            ctx.translate(self.translate);
        }
    }

    fn apply_rotate(&self, ctx: &mut dyn RenderBackend) {
        if self.rotate.x != 0.0 {
            ctx.rotate(Deg(self.rotate.x), Vector3::unit_x());
        }
        if self.rotate.y != 0.0 {
            ctx.rotate(Deg(self.rotate.y), Vector3::unit_y());
        }
        if self.rotate.z != 0.0 {
            ctx.rotate(Deg(self.rotate.z), Vector3::unit_z());
        }
    }

    fn apply_scale(&self, ctx: &mut dyn RenderBackend) {
        if self.scale != Vector3::new(1.0, 1.0, 1.0) {
            ctx.scale(self.scale);
        }
    }

    /// True when applying this transform would issue no backend calls.
    pub fn is_identity(&self) -> bool {
        self.matrix() == Matrix4::identity()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::backend::{trace::Command, TraceBackend};
    use approx::assert_relative_eq;
    use cgmath::{Point3, Transform as _};

    #[test]
    fn default_order_translates_before_rotating() {
        let mut transform = Transform::new();
        transform.translate = Vector3::new(1.0, 2.0, 3.0);
        transform.rotate = Vector3::new(0.0, 90.0, 0.0);
        transform.scale = Vector3::new(2.0, 2.0, 2.0);

        let mut backend = TraceBackend::new();
        transform.apply(&mut backend);

        assert_eq!(
            backend.commands(),
            &[
                Command::Translate(Vector3::new(1.0, 2.0, 3.0)),
                Command::Rotate(Deg(90.0), Vector3::unit_y()),
                Command::Scale(Vector3::new(2.0, 2.0, 2.0)),
            ]
        );
    }

    #[test]
    fn reversed_order_scales_first() {
        let mut transform = Transform::new();
        transform.translate = Vector3::new(1.0, 0.0, 0.0);
        transform.scale = Vector3::new(3.0, 3.0, 3.0);
        transform.order = TransformOrder::ScaleRotateTranslate;

        let mut backend = TraceBackend::new();
        transform.apply(&mut backend);

        assert_eq!(
            backend.commands(),
            &[
                Command::Scale(Vector3::new(3.0, 3.0, 3.0)),
                Command::Translate(Vector3::new(1.0, 0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn identity_emits_nothing() {
        let transform = Transform::new();
        let mut backend = TraceBackend::new();
        transform.apply(&mut backend);
        assert!(backend.commands().is_empty());
        assert!(transform.is_identity());
    }

    #[test]
    fn matrix_matches_call_order() {
        let mut transform = Transform::new();
        transform.translate = Vector3::new(0.0, 5.0, 0.0);
        transform.scale = Vector3::new(2.0, 2.0, 2.0);

        // T * S: scale applies to the point before the translation does.
        let p = transform.matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-6);

        transform.order = TransformOrder::ScaleRotateTranslate;
        let p = transform.matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 10.0, epsilon = 1e-6);
    }
}
