//! # Light
//!
//! A positional light bound to a fixed hardware slot. Slots are assigned in
//! collection order when the scene initialises and never change afterwards;
//! toggling a light on or off only enables or disables its own slot.
//!
//! In design mode a light draws a small cube gizmo at its position and a line
//! out to its direction handle. The handle is separately pickable: during the
//! selection pass it is tagged with the sub-part name
//! [`DIRECTION_HANDLE`], which [`Light::resolve_pick`] decodes.

use cgmath::{InnerSpace, Vector3};

use crate::gfx::backend::{Color, LightParams, PrimitiveMode, RenderBackend};
use crate::gfx::draw_scope::DrawScope;
use crate::gfx::drawable::{Drawable, PickPart};
use crate::gfx::objects::emit_cube;
use crate::gfx::transform::Transform;

/// Sub-part name code for the direction handle.
pub const DIRECTION_HANDLE: u32 = 0;

/// Half-size of the gizmo cube in world units.
const GIZMO_EXTENT: f32 = 0.15;

/// A slotted hardware light with a pickable direction handle.
pub struct Light {
    pub name: String,
    pub transform: Transform,
    slot: usize,
    pub on: bool,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    /// Where the spot (or the direction handle) points, relative to the
    /// light's position.
    pub direction: Vector3<f32>,
    spot_cutoff: f32,
}

impl Light {
    /// A white omnidirectional light bound to `slot`, initially off.
    pub fn new(name: &str, slot: usize) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::new(),
            slot,
            on: false,
            ambient: [0.0, 0.0, 0.0, 1.0],
            diffuse: [1.0, 1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0, 1.0],
            direction: Vector3::new(0.0, 0.0, -1.0),
            spot_cutoff: 180.0,
        }
    }

    /// The hardware slot this light owns.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn spot_cutoff(&self) -> f32 {
        self.spot_cutoff
    }

    /// Sets the spot cone half-angle. Valid values are `0.0..=90.0` or the
    /// special `180.0` (omnidirectional); anything else clamps into range.
    pub fn set_spot_cutoff(&mut self, degrees: f32) {
        self.spot_cutoff = if degrees == 180.0 {
            degrees
        } else {
            degrees.clamp(0.0, 90.0)
        };
    }

    /// Uploads this light's parameters to its slot, or disables the slot
    /// when the light is off.
    pub fn set(&self, ctx: &mut dyn RenderBackend) {
        if !self.on {
            ctx.disable_light(self.slot);
            return;
        }
        let p = self.transform.translate;
        ctx.set_light(
            self.slot,
            &LightParams {
                ambient: self.ambient,
                diffuse: self.diffuse,
                specular: self.specular,
                position: [p.x, p.y, p.z, 1.0],
                spot_direction: self.direction,
                spot_cutoff: self.spot_cutoff,
            },
        );
    }

    fn emit_handle(&self, ctx: &mut dyn RenderBackend) {
        let tip = if self.direction.magnitude2() > 0.0 {
            self.direction.normalize()
        } else {
            Vector3::new(0.0, 0.0, -1.0)
        };
        ctx.begin(PrimitiveMode::Lines);
        ctx.vertex([0.0, 0.0, 0.0]);
        ctx.vertex([tip.x, tip.y, tip.z]);
        ctx.end();
        ctx.translate(tip);
        emit_cube(ctx, GIZMO_EXTENT * 0.5);
    }
}

impl Drawable for Light {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Draws the design-mode gizmo: a cube tinted with the diffuse colour
    /// plus the direction handle. Never contributes to final-render output.
    fn draw(&mut self, ctx: &mut dyn RenderBackend) {
        let mut scope = DrawScope::enter(ctx, &self.transform);
        scope.ctx().color(self.diffuse);
        emit_cube(scope.ctx(), GIZMO_EXTENT);
        self.emit_handle(scope.ctx());
    }

    fn draw_for_picking(&self, ctx: &mut dyn RenderBackend) {
        let mut scope = DrawScope::enter(ctx, &self.transform);
        emit_cube(scope.ctx(), GIZMO_EXTENT);

        // Tag the handle so a hit on it resolves to the sub-part, not the
        // light body.
        scope.ctx().push_name(DIRECTION_HANDLE);
        self.emit_handle(scope.ctx());
        scope.ctx().pop_name();
    }

    fn resolve_pick(&self, names: &[u32]) -> PickPart {
        match names {
            [_, DIRECTION_HANDLE, ..] => PickPart::SubPart(DIRECTION_HANDLE),
            _ => PickPart::Whole,
        }
    }
}
