//! # Drawable Capability
//!
//! The polymorphic seam of the scene graph. Every scene entity that can emit
//! backend calls implements [`Drawable`]; the scene dispatches draw and pick
//! passes through `&mut dyn Drawable` without knowing concrete variants.
//!
//! Picking is opt-in: the default [`Drawable::draw_for_picking`] emits
//! nothing, so an entity that does not override it simply cannot be hit.
//! Entities with interactively editable sub-parts push an extra name on the
//! backend's selection name stack around the sub-part geometry and decode it
//! in [`Drawable::resolve_pick`].

use crate::gfx::backend::RenderBackend;
use crate::gfx::transform::Transform;

/// The part of a drawable a pick resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickPart {
    /// The whole object.
    Whole,
    /// A sub-part, identified by the drawable's own sub-part name code.
    SubPart(u32),
}

/// A scene entity that can emit backend draw calls for itself.
pub trait Drawable {
    /// Display name, unique within a scene by convention.
    fn name(&self) -> &str;

    fn transform(&self) -> &Transform;

    fn transform_mut(&mut self) -> &mut Transform;

    /// Emits this entity's geometry.
    ///
    /// Implementations wrap their emission in a
    /// [`DrawScope`](crate::gfx::draw_scope::DrawScope) so the modelview
    /// stack is balanced even on early return. If a required backend resource
    /// does not exist yet, the draw degrades to a no-op for this entity only.
    fn draw(&mut self, ctx: &mut dyn RenderBackend);

    /// Emits a possibly simplified representation for the selection pass.
    ///
    /// The scene loads this entity's pick name before the call; sub-parts are
    /// tagged by pushing an additional name around their geometry. The
    /// default emits nothing, making the entity non-pickable.
    fn draw_for_picking(&self, ctx: &mut dyn RenderBackend) {
        let _ = ctx;
    }

    /// Resolves a captured name path to the most specific addressable part.
    ///
    /// `names[0]` is the scene-assigned pick name; any further entries are
    /// sub-part codes this drawable pushed during `draw_for_picking`. The
    /// default resolves everything to the whole object.
    fn resolve_pick(&self, names: &[u32]) -> PickPart {
        let _ = names;
        PickPart::Whole
    }
}
