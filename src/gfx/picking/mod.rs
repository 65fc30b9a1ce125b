//! # Picking / Hit Testing
//!
//! Selection-buffer picking: the scene renders every pickable object under a
//! restricted projection covering a few pixels around the query point, each
//! tagged with an integer name, and reads back the hits the backend
//! accumulated. The first name of a hit is the object's position in the
//! scene's canonical combined array plus one; further names are sub-part
//! codes the object pushed itself (e.g. a light's direction handle).
//!
//! ## Capacity
//!
//! The selection buffer has a fixed capacity configured at scene
//! construction via [`SelectionConfig`]. A hit volume that exceeds it is
//! truncated: later hits are dropped with a warning, never an error.
//!
//! ## Result order
//!
//! Hits come back in whatever order the backend reports them. That is
//! typically draw order, but it is backend-defined, not a guarantee of this
//! API.

use log::warn;

use crate::error::SceneError;
use crate::gfx::backend::{MatrixMode, RenderBackend};
use crate::gfx::drawable::PickPart;
use crate::gfx::scene::{ObjectHandle, Scene};

/// Selection pass configuration, fixed at scene construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionConfig {
    /// Selection buffer capacity in words. Each hit costs three words plus
    /// one per name on its name stack.
    pub buffer_capacity: usize,
    /// Side length of the square pick window, in device pixels.
    pub pick_window: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 512,
            pick_window: 4.0,
        }
    }
}

/// One resolved hit from a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    /// The object that was hit.
    pub handle: ObjectHandle,
    /// The specific part of it, as resolved by the object itself.
    pub part: PickPart,
}

impl Scene {
    /// Determines which objects occupy the window point `(x, y)`.
    ///
    /// `x` and `y` are window coordinates with the origin at the top left;
    /// the y axis is flipped to the backend's bottom-left convention using
    /// the current viewport height. Requires an active camera; fails with
    /// [`SceneError::NoCamera`] otherwise. The scene itself is untouched and
    /// the caller may retry after selecting one.
    pub fn hit_test(
        &self,
        ctx: &mut dyn RenderBackend,
        x: i32,
        y: i32,
    ) -> Result<Vec<Pick>, SceneError> {
        let camera = self.active_camera().ok_or(SceneError::NoCamera)?;
        let selection = *self.selection();

        let viewport = ctx.viewport();
        let flipped_y = viewport.height as i32 - y;

        ctx.begin_selection(selection.buffer_capacity);
        ctx.init_names();
        // Placeholder so load_name always has a stack slot to replace.
        ctx.push_name(0);

        // Restricted projection: the pick window composed with the camera's
        // normal projection, view on a fresh modelview level.
        ctx.matrix_mode(MatrixMode::Projection);
        ctx.push_matrix();
        ctx.load_identity();
        ctx.pick_matrix(
            (x as f64, flipped_y as f64),
            (selection.pick_window, selection.pick_window),
        );
        camera.apply_perspective(ctx);
        ctx.matrix_mode(MatrixMode::ModelView);
        ctx.push_matrix();
        ctx.load_identity();
        camera.apply_view(ctx);

        let handles = self.combined_pick_handles();
        for (index, handle) in handles.iter().enumerate() {
            ctx.load_name(index as u32 + 1);
            if let Some(drawable) = self.pickable(*handle) {
                drawable.draw_for_picking(ctx);
            }
        }

        ctx.matrix_mode(MatrixMode::Projection);
        ctx.pop_matrix();
        ctx.matrix_mode(MatrixMode::ModelView);
        ctx.pop_matrix();
        ctx.flush();

        let outcome = ctx.end_selection();
        if outcome.truncated {
            warn!(
                "hit test at ({x}, {y}): selection buffer overflow, results truncated \
                 (capacity {} words)",
                selection.buffer_capacity
            );
        }

        let mut picks = Vec::with_capacity(outcome.hits.len());
        for hit in &outcome.hits {
            // A hit with no names is geometry nobody tagged; skip it.
            let Some(&first) = hit.names.first() else {
                continue;
            };
            if first == 0 {
                continue;
            }
            let Some(&handle) = handles.get(first as usize - 1) else {
                warn!("hit test: backend reported stale pick name {first}");
                continue;
            };
            let part = self
                .pickable(handle)
                .map(|d| d.resolve_pick(&hit.names))
                .unwrap_or(PickPart::Whole);
            picks.push(Pick { handle, part });
        }
        Ok(picks)
    }
}
