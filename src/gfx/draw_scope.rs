//! # Draw Scope
//!
//! Scoped matrix-stack discipline for drawables. [`DrawScope::enter`] pushes
//! the modelview stack and composes the object's transform; dropping the
//! scope pops exactly one level. Because the pop lives in `Drop`, an early
//! return or panic inside a drawable's emission code can never leave the
//! backend stack unbalanced.
//!
//! The scope also carries the display-list caching protocol: a drawable holds
//! a [`DrawCache`] and asks the scope to replay it when clean, or to record a
//! fresh compile-and-execute list when dirty.

use crate::gfx::backend::{DisplayListId, RenderBackend};
use crate::gfx::transform::Transform;
use cgmath::Matrix4;

/// Compiled draw-list handle plus the invalidation flag.
///
/// `dirty` starts true so the first draw records; mutating geometry calls
/// [`DrawCache::invalidate`] to force a re-record on the next draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCache {
    list: Option<DisplayListId>,
    dirty: bool,
}

impl DrawCache {
    pub fn new() -> Self {
        Self {
            list: None,
            dirty: true,
        }
    }

    /// Marks the cached list stale; it is re-recorded on the next draw.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Frees the backend list, if one was ever compiled.
    pub fn release(&mut self, ctx: &mut dyn RenderBackend) {
        if let Some(id) = self.list.take() {
            ctx.delete_list(id);
        }
        self.dirty = true;
    }
}

impl Default for DrawCache {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard pairing one `push_matrix` with one `pop_matrix`.
pub struct DrawScope<'a> {
    ctx: &'a mut dyn RenderBackend,
    recording: bool,
}

impl<'a> DrawScope<'a> {
    /// Pushes the modelview stack and composes `transform` into it.
    pub fn enter(ctx: &'a mut dyn RenderBackend, transform: &Transform) -> Self {
        ctx.push_matrix();
        transform.apply(ctx);
        Self {
            ctx,
            recording: false,
        }
    }

    /// Pushes the modelview stack and multiplies an explicit matrix in.
    ///
    /// Used where the composed matrix is not a plain object transform, e.g.
    /// the planar shadow projection.
    pub fn enter_matrix(ctx: &'a mut dyn RenderBackend, matrix: &Matrix4<f32>) -> Self {
        ctx.push_matrix();
        ctx.mult_matrix(matrix);
        Self {
            ctx,
            recording: false,
        }
    }

    /// The backend, for emission inside the scope.
    pub fn ctx(&mut self) -> &mut dyn RenderBackend {
        &mut *self.ctx
    }

    /// Replays the cached list, or starts recording a fresh one.
    ///
    /// Returns `true` when the cache was clean and its list was replayed; the
    /// caller should skip emission and return (the scope still pops on drop).
    /// Returns `false` when recording began: the caller emits its geometry,
    /// which is both executed and captured into the list, and the drop ends
    /// the recording.
    pub fn replay_or_record(&mut self, cache: &mut DrawCache) -> bool {
        if !cache.dirty {
            if let Some(id) = cache.list {
                self.ctx.call_list(id);
                return true;
            }
        }
        let id = match cache.list {
            Some(id) => id,
            None => {
                let id = self.ctx.new_list();
                cache.list = Some(id);
                id
            }
        };
        self.ctx.begin_list(id);
        self.recording = true;
        cache.dirty = false;
        false
    }

    /// Ends the recording started by [`DrawScope::replay_or_record`], so
    /// later commands in the scope land outside the compiled list. Dropping
    /// the scope does this implicitly; calling it early keeps per-frame
    /// state such as a texture unbind out of the list.
    pub fn finish_recording(&mut self) {
        if self.recording {
            self.ctx.end_list();
            self.recording = false;
        }
    }
}

impl Drop for DrawScope<'_> {
    fn drop(&mut self) {
        if self.recording {
            self.ctx.end_list();
        }
        self.ctx.pop_matrix();
    }
}
