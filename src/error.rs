//! Scene-level error types.
//!
//! Only precondition failures at the scene API boundary surface as errors;
//! failures local to a single drawable (missing texture, stale resource)
//! degrade to per-object no-ops instead of aborting the pass.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Hit testing was requested without an active camera. The caller may
    /// retry after `set_active_camera`.
    #[error("hit testing requires an active camera")]
    NoCamera,

    /// `set_active_camera` was given an index outside the camera collection.
    #[error("camera index {0} is out of range")]
    UnknownCamera(usize),
}
