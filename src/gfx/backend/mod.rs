//! # Backend Abstraction
//!
//! This module defines the [`RenderBackend`] trait, the immediate-mode graphics
//! capability the scene graph is layered over. The trait mirrors the classic
//! fixed-function model: a matrix stack per matrix mode, begin/end primitive
//! emission, slotted hardware lights, compiled display lists, and a
//! selection-buffer render mode with an integer name stack.
//!
//! The scene graph only consumes this interface; it never creates the
//! underlying device. Every drawable receives the backend as an explicit
//! `&mut dyn RenderBackend` parameter; there is no process-wide graphics
//! singleton.
//!
//! [`TraceBackend`](trace::TraceBackend) is a headless implementation that
//! records every call, used by the test suite and by the bundled demos.

use cgmath::{Deg, Matrix4, Vector3};

pub mod trace;

pub use trace::TraceBackend;

/// RGBA colour with components in `0.0..=1.0`.
pub type Color = [f32; 4];

/// Opaque handle to a backend texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Opaque handle to a compiled display list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayListId(pub u32);

/// Which matrix stack subsequent matrix calls operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixMode {
    Projection,
    ModelView,
}

/// Primitive assembly mode for a `begin`/`end` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    Polygon,
}

/// Current rectangular viewport in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Parameter block uploaded to a hardware light slot.
#[derive(Debug, Clone, PartialEq)]
pub struct LightParams {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    /// Homogeneous position; `w == 1.0` for positional lights.
    pub position: [f32; 4],
    pub spot_direction: Vector3<f32>,
    /// Half-angle of the spot cone in degrees; `180.0` means omnidirectional.
    pub spot_cutoff: f32,
}

/// Fixed-function surface material parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParams {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub emissive: Color,
    pub shininess: f32,
}

/// One record read back from the selection buffer.
///
/// `names` holds the name-stack contents at the time the hit geometry was
/// emitted, bottom of the stack first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRecord {
    pub min_depth: u32,
    pub max_depth: u32,
    pub names: Vec<u32>,
}

/// Result of leaving selection mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Hit records in backend-reported order.
    pub hits: Vec<HitRecord>,
    /// True when the selection buffer overflowed and `hits` was truncated.
    pub truncated: bool,
}

/// The immediate-mode graphics capability consumed by the scene graph.
///
/// Implementations are expected to behave like a single-context,
/// single-threaded fixed-function device: matrix and name stacks are plain
/// mutable state, and calls take effect in issue order. Matrix stack underflow
/// is a caller defect; implementations should assert in debug builds and
/// clamp in release builds rather than abort the frame.
pub trait RenderBackend {
    // --- frame ---

    /// Clears the colour, depth and stencil targets to `background`.
    fn clear(&mut self, background: Color);

    /// Flushes all pending commands to the device.
    fn flush(&mut self);

    fn viewport(&self) -> Viewport;

    fn set_viewport(&mut self, viewport: Viewport);

    // --- matrix stack ---

    fn matrix_mode(&mut self, mode: MatrixMode);

    fn push_matrix(&mut self);

    fn pop_matrix(&mut self);

    fn load_identity(&mut self);

    fn mult_matrix(&mut self, matrix: &Matrix4<f32>);

    fn translate(&mut self, offset: Vector3<f32>);

    fn rotate(&mut self, angle: Deg<f32>, axis: Vector3<f32>);

    fn scale(&mut self, factors: Vector3<f32>);

    /// Composes a perspective projection into the current matrix.
    fn perspective(&mut self, fovy: Deg<f32>, aspect: f32, near: f32, far: f32);

    /// Composes a restricted pick-region projection into the current matrix.
    ///
    /// `center` is in viewport coordinates (origin bottom-left), `size` is the
    /// pick window extent in device pixels.
    fn pick_matrix(&mut self, center: (f64, f64), size: (f64, f64));

    // --- primitive emission ---

    fn begin(&mut self, mode: PrimitiveMode);

    fn end(&mut self);

    fn vertex(&mut self, position: [f32; 3]);

    fn normal(&mut self, normal: [f32; 3]);

    fn color(&mut self, color: Color);

    fn tex_coord(&mut self, uv: [f32; 2]);

    /// Binds `texture` for subsequent emission, or unbinds with `None`.
    fn bind_texture(&mut self, texture: Option<TextureId>);

    /// Whether `texture` names a live backend texture object.
    ///
    /// Drawables use this to degrade gracefully while a resource has not been
    /// created yet (device lost, deferred upload).
    fn texture_exists(&self, texture: TextureId) -> bool;

    // --- lighting and material state ---

    /// Number of hardware light slots the device supports.
    fn max_lights(&self) -> usize;

    fn set_light(&mut self, slot: usize, params: &LightParams);

    fn disable_light(&mut self, slot: usize);

    fn set_material(&mut self, params: &MaterialParams);

    // --- display lists ---

    /// Reserves a fresh display list handle.
    fn new_list(&mut self) -> DisplayListId;

    /// Starts recording into `id` in compile-and-execute mode: recorded calls
    /// are also executed immediately.
    fn begin_list(&mut self, id: DisplayListId);

    fn end_list(&mut self);

    /// Replays a previously compiled list.
    fn call_list(&mut self, id: DisplayListId);

    fn delete_list(&mut self, id: DisplayListId);

    // --- selection ---

    /// Enters selection mode with a hit buffer of `capacity` words.
    ///
    /// While in selection mode no fragments are produced; instead each
    /// primitive that intersects the view volume contributes a [`HitRecord`]
    /// tagged with the current name stack.
    fn begin_selection(&mut self, capacity: usize);

    /// Resets the name stack to empty.
    fn init_names(&mut self);

    /// Replaces the top of the name stack.
    fn load_name(&mut self, name: u32);

    fn push_name(&mut self, name: u32);

    fn pop_name(&mut self);

    /// Leaves selection mode and reads back the accumulated hits.
    fn end_selection(&mut self) -> SelectionOutcome;
}
