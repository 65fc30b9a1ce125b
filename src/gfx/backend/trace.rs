//! # Trace Backend
//!
//! A headless [`RenderBackend`] that records every call as a [`Command`]
//! instead of talking to a device. It tracks matrix and name stack depths,
//! simulates display lists and the selection protocol, and lets callers
//! script the hit records a pick pass will read back.
//!
//! The trace backend serves two purposes: it is the fixture the test suite
//! drives scenes against, and it lets the demos run without a window or GPU.

use std::collections::HashSet;

use cgmath::{Deg, Matrix4, Vector3};
use log::warn;

use super::{
    Color, DisplayListId, HitRecord, LightParams, MaterialParams, MatrixMode, PrimitiveMode,
    RenderBackend, SelectionOutcome, TextureId, Viewport,
};

/// Words of selection-buffer space one hit record occupies: the name count,
/// two depth values, then the names themselves.
const HIT_HEADER_WORDS: usize = 3;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Clear(Color),
    Flush,
    SetViewport(Viewport),
    MatrixMode(MatrixMode),
    PushMatrix,
    PopMatrix,
    LoadIdentity,
    MultMatrix(Matrix4<f32>),
    Translate(Vector3<f32>),
    Rotate(Deg<f32>, Vector3<f32>),
    Scale(Vector3<f32>),
    Perspective {
        fovy: Deg<f32>,
        aspect: f32,
        near: f32,
        far: f32,
    },
    PickMatrix {
        center: (f64, f64),
        size: (f64, f64),
    },
    Begin(PrimitiveMode),
    End,
    Vertex([f32; 3]),
    Normal([f32; 3]),
    Color(Color),
    TexCoord([f32; 2]),
    BindTexture(Option<TextureId>),
    SetLight {
        slot: usize,
        params: LightParams,
    },
    DisableLight(usize),
    SetMaterial(MaterialParams),
    BeginList(DisplayListId),
    EndList,
    CallList(DisplayListId),
    DeleteList(DisplayListId),
    BeginSelection(usize),
    InitNames,
    LoadName(u32),
    PushName(u32),
    PopName,
    EndSelection,
}

/// Recording backend with simulated stacks and scriptable selection hits.
pub struct TraceBackend {
    commands: Vec<Command>,
    viewport: Viewport,
    mode: MatrixMode,
    modelview_depth: usize,
    projection_depth: usize,
    name_depth: usize,
    next_list: u32,
    live_lists: HashSet<DisplayListId>,
    next_texture: u32,
    textures: HashSet<TextureId>,
    max_lights: usize,
    selection_capacity: Option<usize>,
    queued_hits: Vec<HitRecord>,
}

impl TraceBackend {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            viewport: Viewport::new(0, 0, 800, 600),
            mode: MatrixMode::ModelView,
            modelview_depth: 0,
            projection_depth: 0,
            name_depth: 0,
            next_list: 1,
            live_lists: HashSet::new(),
            next_texture: 1,
            textures: HashSet::new(),
            max_lights: 8,
            selection_capacity: None,
            queued_hits: Vec::new(),
        }
    }

    /// All calls recorded so far, in issue order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Drops the recorded call log; stack depths and resources are kept.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Counts recorded commands matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Command) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// Current modelview stack depth (pushes minus pops).
    pub fn modelview_depth(&self) -> usize {
        self.modelview_depth
    }

    /// Current projection stack depth.
    pub fn projection_depth(&self) -> usize {
        self.projection_depth
    }

    /// Current name stack depth.
    pub fn name_depth(&self) -> usize {
        self.name_depth
    }

    /// Overrides the reported hardware light slot count.
    pub fn set_max_lights(&mut self, max_lights: usize) {
        self.max_lights = max_lights;
    }

    /// Registers a live texture object and returns its handle.
    pub fn create_texture(&mut self) -> TextureId {
        let id = TextureId(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(id);
        id
    }

    /// Queues a hit record for the next `end_selection` readback.
    pub fn queue_hit(&mut self, names: &[u32], min_depth: u32, max_depth: u32) {
        self.queued_hits.push(HitRecord {
            min_depth,
            max_depth,
            names: names.to_vec(),
        });
    }

    fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    fn depth_mut(&mut self) -> &mut usize {
        match self.mode {
            MatrixMode::ModelView => &mut self.modelview_depth,
            MatrixMode::Projection => &mut self.projection_depth,
        }
    }
}

impl Default for TraceBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for TraceBackend {
    fn clear(&mut self, background: Color) {
        self.push(Command::Clear(background));
    }

    fn flush(&mut self) {
        self.push(Command::Flush);
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.push(Command::SetViewport(viewport));
    }

    fn matrix_mode(&mut self, mode: MatrixMode) {
        self.mode = mode;
        self.push(Command::MatrixMode(mode));
    }

    fn push_matrix(&mut self) {
        *self.depth_mut() += 1;
        self.push(Command::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        let depth = self.depth_mut();
        debug_assert!(*depth > 0, "matrix stack underflow");
        *depth = depth.saturating_sub(1);
        self.push(Command::PopMatrix);
    }

    fn load_identity(&mut self) {
        self.push(Command::LoadIdentity);
    }

    fn mult_matrix(&mut self, matrix: &Matrix4<f32>) {
        self.push(Command::MultMatrix(*matrix));
    }

    fn translate(&mut self, offset: Vector3<f32>) {
        self.push(Command::Translate(offset));
    }

    fn rotate(&mut self, angle: Deg<f32>, axis: Vector3<f32>) {
        self.push(Command::Rotate(angle, axis));
    }

    fn scale(&mut self, factors: Vector3<f32>) {
        self.push(Command::Scale(factors));
    }

    fn perspective(&mut self, fovy: Deg<f32>, aspect: f32, near: f32, far: f32) {
        self.push(Command::Perspective {
            fovy,
            aspect,
            near,
            far,
        });
    }

    fn pick_matrix(&mut self, center: (f64, f64), size: (f64, f64)) {
        self.push(Command::PickMatrix { center, size });
    }

    fn begin(&mut self, mode: PrimitiveMode) {
        self.push(Command::Begin(mode));
    }

    fn end(&mut self) {
        self.push(Command::End);
    }

    fn vertex(&mut self, position: [f32; 3]) {
        self.push(Command::Vertex(position));
    }

    fn normal(&mut self, normal: [f32; 3]) {
        self.push(Command::Normal(normal));
    }

    fn color(&mut self, color: Color) {
        self.push(Command::Color(color));
    }

    fn tex_coord(&mut self, uv: [f32; 2]) {
        self.push(Command::TexCoord(uv));
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.push(Command::BindTexture(texture));
    }

    fn texture_exists(&self, texture: TextureId) -> bool {
        self.textures.contains(&texture)
    }

    fn max_lights(&self) -> usize {
        self.max_lights
    }

    fn set_light(&mut self, slot: usize, params: &LightParams) {
        self.push(Command::SetLight {
            slot,
            params: params.clone(),
        });
    }

    fn disable_light(&mut self, slot: usize) {
        self.push(Command::DisableLight(slot));
    }

    fn set_material(&mut self, params: &MaterialParams) {
        self.push(Command::SetMaterial(params.clone()));
    }

    fn new_list(&mut self) -> DisplayListId {
        let id = DisplayListId(self.next_list);
        self.next_list += 1;
        self.live_lists.insert(id);
        id
    }

    fn begin_list(&mut self, id: DisplayListId) {
        debug_assert!(self.live_lists.contains(&id), "unknown display list");
        self.push(Command::BeginList(id));
    }

    fn end_list(&mut self) {
        self.push(Command::EndList);
    }

    fn call_list(&mut self, id: DisplayListId) {
        debug_assert!(self.live_lists.contains(&id), "unknown display list");
        self.push(Command::CallList(id));
    }

    fn delete_list(&mut self, id: DisplayListId) {
        self.live_lists.remove(&id);
        self.push(Command::DeleteList(id));
    }

    fn begin_selection(&mut self, capacity: usize) {
        self.selection_capacity = Some(capacity);
        self.push(Command::BeginSelection(capacity));
    }

    fn init_names(&mut self) {
        self.name_depth = 0;
        self.push(Command::InitNames);
    }

    fn load_name(&mut self, name: u32) {
        debug_assert!(self.name_depth > 0, "load_name on an empty name stack");
        self.push(Command::LoadName(name));
    }

    fn push_name(&mut self, name: u32) {
        self.name_depth += 1;
        self.push(Command::PushName(name));
    }

    fn pop_name(&mut self) {
        debug_assert!(self.name_depth > 0, "name stack underflow");
        self.name_depth = self.name_depth.saturating_sub(1);
        self.push(Command::PopName);
    }

    fn end_selection(&mut self) -> SelectionOutcome {
        self.push(Command::EndSelection);
        // Leaving selection mode discards the name stack, as init_names does.
        self.name_depth = 0;
        let capacity = self.selection_capacity.take().unwrap_or(0);
        let queued = std::mem::take(&mut self.queued_hits);

        let mut hits = Vec::new();
        let mut used = 0;
        let mut truncated = false;
        for hit in queued {
            let words = HIT_HEADER_WORDS + hit.names.len();
            if used + words > capacity {
                truncated = true;
                warn!(
                    "selection buffer overflow: dropping hit with {} names",
                    hit.names.len()
                );
                continue;
            }
            used += words;
            hits.push(hit);
        }

        SelectionOutcome { hits, truncated }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_matrix_depth_per_mode() {
        let mut backend = TraceBackend::new();
        backend.push_matrix();
        backend.push_matrix();
        backend.matrix_mode(MatrixMode::Projection);
        backend.push_matrix();

        assert_eq!(backend.modelview_depth(), 2);
        assert_eq!(backend.projection_depth(), 1);

        backend.pop_matrix();
        backend.matrix_mode(MatrixMode::ModelView);
        backend.pop_matrix();
        backend.pop_matrix();

        assert_eq!(backend.modelview_depth(), 0);
        assert_eq!(backend.projection_depth(), 0);
    }

    #[test]
    fn selection_truncates_at_capacity() {
        let mut backend = TraceBackend::new();
        // Each single-name hit costs four words; capacity nine fits two.
        backend.begin_selection(9);
        backend.queue_hit(&[1], 10, 20);
        backend.queue_hit(&[2], 30, 40);
        backend.queue_hit(&[3], 50, 60);

        let outcome = backend.end_selection();
        assert!(outcome.truncated);
        assert_eq!(outcome.hits.len(), 2);
        assert_eq!(outcome.hits[0].names, vec![1]);
    }

    #[test]
    fn end_selection_discards_the_name_stack() {
        let mut backend = TraceBackend::new();
        backend.begin_selection(64);
        backend.init_names();
        backend.push_name(0);
        backend.load_name(7);
        assert_eq!(backend.name_depth(), 1);

        backend.end_selection();
        assert_eq!(backend.name_depth(), 0);
    }

    #[test]
    fn texture_lifetime_is_visible() {
        let mut backend = TraceBackend::new();
        let id = backend.create_texture();
        assert!(backend.texture_exists(id));
        assert!(!backend.texture_exists(TextureId(999)));
    }
}
