//! Scene container and the per-frame draw pass.
//!
//! The draw pass runs a fixed sequence every frame: clear targets, project
//! the active camera, draw the grid design aid, set the lights, then draw
//! each category in insertion order (custom objects, quadrics, evaluators,
//! camera gizmos, polygons plus their shadow pass) and flush. Per-object
//! matrix discipline is delegated to each drawable's draw scope, so the
//! backend stacks are balanced when the pass returns regardless of how many
//! objects drew or bailed out.

use crate::error::SceneError;
use crate::gfx::backend::{Color, RenderBackend, Viewport};
use crate::gfx::drawable::Drawable;
use crate::gfx::objects::{Camera, Light, Material, Polygon, Quadric};
use crate::gfx::picking::SelectionConfig;

/// Half-width of the design-mode ground grid, in grid cells.
const GRID_EXTENT: i32 = 10;

/// Object category; each category is one ordered collection on the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Quadrics,
    Lights,
    Polygons,
    Evaluators,
    Cameras,
    /// Free-standing custom drawables.
    Objects,
}

/// Addresses one object: its category plus its index within that category's
/// collection. Removing an object shifts the indices of later objects in the
/// same category, so handles are positional, not stable identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    pub category: Category,
    pub index: usize,
}

/// The retained scene: ordered object categories, camera selection and the
/// frame/pick drivers.
pub struct Scene {
    /// Free-standing custom drawables, drawn first among geometry.
    pub objects: Vec<Box<dyn Drawable>>,
    pub lights: Vec<Light>,
    pub quadrics: Vec<Quadric>,
    pub cameras: Vec<Camera>,
    pub polygons: Vec<Polygon>,
    pub materials: Vec<Material>,
    /// Evaluator-style surfaces (tessellated externally).
    pub evaluators: Vec<Box<dyn Drawable>>,
    active_camera: Option<usize>,
    /// Enables authoring aids: the ground grid and light/camera gizmos.
    pub design_mode: bool,
    pub background: Color,
    selection: SelectionConfig,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_selection(SelectionConfig::default())
    }

    /// Creates a scene with an explicit selection-buffer configuration.
    pub fn with_selection(selection: SelectionConfig) -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            quadrics: Vec::new(),
            cameras: Vec::new(),
            polygons: Vec::new(),
            materials: Vec::new(),
            evaluators: Vec::new(),
            active_camera: None,
            design_mode: false,
            background: [0.1, 0.1, 0.1, 1.0],
            selection,
        }
    }

    pub(crate) fn selection(&self) -> &SelectionConfig {
        &self.selection
    }

    /// Populates the light collection with one light per hardware slot, in
    /// slot order. Slot 0 starts enabled as a white default light, matching
    /// fixed-function conventions; the rest start off. Slot assignment never
    /// changes after this call. Does nothing if lights already exist.
    pub fn initialise(&mut self, ctx: &mut dyn RenderBackend) {
        if !self.lights.is_empty() {
            return;
        }
        for slot in 0..ctx.max_lights() {
            let mut light = Light::new(&format!("light{slot}"), slot);
            light.on = slot == 0;
            self.lights.push(light);
        }
    }

    /// Updates the backend viewport and every camera's aspect ratio.
    pub fn resize(&mut self, ctx: &mut dyn RenderBackend, width: u32, height: u32) {
        ctx.set_viewport(Viewport::new(0, 0, width, height));
        let aspect = width as f32 / height.max(1) as f32;
        for camera in &mut self.cameras {
            camera.set_aspect(aspect);
        }
    }

    // --- membership ---

    pub fn add_polygon(&mut self, polygon: Polygon) -> ObjectHandle {
        self.polygons.push(polygon);
        ObjectHandle {
            category: Category::Polygons,
            index: self.polygons.len() - 1,
        }
    }

    pub fn add_quadric(&mut self, quadric: Quadric) -> ObjectHandle {
        self.quadrics.push(quadric);
        ObjectHandle {
            category: Category::Quadrics,
            index: self.quadrics.len() - 1,
        }
    }

    pub fn add_light(&mut self, light: Light) -> ObjectHandle {
        self.lights.push(light);
        ObjectHandle {
            category: Category::Lights,
            index: self.lights.len() - 1,
        }
    }

    pub fn add_camera(&mut self, camera: Camera) -> ObjectHandle {
        self.cameras.push(camera);
        ObjectHandle {
            category: Category::Cameras,
            index: self.cameras.len() - 1,
        }
    }

    pub fn add_object(&mut self, object: Box<dyn Drawable>) -> ObjectHandle {
        self.objects.push(object);
        ObjectHandle {
            category: Category::Objects,
            index: self.objects.len() - 1,
        }
    }

    pub fn add_evaluator(&mut self, evaluator: Box<dyn Drawable>) -> ObjectHandle {
        self.evaluators.push(evaluator);
        ObjectHandle {
            category: Category::Evaluators,
            index: self.evaluators.len() - 1,
        }
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.push(material);
    }

    /// Looks up a material by name.
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Removes the object a handle addresses. Returns false when the handle
    /// is stale. Indices of later objects in the same category shift down.
    pub fn remove(&mut self, handle: ObjectHandle) -> bool {
        let len = self.category_len(handle.category);
        if handle.index >= len {
            return false;
        }
        match handle.category {
            Category::Quadrics => {
                self.quadrics.remove(handle.index);
            }
            Category::Lights => {
                self.lights.remove(handle.index);
            }
            Category::Polygons => {
                self.polygons.remove(handle.index);
            }
            Category::Evaluators => {
                self.evaluators.remove(handle.index);
            }
            Category::Cameras => {
                self.cameras.remove(handle.index);
                // Keep the active selection pointing at the same camera.
                if let Some(active) = self.active_camera {
                    if active == handle.index {
                        self.active_camera = None;
                    } else if active > handle.index {
                        self.active_camera = Some(active - 1);
                    }
                }
            }
            Category::Objects => {
                self.objects.remove(handle.index);
            }
        }
        true
    }

    fn category_len(&self, category: Category) -> usize {
        match category {
            Category::Quadrics => self.quadrics.len(),
            Category::Lights => self.lights.len(),
            Category::Polygons => self.polygons.len(),
            Category::Evaluators => self.evaluators.len(),
            Category::Cameras => self.cameras.len(),
            Category::Objects => self.objects.len(),
        }
    }

    /// Derives a name not yet used by any object, by suffixing a counter.
    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();
        while self.name_in_use(&test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }
        test_name
    }

    fn name_in_use(&self, name: &str) -> bool {
        self.combined_pick_handles()
            .iter()
            .filter_map(|&h| self.pickable(h))
            .any(|d| d.name() == name)
    }

    // --- camera selection ---

    /// Selects the active camera by index into the camera collection.
    pub fn set_active_camera(&mut self, index: usize) -> Result<(), SceneError> {
        if index >= self.cameras.len() {
            return Err(SceneError::UnknownCamera(index));
        }
        self.active_camera = Some(index);
        Ok(())
    }

    pub fn clear_active_camera(&mut self) {
        self.active_camera = None;
    }

    pub fn active_camera(&self) -> Option<&Camera> {
        self.active_camera.and_then(|i| self.cameras.get(i))
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut Camera> {
        self.active_camera.and_then(|i| self.cameras.get_mut(i))
    }

    // --- draw pass ---

    /// Draws one frame.
    ///
    /// Runs the full pass even on an empty scene: targets are cleared to the
    /// background colour and the frame is flushed. Without an active camera
    /// the pass simply draws under whatever matrices are current.
    pub fn draw(&mut self, ctx: &mut dyn RenderBackend) {
        ctx.clear(self.background);

        if let Some(camera) = self.active_camera() {
            camera.project(ctx);
        }

        if self.design_mode {
            draw_grid(ctx);
        }

        // Each light owns a fixed slot, so set order only matters for gizmo
        // stacking, not semantics.
        for light in &self.lights {
            light.set(ctx);
        }
        if self.design_mode {
            for light in &mut self.lights {
                light.draw(ctx);
            }
        }

        for object in &mut self.objects {
            object.draw(ctx);
        }
        for quadric in &mut self.quadrics {
            quadric.draw(ctx);
        }
        for evaluator in &mut self.evaluators {
            evaluator.draw(ctx);
        }

        if self.design_mode {
            let active = self.active_camera;
            for (index, camera) in self.cameras.iter_mut().enumerate() {
                // The active camera never draws its own frustum.
                if Some(index) != active {
                    camera.draw(ctx);
                }
            }
        }

        let Self {
            polygons,
            materials,
            lights,
            ..
        } = self;
        for polygon in polygons.iter_mut() {
            let material = polygon
                .material
                .as_deref()
                .and_then(|name| materials.iter().find(|m| m.name == name));
            if let Some(material) = material {
                material.apply(ctx);
            }
            polygon.draw(ctx);
        }
        for polygon in polygons.iter() {
            polygon.cast_shadow(ctx, lights);
        }

        ctx.flush();
    }

    // --- picking support ---

    /// The canonical combined array of pickable objects.
    ///
    /// Categories concatenate in the fixed order quadrics, lights, polygons,
    /// evaluators, cameras, custom objects. A pick name is the object's index
    /// in this array plus one, so hit resolution depends on reproducing
    /// exactly this order every call.
    pub fn combined_pick_handles(&self) -> Vec<ObjectHandle> {
        let mut handles = Vec::with_capacity(
            self.quadrics.len()
                + self.lights.len()
                + self.polygons.len()
                + self.evaluators.len()
                + self.cameras.len()
                + self.objects.len(),
        );
        let mut extend = |category: Category, len: usize| {
            for index in 0..len {
                handles.push(ObjectHandle { category, index });
            }
        };
        extend(Category::Quadrics, self.quadrics.len());
        extend(Category::Lights, self.lights.len());
        extend(Category::Polygons, self.polygons.len());
        extend(Category::Evaluators, self.evaluators.len());
        extend(Category::Cameras, self.cameras.len());
        extend(Category::Objects, self.objects.len());
        handles
    }

    /// Resolves a handle to its drawable, if still valid.
    pub fn pickable(&self, handle: ObjectHandle) -> Option<&dyn Drawable> {
        match handle.category {
            Category::Quadrics => self
                .quadrics
                .get(handle.index)
                .map(|q| q as &dyn Drawable),
            Category::Lights => self.lights.get(handle.index).map(|l| l as &dyn Drawable),
            Category::Polygons => self
                .polygons
                .get(handle.index)
                .map(|p| p as &dyn Drawable),
            Category::Evaluators => self.evaluators.get(handle.index).map(|e| e.as_ref()),
            Category::Cameras => self.cameras.get(handle.index).map(|c| c as &dyn Drawable),
            Category::Objects => self.objects.get(handle.index).map(|o| o.as_ref()),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Ground-plane grid drawn as a design aid.
fn draw_grid(ctx: &mut dyn RenderBackend) {
    use crate::gfx::backend::PrimitiveMode;

    ctx.color([0.35, 0.35, 0.35, 1.0]);
    ctx.begin(PrimitiveMode::Lines);
    for i in -GRID_EXTENT..=GRID_EXTENT {
        let i = i as f32;
        let extent = GRID_EXTENT as f32;
        ctx.vertex([i, 0.0, -extent]);
        ctx.vertex([i, 0.0, extent]);
        ctx.vertex([-extent, 0.0, i]);
        ctx.vertex([extent, 0.0, i]);
    }
    ctx.end();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::backend::{trace::Command, TraceBackend};
    use crate::gfx::objects::ParticleSystem;

    fn sphere(name: &str) -> Quadric {
        Quadric::sphere(name, 1.0, 8, 4)
    }

    #[test]
    fn empty_scene_still_clears_and_flushes() {
        let mut scene = Scene::new();
        let mut backend = TraceBackend::new();
        scene.draw(&mut backend);

        assert_eq!(backend.count(|c| matches!(c, Command::Clear(_))), 1);
        assert_eq!(backend.count(|c| *c == Command::Flush), 1);
        assert_eq!(backend.modelview_depth(), 0);
        assert_eq!(backend.projection_depth(), 0);
    }

    #[test]
    fn initialise_assigns_one_light_per_slot() {
        let mut scene = Scene::new();
        let mut backend = TraceBackend::new();
        backend.set_max_lights(8);
        scene.initialise(&mut backend);

        assert_eq!(scene.lights.len(), 8);
        for (i, light) in scene.lights.iter().enumerate() {
            assert_eq!(light.slot(), i);
        }
        assert!(scene.lights[0].on);
        assert!(scene.lights[1..].iter().all(|l| !l.on));

        // Toggling never reassigns slots, and initialise is idempotent.
        scene.lights[3].on = true;
        scene.initialise(&mut backend);
        assert_eq!(scene.lights.len(), 8);
        assert_eq!(scene.lights[3].slot(), 3);
    }

    #[test]
    fn combined_pick_order_is_deterministic() {
        let mut scene = Scene::new();
        scene.add_quadric(sphere("q1"));
        scene.add_light(Light::new("l1", 0));
        scene.add_light(Light::new("l2", 1));
        scene.add_polygon(Polygon::unit_quad("p1"));
        scene.add_camera(Camera::new("c1"));
        scene.add_object(Box::new(ParticleSystem::new("s1", 4)));

        let expected = ["q1", "l1", "l2", "p1", "c1", "s1"];
        for _ in 0..3 {
            let names: Vec<&str> = scene
                .combined_pick_handles()
                .iter()
                .map(|&h| scene.pickable(h).unwrap().name())
                .collect();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn draw_pass_is_matrix_balanced() {
        let mut scene = Scene::new();
        let mut backend = TraceBackend::new();
        scene.initialise(&mut backend);
        scene.design_mode = true;
        scene.add_quadric(sphere("ball"));
        scene.add_polygon(Polygon::unit_quad("floor"));
        scene.add_camera(Camera::new("main"));
        scene.add_camera(Camera::new("side"));
        scene.set_active_camera(0).unwrap();
        scene.add_object(Box::new(ParticleSystem::new("sparks", 8)));

        scene.draw(&mut backend);

        assert_eq!(backend.modelview_depth(), 0);
        assert_eq!(backend.projection_depth(), 0);
        assert_eq!(
            backend.count(|c| *c == Command::PushMatrix),
            backend.count(|c| *c == Command::PopMatrix)
        );
    }

    #[test]
    fn single_quad_scenario() {
        let mut scene = Scene::new();
        let mut backend = TraceBackend::new();
        scene.add_camera(Camera::new("main"));
        scene.set_active_camera(0).unwrap();
        scene.add_polygon(Polygon::unit_quad("quad"));

        scene.draw(&mut backend);

        assert_eq!(backend.count(|c| matches!(c, Command::Clear(_))), 1);
        assert_eq!(backend.count(|c| matches!(c, Command::Begin(_))), 1);
        assert_eq!(backend.count(|c| *c == Command::End), 1);
        assert_eq!(backend.count(|c| matches!(c, Command::Vertex(_))), 4);
        // Lights were never initialised, so no slot uploads happen.
        assert_eq!(backend.count(|c| matches!(c, Command::SetLight { .. })), 0);
        assert_eq!(backend.count(|c| matches!(c, Command::DisableLight(_))), 0);
    }

    #[test]
    fn polygon_material_is_applied_before_emission() {
        let mut scene = Scene::new();
        scene.add_material(Material::from_rgb("brass", 0.8, 0.6, 0.2));
        let mut quad = Polygon::unit_quad("quad");
        quad.material = Some("brass".to_string());
        scene.add_polygon(quad);

        let mut backend = TraceBackend::new();
        scene.draw(&mut backend);

        let material_at = backend
            .commands()
            .iter()
            .position(|c| matches!(c, Command::SetMaterial(_)))
            .expect("material applied");
        let vertex_at = backend
            .commands()
            .iter()
            .position(|c| matches!(c, Command::Vertex(_)))
            .expect("geometry emitted");
        assert!(material_at < vertex_at);
    }

    #[test]
    fn removing_the_active_camera_clears_the_selection() {
        let mut scene = Scene::new();
        let main = scene.add_camera(Camera::new("main"));
        scene.add_camera(Camera::new("side"));
        scene.set_active_camera(1).unwrap();

        assert!(scene.remove(main));
        assert_eq!(scene.active_camera().unwrap().name, "side");

        let side = ObjectHandle {
            category: Category::Cameras,
            index: 0,
        };
        assert!(scene.remove(side));
        assert!(scene.active_camera().is_none());
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut scene = Scene::new();
        let handle = scene.add_quadric(sphere("ball"));
        assert!(scene.remove(handle));
        assert!(!scene.remove(handle));
    }

    #[test]
    fn unique_names_get_a_counter_suffix() {
        let mut scene = Scene::new();
        scene.add_polygon(Polygon::unit_quad("quad"));
        assert_eq!(scene.ensure_unique_name("quad"), "quad (1)");
        assert_eq!(scene.ensure_unique_name("other"), "other");
    }

    #[test]
    fn set_active_camera_validates_the_index() {
        let mut scene = Scene::new();
        assert_eq!(
            scene.set_active_camera(0),
            Err(crate::error::SceneError::UnknownCamera(0))
        );
    }
}
