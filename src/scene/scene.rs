//! Scene composition: models, cameras, lights and active selections.
//!
//! Entities live in plain owned `Vec`s and are addressed by insertion index,
//! which doubles as the UI's selection handle. Active-selection setters are
//! bounds-checked and keep the previous selection on an invalid index. The
//! scene-level scale/rotation/translation compose a parent world transform
//! applied to every object; like the per-model transforms it is cached and
//! recomputed only by the explicit [`Scene::update`] pass at the start of a
//! frame.

use cgmath::{Matrix4, SquareMatrix, Vector3, Zero};

use crate::math::compose_transform;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::mesh::MeshModel;

pub struct Scene {
    models: Vec<MeshModel>,
    cameras: Vec<Camera>,
    lights: Vec<Light>,

    active_model: usize,
    active_camera: usize,
    active_light: usize,

    pub scale: Vector3<f32>,
    /// Euler angles in degrees.
    pub rotation: Vector3<f32>,
    pub translation: Vector3<f32>,
    world_transform: Matrix4<f32>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            cameras: Vec::new(),
            lights: Vec::new(),
            active_model: 0,
            active_camera: 0,
            active_light: 0,
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::zero(),
            translation: Vector3::zero(),
            world_transform: Matrix4::identity(),
        }
    }

    /// Adds a model, makes it the active one and returns its index. The
    /// name is made unique among models first.
    pub fn add_model(&mut self, mut model: MeshModel) -> usize {
        let name = self.ensure_unique_name(model.name());
        model.set_name(name);
        self.active_model = self.models.len();
        self.models.push(model);
        self.active_model
    }

    /// Adds a camera and makes it the active one.
    pub fn add_camera(&mut self, mut camera: Camera) -> usize {
        self.active_camera = self.cameras.len();
        camera
            .proxy_mut()
            .set_name(format!("camera{}", self.active_camera));
        self.cameras.push(camera);
        self.active_camera
    }

    /// Adds a light and makes it the active one.
    pub fn add_light(&mut self, mut light: Light) -> usize {
        self.active_light = self.lights.len();
        light
            .proxy_mut()
            .set_name(format!("light{}", self.active_light));
        self.lights.push(light);
        self.active_light
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn models(&self) -> &[MeshModel] {
        &self.models
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn model(&self, index: usize) -> Option<&MeshModel> {
        self.models.get(index)
    }

    pub fn model_mut(&mut self, index: usize) -> Option<&mut MeshModel> {
        self.models.get_mut(index)
    }

    pub fn camera(&self, index: usize) -> Option<&Camera> {
        self.cameras.get(index)
    }

    pub fn camera_mut(&mut self, index: usize) -> Option<&mut Camera> {
        self.cameras.get_mut(index)
    }

    pub fn light(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    /// Selects the active model; out-of-range indices leave the previous
    /// selection unchanged.
    pub fn set_active_model_index(&mut self, index: usize) {
        if index < self.models.len() {
            self.active_model = index;
        }
    }

    pub fn active_model_index(&self) -> usize {
        self.active_model
    }

    pub fn set_active_camera_index(&mut self, index: usize) {
        if index < self.cameras.len() {
            self.active_camera = index;
        }
    }

    pub fn active_camera_index(&self) -> usize {
        self.active_camera
    }

    pub fn set_active_light_index(&mut self, index: usize) {
        if index < self.lights.len() {
            self.active_light = index;
        }
    }

    pub fn active_light_index(&self) -> usize {
        self.active_light
    }

    pub fn active_model(&self) -> Option<&MeshModel> {
        self.models.get(self.active_model)
    }

    pub fn active_model_mut(&mut self) -> Option<&mut MeshModel> {
        self.models.get_mut(self.active_model)
    }

    pub fn active_camera(&self) -> Option<&Camera> {
        self.cameras.get(self.active_camera)
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut Camera> {
        self.cameras.get_mut(self.active_camera)
    }

    pub fn active_light(&self) -> Option<&Light> {
        self.lights.get(self.active_light)
    }

    pub fn active_light_mut(&mut self) -> Option<&mut Light> {
        self.lights.get_mut(self.active_light)
    }

    /// The scene-level parent transform, as last recomputed by
    /// [`Self::update`].
    pub fn world_transform(&self) -> Matrix4<f32> {
        self.world_transform
    }

    /// Per-frame update pass: recomputes the scene world transform, every
    /// entity's cached world transform, camera matrices and light
    /// locations. Must run before the renderer reads the scene.
    pub fn update(&mut self) {
        self.world_transform = compose_transform(self.scale, self.rotation, self.translation);

        for model in &mut self.models {
            model.update_world_transform();
        }
        for camera in &mut self.cameras {
            camera.refresh();
        }
        let parent = self.world_transform;
        for light in &mut self.lights {
            light.proxy_mut().update_world_transform();
            light.refresh_location(parent);
        }
    }

    fn ensure_unique_name(&self, desired: &str) -> String {
        let mut counter = 0;
        let mut candidate = desired.to_string();
        while self.models.iter().any(|m| m.name() == candidate) {
            counter += 1;
            candidate = format!("{} ({})", desired, counter);
        }
        candidate
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::unit_cube;

    fn scene_with_two_cameras() -> Scene {
        let mut scene = Scene::new();
        let eye = Vector3::new(0.0, 0.0, 5.0);
        let origin = Vector3::zero();
        let up = Vector3::new(0.0, 1.0, 0.0);
        scene.add_camera(Camera::new(eye, origin, up));
        scene.add_camera(Camera::new(eye * 2.0, origin, up));
        scene
    }

    #[test]
    fn test_add_makes_entity_active() {
        let mut scene = Scene::new();
        assert_eq!(scene.add_model(unit_cube("a")), 0);
        assert_eq!(scene.add_model(unit_cube("b")), 1);
        assert_eq!(scene.active_model_index(), 1);
    }

    #[test]
    fn test_out_of_range_selection_is_noop() {
        let mut scene = scene_with_two_cameras();
        scene.set_active_camera_index(1);
        scene.set_active_camera_index(17);
        assert_eq!(scene.active_camera_index(), 1);

        scene.set_active_model_index(0); // no models at all
        assert_eq!(scene.active_model_index(), 0);
        assert!(scene.active_model().is_none());
    }

    #[test]
    fn test_duplicate_model_names_get_suffixes() {
        let mut scene = Scene::new();
        scene.add_model(unit_cube("cube"));
        scene.add_model(unit_cube("cube"));
        assert_eq!(scene.model(1).unwrap().name(), "cube (1)");
    }

    #[test]
    fn test_update_recomputes_scene_world_transform() {
        let mut scene = Scene::new();
        scene.translation = Vector3::new(0.0, 3.0, 0.0);
        assert_eq!(scene.world_transform(), Matrix4::identity());
        scene.update();
        assert_eq!(scene.world_transform().w.y, 3.0);
    }

    #[test]
    fn test_update_refreshes_model_transforms_and_lights() {
        let mut scene = Scene::new();
        let idx = scene.add_model(unit_cube("cube"));
        scene.model_mut(idx).unwrap().translation = Vector3::new(1.0, 0.0, 0.0);

        let light_idx = scene.add_light(Light::new());
        scene.light_mut(light_idx).unwrap().proxy_mut().translation =
            Vector3::new(0.0, 4.0, 0.0);

        scene.update();
        assert_eq!(scene.model(idx).unwrap().world_transform().w.x, 1.0);
        let loc = scene.light(light_idx).unwrap().location();
        assert!((loc.y - 4.0).abs() < 1e-5);
    }
}
