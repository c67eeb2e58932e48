//! An ordered set of cameras with one active view.

use log::warn;

use crate::camera::Camera;

/// Holds at least one camera at all times; the active index is always
/// clamped into range.
#[derive(Debug, Clone)]
pub struct Scene {
    cameras: Vec<Camera>,
    active: usize,
}

impl Scene {
    /// Seeds exactly one default camera, active.
    pub fn new() -> Self {
        Self {
            cameras: vec![Camera::default()],
            active: 0,
        }
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn set_active(&mut self, index: usize) {
        self.active = index.min(self.cameras.len() - 1);
    }

    pub fn active_camera(&self) -> &Camera {
        &self.cameras[self.active]
    }

    pub fn active_camera_mut(&mut self) -> &mut Camera {
        &mut self.cameras[self.active]
    }

    pub fn camera_mut(&mut self, index: usize) -> Option<&mut Camera> {
        self.cameras.get_mut(index)
    }

    pub fn add_camera(&mut self, camera: Camera) {
        self.cameras.push(camera);
    }

    /// Removes a camera. Out-of-range indices are a no-op, and the last
    /// remaining camera is never removed (refused, not an error).
    pub fn remove_camera(&mut self, index: usize) {
        if index >= self.cameras.len() {
            return;
        }
        if self.cameras.len() == 1 {
            warn!("refusing to remove the last camera");
            return;
        }
        self.cameras.remove(index);
        if self.active >= self.cameras.len() {
            self.active = self.cameras.len() - 1;
        }
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

    #[test]
    fn starts_with_one_active_camera() {
        let scene = Scene::new();
        assert_eq!(scene.camera_count(), 1);
        assert_eq!(scene.active_index(), 0);
    }

    #[test]
    fn last_camera_is_never_removed() {
        let mut scene = Scene::new();
        scene.remove_camera(0);
        assert_eq!(scene.camera_count(), 1);
    }

    #[test]
    fn out_of_range_removal_is_a_noop() {
        let mut scene = Scene::new();
        scene.add_camera(Camera::default());
        scene.remove_camera(7);
        assert_eq!(scene.camera_count(), 2);
    }

    #[test]
    fn active_index_reclamps_after_removal() {
        let mut scene = Scene::new();
        scene.add_camera(Camera::default());
        scene.add_camera(Camera::default());
        scene.set_active(2);
        scene.remove_camera(2);
        assert_eq!(scene.active_index(), 1);
    }

    #[test]
    fn set_active_clamps_into_range() {
        let mut scene = Scene::new();
        scene.set_active(99);
        assert_eq!(scene.active_index(), 0);
    }
}
