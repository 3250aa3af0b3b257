use glam::{Vec2, Vec3};

use crate::api::game::GameConfig;
use crate::api::types::RenderableId;
use crate::components::material::Material;
use crate::components::renderable::{Renderable, Shape};
use crate::error::{EngineError, EngineResult};
use crate::renderer::camera::Camera3D;
use crate::renderer::instance::RenderBuffer;
use crate::renderer::traits::{RayHit, RenderBackend};
use crate::systems::render::{build_render_buffer, FrameLimits};

/// Simple renderable storage using a flat Vec.
/// Designed for small-to-medium counts (hundreds, not millions).
pub struct Scene {
    renderables: Vec<Renderable>,
    next_id: u32,
    max_renderables: usize,
    limits: FrameLimits,
    buffer: RenderBuffer,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    /// Create a scene sized from the game's capacity limits.
    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            renderables: Vec::with_capacity(config.max_renderables),
            next_id: 1,
            max_renderables: config.max_renderables,
            limits: FrameLimits {
                max_line_vertices: config.max_line_vertices,
                max_point_vertices: config.max_point_vertices,
            },
            buffer: RenderBuffer::with_capacity(
                config.max_renderables,
                config.max_line_vertices,
                config.max_point_vertices,
            ),
        }
    }

    pub fn get(&self, id: RenderableId) -> Option<&Renderable> {
        self.renderables.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: RenderableId) -> Option<&mut Renderable> {
        self.renderables.iter_mut().find(|r| r.id == id)
    }

    fn require_mut(&mut self, id: RenderableId) -> EngineResult<&mut Renderable> {
        self.get_mut(id).ok_or(EngineError::MissingRenderable(id))
    }

    /// Show or hide a renderable without releasing it.
    pub fn set_visible(&mut self, id: RenderableId, visible: bool) -> EngineResult<()> {
        self.require_mut(id)?.visible = visible;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Renderable> {
        self.renderables.iter()
    }

    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }

    /// The most recently packed frame.
    pub fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }
}

impl RenderBackend for Scene {
    fn create_renderable(&mut self, shape: Shape, material: Material) -> EngineResult<RenderableId> {
        if self.renderables.len() >= self.max_renderables {
            return Err(EngineError::CapacityExceeded {
                what: "renderables",
                limit: self.max_renderables,
            });
        }
        let id = RenderableId(self.next_id);
        self.next_id += 1;
        self.renderables.push(Renderable::new(id, shape, material));
        Ok(id)
    }

    fn set_position(&mut self, id: RenderableId, pos: Vec3) -> EngineResult<()> {
        self.require_mut(id)?.pos = pos;
        Ok(())
    }

    fn set_scale(&mut self, id: RenderableId, scale: f32) -> EngineResult<()> {
        self.require_mut(id)?.scale = scale;
        Ok(())
    }

    fn remove_renderable(&mut self, id: RenderableId) -> EngineResult<()> {
        let idx = self
            .renderables
            .iter()
            .position(|r| r.id == id)
            .ok_or(EngineError::MissingRenderable(id))?;
        self.renderables.swap_remove(idx);
        Ok(())
    }

    fn cast_ray(&self, camera: &Camera3D, ndc: Vec2, candidates: &[RenderableId]) -> Option<RayHit> {
        let ray = camera.ray_from_ndc(ndc);
        self.renderables
            .iter()
            .filter(|r| r.visible && matches!(r.shape, Shape::Sphere) && candidates.contains(&r.id))
            .filter_map(|r| {
                ray.intersect_sphere(r.pos, r.scale)
                    .map(|distance| RayHit { id: r.id, distance })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn render_frame(&mut self, camera: &Camera3D) {
        build_render_buffer(self.renderables.iter(), camera, self.limits, &mut self.buffer);
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

    fn head_on_camera() -> Camera3D {
        let mut cam = Camera3D::new(60.0, 1.0, 0.1, 1000.0);
        cam.position = Vec3::new(0.0, 0.0, 20.0);
        cam.target = Vec3::ZERO;
        cam
    }

    fn sphere_at(scene: &mut Scene, pos: Vec3, radius: f32) -> RenderableId {
        let id = scene.create_renderable(Shape::Sphere, Material::default()).unwrap();
        scene.set_position(id, pos).unwrap();
        scene.set_scale(id, radius).unwrap();
        id
    }

    #[test]
    fn create_and_transform() {
        let mut scene = Scene::new();
        let id = sphere_at(&mut scene, Vec3::new(1.0, 2.0, 3.0), 4.0);
        let r = scene.get(id).unwrap();
        assert_eq!(r.pos, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(r.scale, 4.0);
    }

    #[test]
    fn remove_releases_renderable() {
        let mut scene = Scene::new();
        let id = scene.create_renderable(Shape::Line(vec![Vec3::ZERO, Vec3::X]), Material::default()).unwrap();
        assert_eq!(scene.len(), 1);
        scene.remove_renderable(id).unwrap();
        assert!(scene.is_empty());
        assert!(matches!(scene.remove_renderable(id), Err(EngineError::MissingRenderable(_))));
        assert!(scene.set_position(id, Vec3::ONE).is_err());
    }

    #[test]
    fn capacity_is_enforced() {
        let config = GameConfig { max_renderables: 2, ..GameConfig::default() };
        let mut scene = Scene::with_config(&config);
        scene.create_renderable(Shape::Sphere, Material::default()).unwrap();
        scene.create_renderable(Shape::Sphere, Material::default()).unwrap();
        let err = scene.create_renderable(Shape::Sphere, Material::default()).unwrap_err();
        assert!(matches!(err, EngineError::CapacityExceeded { limit: 2, .. }));
    }

    #[test]
    fn ray_miss_is_none() {
        let mut scene = Scene::new();
        let id = sphere_at(&mut scene, Vec3::new(15.0, 0.0, 0.0), 1.0);
        assert!(scene.cast_ray(&head_on_camera(), Vec2::ZERO, &[id]).is_none());
    }

    #[test]
    fn ray_picks_nearest_of_many() {
        let mut scene = Scene::new();
        let far = sphere_at(&mut scene, Vec3::new(0.0, 0.0, -5.0), 1.0);
        let near = sphere_at(&mut scene, Vec3::new(0.0, 0.0, 5.0), 1.0);
        let hit = scene.cast_ray(&head_on_camera(), Vec2::ZERO, &[far, near]).unwrap();
        assert_eq!(hit.id, near);
        assert!((hit.distance - 14.0).abs() < 1e-4);
    }

    #[test]
    fn ray_ignores_non_candidates() {
        let mut scene = Scene::new();
        let shell = sphere_at(&mut scene, Vec3::ZERO, 3.0);
        let core = sphere_at(&mut scene, Vec3::ZERO, 2.0);
        let hit = scene.cast_ray(&head_on_camera(), Vec2::ZERO, &[core]).unwrap();
        assert_eq!(hit.id, core);
        assert_ne!(hit.id, shell);
    }

    #[test]
    fn render_frame_packs_visible_renderables() {
        let mut scene = Scene::new();
        let a = sphere_at(&mut scene, Vec3::ZERO, 1.0);
        sphere_at(&mut scene, Vec3::X, 1.0);
        scene.set_visible(a, false).unwrap();
        scene.render_frame(&head_on_camera());
        assert_eq!(scene.buffer().sphere_count(), 1);
    }
}
