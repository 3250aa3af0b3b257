//! The rendering-collaborator contract.
//!
//! Games only ever talk to the renderer through these operations. `Scene`
//! is the in-process implementation that packs frames for the browser.

use glam::{Vec2, Vec3};

use super::camera::Camera3D;
use crate::api::types::RenderableId;
use crate::components::material::Material;
use crate::components::renderable::Shape;
use crate::error::EngineResult;

/// Nearest intersection found by `cast_ray`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub id: RenderableId,
    /// Distance along the ray, in render units.
    pub distance: f32,
}

pub trait RenderBackend {
    /// Create a renderable at the origin with unit scale.
    fn create_renderable(&mut self, shape: Shape, material: Material) -> EngineResult<RenderableId>;

    fn set_position(&mut self, id: RenderableId, pos: Vec3) -> EngineResult<()>;

    fn set_scale(&mut self, id: RenderableId, scale: f32) -> EngineResult<()>;

    /// Release a renderable and its geometry.
    fn remove_renderable(&mut self, id: RenderableId) -> EngineResult<()>;

    /// Cast a ray from `camera` through `ndc` and return the nearest sphere hit
    /// among `candidates`. A miss is `None`.
    fn cast_ray(&self, camera: &Camera3D, ndc: Vec2, candidates: &[RenderableId]) -> Option<RayHit>;

    /// Pack the current state into the frame buffer.
    fn render_frame(&mut self, camera: &Camera3D);
}
