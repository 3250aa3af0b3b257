use glam::Vec3;

use crate::api::types::RenderableId;
use crate::components::material::Material;

/// Geometry of a renderable.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Unit sphere centred on the renderable's position, sized by `scale`.
    Sphere,
    /// Point cloud, offsets relative to the renderable's position.
    Points(Vec<Vec3>),
    /// Open polyline; a closed loop repeats its first point at the end.
    Line(Vec<Vec3>),
}

impl Shape {
    /// Number of vertices this shape contributes to a frame buffer.
    pub fn vertex_count(&self) -> usize {
        match self {
            Shape::Sphere => 0,
            Shape::Points(points) => points.len(),
            Shape::Line(points) => points.len().saturating_sub(1) * 2,
        }
    }
}

/// A drawable object held by the scene.
/// Position and scale are the only per-frame mutable state.
#[derive(Debug, Clone)]
pub struct Renderable {
    pub id: RenderableId,
    pub shape: Shape,
    pub material: Material,
    /// Position in render space.
    pub pos: Vec3,
    /// Uniform scale factor.
    pub scale: f32,
    /// Hidden renderables are skipped by `render_frame`.
    pub visible: bool,
}

impl Renderable {
    pub fn new(id: RenderableId, shape: Shape, material: Material) -> Self {
        Self {
            id,
            shape,
            material,
            pos: Vec3::ZERO,
            scale: 1.0,
            visible: true,
        }
    }

    // -- Builder pattern --

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}
