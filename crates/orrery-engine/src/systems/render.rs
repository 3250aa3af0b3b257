use glam::Vec3;

use crate::components::material::Material;
use crate::components::renderable::{Renderable, Shape};
use crate::renderer::camera::Camera3D;
use crate::renderer::instance::{ColorVertex, RenderBuffer, SphereInstance};

/// Per-frame vertex limits for the line and point sections.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimits {
    pub max_line_vertices: usize,
    pub max_point_vertices: usize,
}

fn vertex(p: Vec3, material: &Material, size: f32) -> ColorVertex {
    ColorVertex {
        x: p.x,
        y: p.y,
        z: p.z,
        r: material.color.r,
        g: material.color.g,
        b: material.color.b,
        a: material.opacity,
        size,
    }
}

/// Build the render buffer from a set of renderables.
/// Spheres become instances; polylines are expanded into segment pairs; point
/// clouds are offset by the renderable's transform. Vertices beyond the limits
/// are counted in `dropped_vertices` and skipped.
pub fn build_render_buffer<'a>(
    renderables: impl Iterator<Item = &'a Renderable>,
    camera: &Camera3D,
    limits: FrameLimits,
    buffer: &mut RenderBuffer,
) {
    buffer.clear();
    buffer.view_projection = camera.view_projection().to_cols_array();

    for r in renderables {
        if !r.visible {
            continue;
        }
        let m = &r.material;
        match &r.shape {
            Shape::Sphere => buffer.spheres.push(SphereInstance {
                x: r.pos.x,
                y: r.pos.y,
                z: r.pos.z,
                radius: r.scale,
                r: m.color.r,
                g: m.color.g,
                b: m.color.b,
                opacity: m.opacity,
                emissive: m.emissive,
                _pad: [0.0; 3],
            }),
            Shape::Points(points) => {
                for p in points {
                    if buffer.points.len() >= limits.max_point_vertices {
                        buffer.dropped_vertices += 1;
                        continue;
                    }
                    buffer.points.push(vertex(r.pos + *p * r.scale, m, m.point_size));
                }
            }
            Shape::Line(points) => {
                for seg in points.windows(2) {
                    if buffer.lines.len() + 2 > limits.max_line_vertices {
                        buffer.dropped_vertices += 2;
                        continue;
                    }
                    buffer.lines.push(vertex(r.pos + seg[0] * r.scale, m, 0.0));
                    buffer.lines.push(vertex(r.pos + seg[1] * r.scale, m, 0.0));
                }
            }
        }
    }
}
