/// SharedArrayBuffer layout.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Spheres: max_spheres × 12 floats]
/// [Lines: max_line_vertices × 8 floats]
/// [Points: max_point_vertices × 8 floats]
/// [Events: max_events × 4 floats]
/// [Camera: 16 floats, column-major view-projection]
/// ```
///
/// Capacities are written once into the header at init.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::renderer::instance::{ColorVertex, RenderBuffer, SphereInstance};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_SPHERES: usize = 2;
pub const HEADER_SPHERE_COUNT: usize = 3;
pub const HEADER_MAX_LINE_VERTICES: usize = 4;
pub const HEADER_LINE_VERTEX_COUNT: usize = 5;
pub const HEADER_MAX_POINT_VERTICES: usize = 6;
pub const HEADER_POINT_VERTEX_COUNT: usize = 7;
pub const HEADER_MAX_EVENTS: usize = 8;
pub const HEADER_EVENT_COUNT: usize = 9;
pub const HEADER_PROTOCOL_VERSION: usize = 10;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per sphere instance (wire format — never changes).
pub const SPHERE_FLOATS: usize = SphereInstance::FLOATS;

/// Floats per line or point vertex: x, y, z, r, g, b, a, size.
pub const VERTEX_FLOATS: usize = ColorVertex::FLOATS;

/// Floats per game event: kind, a, b, c.
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Floats in the camera matrix section.
pub const CAMERA_FLOATS: usize = 16;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_spheres: usize,
    pub max_line_vertices: usize,
    pub max_point_vertices: usize,
    pub max_events: usize,

    pub sphere_data_offset: usize,
    pub line_data_offset: usize,
    pub point_data_offset: usize,
    pub event_data_offset: usize,
    pub camera_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(
        max_spheres: usize,
        max_line_vertices: usize,
        max_point_vertices: usize,
        max_events: usize,
    ) -> Self {
        let sphere_data_offset = HEADER_FLOATS;
        let line_data_offset = sphere_data_offset + max_spheres * SPHERE_FLOATS;
        let point_data_offset = line_data_offset + max_line_vertices * VERTEX_FLOATS;
        let event_data_offset = point_data_offset + max_point_vertices * VERTEX_FLOATS;
        let camera_data_offset = event_data_offset + max_events * EVENT_FLOATS;
        let buffer_total_floats = camera_data_offset + CAMERA_FLOATS;

        Self {
            max_spheres,
            max_line_vertices,
            max_point_vertices,
            max_events,
            sphere_data_offset,
            line_data_offset,
            point_data_offset,
            event_data_offset,
            camera_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig. Every renderable may be a sphere.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.max_renderables,
            config.max_line_vertices,
            config.max_point_vertices,
            config.max_events,
        )
    }

    /// Copy one frame into a shared buffer of `buffer_total_floats` floats.
    /// Sections are truncated to their capacity. The lock flag is left to the caller.
    pub fn write_frame(&self, out: &mut [f32], frame: u64, buffer: &RenderBuffer, events: &[GameEvent]) {
        if out.len() < self.buffer_total_floats {
            return;
        }
        let spheres = &buffer.spheres[..buffer.spheres.len().min(self.max_spheres)];
        let lines = &buffer.lines[..buffer.lines.len().min(self.max_line_vertices)];
        let points = &buffer.points[..buffer.points.len().min(self.max_point_vertices)];
        let events = &events[..events.len().min(self.max_events)];

        out[HEADER_FRAME_COUNTER] = frame as f32;
        out[HEADER_MAX_SPHERES] = self.max_spheres as f32;
        out[HEADER_SPHERE_COUNT] = spheres.len() as f32;
        out[HEADER_MAX_LINE_VERTICES] = self.max_line_vertices as f32;
        out[HEADER_LINE_VERTEX_COUNT] = lines.len() as f32;
        out[HEADER_MAX_POINT_VERTICES] = self.max_point_vertices as f32;
        out[HEADER_POINT_VERTEX_COUNT] = points.len() as f32;
        out[HEADER_MAX_EVENTS] = self.max_events as f32;
        out[HEADER_EVENT_COUNT] = events.len() as f32;
        out[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;

        copy_section(out, self.sphere_data_offset, bytemuck::cast_slice(spheres));
        copy_section(out, self.line_data_offset, bytemuck::cast_slice(lines));
        copy_section(out, self.point_data_offset, bytemuck::cast_slice(points));
        copy_section(out, self.event_data_offset, bytemuck::cast_slice(events));
        copy_section(out, self.camera_data_offset, &buffer.view_projection);
    }
}

fn copy_section(out: &mut [f32], offset: usize, data: &[f32]) {
    out[offset..offset + data.len()].copy_from_slice(data);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&GameConfig::default());
        assert_eq!(layout.max_spheres, 256);
        assert_eq!(layout.sphere_data_offset, 16);
        assert_eq!(layout.line_data_offset, 16 + 256 * 12);
        assert_eq!(layout.point_data_offset, 16 + 256 * 12 + 4096 * 8);
        assert_eq!(layout.event_data_offset, 16 + 256 * 12 + 4096 * 8 + 2048 * 8);
        assert_eq!(layout.camera_data_offset, layout.event_data_offset + 32 * 4);
        assert_eq!(layout.buffer_total_floats, layout.camera_data_offset + 16);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(10, 20, 30, 4);
        assert_eq!(layout.line_data_offset - layout.sphere_data_offset, 10 * SPHERE_FLOATS);
        assert_eq!(layout.point_data_offset - layout.line_data_offset, 20 * VERTEX_FLOATS);
        assert_eq!(layout.event_data_offset - layout.point_data_offset, 30 * VERTEX_FLOATS);
        assert_eq!(layout.camera_data_offset - layout.event_data_offset, 4 * EVENT_FLOATS);
    }

    #[test]
    fn write_frame_fills_header_and_sections() {
        let layout = ProtocolLayout::new(2, 4, 4, 2);
        let mut out = vec![0.0f32; layout.buffer_total_floats];

        let mut buffer = RenderBuffer::new();
        for i in 0..3 {
            buffer.spheres.push(SphereInstance { x: i as f32, radius: 1.0, ..Default::default() });
        }
        let events = [GameEvent::new(9.0, 1.0, 2.0, 3.0)];
        layout.write_frame(&mut out, 5, &buffer, &events);

        assert_eq!(out[HEADER_FRAME_COUNTER], 5.0);
        // Truncated to capacity.
        assert_eq!(out[HEADER_SPHERE_COUNT], 2.0);
        assert_eq!(out[layout.sphere_data_offset + SPHERE_FLOATS], 1.0);
        assert_eq!(out[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(out[layout.event_data_offset], 9.0);
        // Identity matrix from a fresh buffer.
        assert_eq!(out[layout.camera_data_offset], 1.0);
        assert_eq!(out[layout.camera_data_offset + 5], 1.0);
    }

    #[test]
    fn short_output_is_left_untouched() {
        let layout = ProtocolLayout::new(2, 4, 4, 2);
        let mut out = vec![0.0f32; 8];
        layout.write_frame(&mut out, 1, &RenderBuffer::new(), &[]);
        assert!(out.iter().all(|v| *v == 0.0));
    }
}
