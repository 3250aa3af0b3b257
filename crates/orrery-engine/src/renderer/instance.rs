use bytemuck::{Pod, Zeroable};

/// Per-sphere render data written to SharedArrayBuffer for the TypeScript renderer.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SphereInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// World-space radius in render units.
    pub radius: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub opacity: f32,
    /// Self-illumination (1.0 = unlit, full color).
    pub emissive: f32,
    pub _pad: [f32; 3],
}

impl SphereInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Colored vertex shared by the line and point sections.
/// 8 floats per vertex (x, y, z, r, g, b, a, size). `size` is 0 for lines.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    pub size: f32,
}

impl ColorVertex {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// One packed frame: everything the browser renderer needs to draw.
pub struct RenderBuffer {
    pub spheres: Vec<SphereInstance>,
    /// Line-list vertices, two per segment.
    pub lines: Vec<ColorVertex>,
    pub points: Vec<ColorVertex>,
    /// Column-major view-projection matrix.
    pub view_projection: [f32; 16],
    /// Vertices that did not fit the configured capacity this frame.
    pub dropped_vertices: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256, 4096, 2048)
    }

    pub fn with_capacity(spheres: usize, lines: usize, points: usize) -> Self {
        Self {
            spheres: Vec::with_capacity(spheres),
            lines: Vec::with_capacity(lines),
            points: Vec::with_capacity(points),
            view_projection: glam::Mat4::IDENTITY.to_cols_array(),
            dropped_vertices: 0,
        }
    }

    pub fn clear(&mut self) {
        self.spheres.clear();
        self.lines.clear();
        self.points.clear();
        self.dropped_vertices = 0;
    }

    pub fn sphere_count(&self) -> u32 {
        self.spheres.len() as u32
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn point_vertex_count(&self) -> u32 {
        self.points.len() as u32
    }

    /// Raw pointers for SharedArrayBuffer reads.
    pub fn spheres_ptr(&self) -> *const f32 {
        self.spheres.as_ptr() as *const f32
    }

    pub fn lines_ptr(&self) -> *const f32 {
        self.lines.as_ptr() as *const f32
    }

    pub fn points_ptr(&self) -> *const f32 {
        self.points.as_ptr() as *const f32
    }

    pub fn view_projection_ptr(&self) -> *const f32 {
        self.view_projection.as_ptr()
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
