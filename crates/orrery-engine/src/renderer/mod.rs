pub mod instance;
pub mod camera;
pub mod traits;

// Re-export key types for convenient access
pub use camera::{Camera3D, CameraUniform, Ray};
pub use instance::{ColorVertex, RenderBuffer, SphereInstance};
pub use traits::{RayHit, RenderBackend};
