pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod extensions;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{RenderableId, GameEvent};
pub use components::material::{Color, Material};
pub use components::renderable::{Renderable, Shape};
pub use core::rng::Rng;
pub use core::scene::Scene;
pub use core::time::{Debounce, Throttle};
pub use error::{EngineError, EngineResult};
pub use renderer::camera::{Camera3D, Ray};
pub use renderer::instance::{ColorVertex, RenderBuffer, SphereInstance};
pub use renderer::traits::{RayHit, RenderBackend};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;

// Extensions — decoupled optional systems
pub use extensions::{CameraTransition, Easing, TransitionState, ease_vec3, lerp, lerp_vec3};
