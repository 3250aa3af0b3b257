use serde::{Deserialize, Serialize};

use crate::api::types::GameEvent;
use crate::core::scene::Scene;
use crate::error::EngineResult;
use crate::input::queue::InputQueue;
use crate::renderer::camera::Camera3D;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Maximum number of live renderables in the scene (default: 256).
    pub max_renderables: usize,
    /// Maximum number of line-segment vertices per frame (default: 4096).
    pub max_line_vertices: usize,
    /// Maximum number of point-cloud vertices per frame (default: 2048).
    pub max_point_vertices: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_renderables: 256,
            max_line_vertices: 4096,
            max_point_vertices: 2048,
            max_events: 32,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Apply a JSON configuration document. Called before init, if at all.
    fn configure(&mut self, _json: &str) -> EngineResult<()> {
        Ok(())
    }

    /// Build the scene. An error here is fatal: the runner never ticks.
    fn init(&mut self, ctx: &mut EngineContext) -> EngineResult<()>;

    /// One display frame. Called exactly once per `GameRunner::tick`.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Read-only state for the UI layer, serialized as JSON.
    fn snapshot_json(&self) -> Option<String> {
        None
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub camera: Camera3D,
    pub events: Vec<GameEvent>,
    max_events: usize,
    frame: u64,
    now_ms: f64,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::with_config(config),
            camera: Camera3D::default(),
            events: Vec::with_capacity(config.max_events),
            max_events: config.max_events,
            frame: 0,
            now_ms: 0.0,
        }
    }

    /// Display frames started so far. Advances even while a game is paused.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Wall-clock time of the current frame in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Start a new display frame: bump the counter, latch the clock,
    /// and clear last frame's events.
    pub fn begin_frame(&mut self, now_ms: f64) {
        self.frame += 1;
        self.now_ms = now_ms;
        self.events.clear();
    }

    /// Emit a game event to be forwarded to TypeScript.
    /// Events past the configured capacity are dropped.
    pub fn emit_event(&mut self, event: GameEvent) {
        if self.events.len() >= self.max_events {
            log::warn!("event buffer full ({}), dropping kind {}", self.max_events, event.kind);
            return;
        }
        self.events.push(event);
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_frame_advances_and_clears() {
        let mut ctx = EngineContext::new();
        ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        ctx.begin_frame(16.0);
        assert_eq!(ctx.frame(), 1);
        assert_eq!(ctx.now_ms(), 16.0);
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn events_past_capacity_are_dropped() {
        let config = GameConfig { max_events: 2, ..GameConfig::default() };
        let mut ctx = EngineContext::with_config(&config);
        for i in 0..5 {
            ctx.emit_event(GameEvent::new(i as f32, 0.0, 0.0, 0.0));
        }
        assert_eq!(ctx.events.len(), 2);
    }

    #[test]
    fn config_from_partial_json_keeps_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{ "max_events": 8 }"#).unwrap();
        assert_eq!(config.max_events, 8);
        assert_eq!(config.max_renderables, GameConfig::default().max_renderables);
    }
}
