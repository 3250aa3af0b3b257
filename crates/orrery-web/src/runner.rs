use orrery_engine::{
    EngineContext, EngineError, EngineResult, Game, GameConfig, InputEvent, InputQueue,
    ProtocolLayout, RenderBackend,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export generic
/// structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    config: GameConfig,
    layout: ProtocolLayout,
    initialized: bool,
    init_error: Option<String>,
    /// Contiguous copy of the last frame in `ProtocolLayout` order.
    frame_data: Vec<f32>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            game,
            ctx: EngineContext::with_config(&config),
            input: InputQueue::new(),
            frame_data: vec![0.0; layout.buffer_total_floats],
            layout,
            config,
            initialized: false,
            init_error: None,
        }
    }

    /// Hand a JSON configuration document to the game. Only valid before init.
    pub fn load_config(&mut self, json: &str) -> EngineResult<()> {
        if self.initialized {
            return Err(EngineError::Init("configuration must be loaded before init".to_string()));
        }
        self.game.configure(json)
    }

    /// Initialize the game. Call once after construction (and optional config).
    /// A failure is recorded and the runner never ticks.
    pub fn init(&mut self) -> EngineResult<()> {
        self.config = self.game.config();
        self.layout = ProtocolLayout::from_config(&self.config);
        self.frame_data = vec![0.0; self.layout.buffer_total_floats];
        self.ctx = EngineContext::with_config(&self.config);

        match self.game.init(&mut self.ctx) {
            Ok(()) => {
                self.initialized = true;
                self.init_error = None;
                Ok(())
            }
            Err(e) => {
                log::error!("init failed: {e}");
                self.init_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one display frame: update the game once, drain input, pack the frame.
    pub fn tick(&mut self, now_ms: f64) -> EngineResult<()> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }

        self.ctx.begin_frame(now_ms);
        self.game.update(&mut self.ctx, &self.input);

        // Drain input after update
        self.input.drain();

        self.ctx.scene.render_frame(&self.ctx.camera);
        self.layout.write_frame(
            &mut self.frame_data,
            self.ctx.frame(),
            self.ctx.scene.buffer(),
            &self.ctx.events,
        );
        Ok(())
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn init_failed(&self) -> bool {
        self.init_error.is_some()
    }

    pub fn init_error(&self) -> Option<&str> {
        self.init_error.as_deref()
    }

    pub fn snapshot_json(&self) -> Option<String> {
        self.game.snapshot_json()
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn frame_data_ptr(&self) -> *const f32 {
        self.frame_data.as_ptr()
    }

    pub fn spheres_ptr(&self) -> *const f32 {
        self.ctx.scene.buffer().spheres_ptr()
    }

    pub fn sphere_count(&self) -> u32 {
        self.ctx.scene.buffer().sphere_count()
    }

    pub fn line_vertices_ptr(&self) -> *const f32 {
        self.ctx.scene.buffer().lines_ptr()
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.ctx.scene.buffer().line_vertex_count()
    }

    pub fn point_vertices_ptr(&self) -> *const f32 {
        self.ctx.scene.buffer().points_ptr()
    }

    pub fn point_vertex_count(&self) -> u32 {
        self.ctx.scene.buffer().point_vertex_count()
    }

    pub fn view_projection_ptr(&self) -> *const f32 {
        self.ctx.scene.buffer().view_projection_ptr()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_spheres(&self) -> u32 {
        self.layout.max_spheres as u32
    }

    pub fn max_line_vertices(&self) -> u32 {
        self.layout.max_line_vertices as u32
    }

    pub fn max_point_vertices(&self) -> u32 {
        self.layout.max_point_vertices as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
