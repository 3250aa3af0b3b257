/// Solar System Explorer — 3D orrery with compressed and realistic scale modes.
///
/// Input: drag to orbit the camera, wheel to zoom, click to focus a body.
/// Keyboard and page buttons drive the clock, scale mode and overlays.

use glam::{Vec2, Vec3};
use orrery_engine::api::game::GameConfig;
use orrery_engine::{
    Camera3D, Debounce, EngineContext, EngineError, EngineResult, Game, GameEvent, InputEvent,
    InputQueue, Rng,
};

use crate::catalog::Catalog;
use crate::config::ExplorerConfig;
use crate::controls::CameraRig;
use crate::orrery::{HoverLabel, Orrery};
use crate::scale::ScaleMode;
use crate::selection::{pick, pointer_to_ndc, HoverPicker, Selection};

// ── Custom event kinds from the page ────────────────────────────────

const CUSTOM_TOGGLE_PLAY: u32 = 1;
const CUSTOM_SWITCH_SCALE: u32 = 2;
/// a = speed multiplier.
const CUSTOM_SET_SPEED: u32 = 3;
/// a = body index, b = moon index or -1.
const CUSTOM_SELECT: u32 = 4;
const CUSTOM_DESELECT: u32 = 5;
const CUSTOM_RESET_CAMERA: u32 = 6;
const CUSTOM_TOGGLE_LABELS: u32 = 7;
const CUSTOM_TOGGLE_TRAILS: u32 = 8;

// ── Game event kinds to the page ────────────────────────────────────

/// a = ticks, b = speed, c = playing.
const EVENT_CLOCK: f32 = 1.0;
/// a = realistic, b = labels visible, c = trails visible.
const EVENT_MODE: f32 = 2.0;
/// a = body index or -1, b = moon index or -1.
const EVENT_SELECTION: f32 = 3.0;
/// a = visible, b/c = label position in CSS pixels.
const EVENT_HOVER: f32 = 4.0;

// ── Keyboard ────────────────────────────────────────────────────────

const KEY_SPACE: u32 = 32;
const KEY_ESCAPE: u32 = 27;
const KEY_L: u32 = 76;
const KEY_R: u32 = 82;
const KEY_S: u32 = 83;
const KEY_T: u32 = 84;

/// Hover label offset from the cursor.
const LABEL_OFFSET: f32 = 10.0;

// ── Capacity ────────────────────────────────────────────────────────

const MAX_ORBIT_PATHS: usize = 16;
const MAX_BELT_PARTICLES: usize = 1024;

fn flag(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

/// Everything that exists only after a successful init.
struct Session {
    orrery: Orrery,
    rig: CameraRig,
    hover: HoverPicker,
    hover_label: Option<HoverLabel>,
    /// Latest pointer position not yet hover-picked this frame.
    pending_hover: Option<Vec2>,
    /// Latest canvas size, used immediately for pointer mapping.
    viewport: Option<Vec2>,
    /// Camera aspect updates wait for the resize burst to settle.
    resize: Debounce<Vec2>,
}

impl Session {
    fn new(orrery: Orrery, config: &ExplorerConfig) -> Self {
        Self {
            orrery,
            rig: CameraRig::new(config),
            hover: HoverPicker::new(config.hover_throttle_ms),
            hover_label: None,
            pending_hover: None,
            viewport: None,
            resize: Debounce::new(config.resize_debounce_ms),
        }
    }

    fn ndc(&self, x: f32, y: f32) -> Option<Vec2> {
        let size = self.viewport?;
        (size.x > 0.0 && size.y > 0.0).then(|| pointer_to_ndc(x, y, size.x, size.y))
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::PointerDown { x, y } => self.rig.pointer_down(x, y),
                InputEvent::PointerMove { x, y } => {
                    self.rig.pointer_move(x, y, &mut ctx.camera);
                    if !self.rig.is_pressed() {
                        self.pending_hover = Some(Vec2::new(x, y));
                    }
                }
                InputEvent::PointerUp { x, y } => {
                    if let Some(click) = self.rig.pointer_up(x, y) {
                        self.click(ctx, click);
                    }
                }
                InputEvent::Wheel { delta } => {
                    self.rig.wheel(delta, self.orrery.clock().mode, &mut ctx.camera);
                }
                InputEvent::KeyDown { key_code } => self.key(ctx, key_code),
                InputEvent::Resize { width, height } => self.resize(ctx, Vec2::new(width, height)),
                InputEvent::Custom { kind, a, b, .. } => self.custom(ctx, kind, a, b),
            }
        }

        if let Some(size) = self.resize.poll(ctx.now_ms()) {
            ctx.camera.set_viewport(size.x, size.y);
            log::debug!("viewport {}x{}", size.x, size.y);
        }

        self.orrery.tick(&mut ctx.scene);

        // Transitions run on display frames, paused or not, and look at
        // positions from this frame's tick.
        let orrery = &self.orrery;
        self.rig.step(ctx.frame(), &mut ctx.camera, |s| orrery.position(s));

        self.update_hover(ctx);
        self.emit_events(ctx);
    }

    fn resize(&mut self, ctx: &mut EngineContext, size: Vec2) {
        if self.viewport.is_none() {
            // First size is applied at once.
            ctx.camera.set_viewport(size.x, size.y);
        } else {
            self.resize.push(size, ctx.now_ms());
        }
        self.viewport = Some(size);
    }

    fn click(&mut self, ctx: &mut EngineContext, at: Vec2) {
        let Some(ndc) = self.ndc(at.x, at.y) else {
            log::debug!("click before first resize ignored");
            return;
        };
        if let Some(selection) = pick(self.orrery.picks(), &ctx.scene, &ctx.camera, ndc) {
            self.select(ctx, selection);
        }
    }

    fn select(&mut self, ctx: &mut EngineContext, selection: Selection) {
        if !self.orrery.select(selection) {
            return;
        }
        if let (Some(pos), Some(radius)) = (self.orrery.position(selection), self.orrery.radius(selection)) {
            self.rig.focus(ctx.frame(), &ctx.camera, selection, pos, radius);
        }
    }

    fn reset_camera(&mut self, ctx: &mut EngineContext) {
        self.rig.reset(ctx.frame(), &ctx.camera);
        self.orrery.deselect();
    }

    fn switch_scale_mode(&mut self, ctx: &mut EngineContext) {
        if let Err(e) = self.orrery.switch_scale_mode(&mut ctx.scene) {
            log::error!("scale mode switch failed: {e}");
        }
    }

    fn toggle_labels(&mut self) {
        if !self.orrery.toggle_labels() {
            self.hover_label = None;
        }
    }

    fn key(&mut self, ctx: &mut EngineContext, key_code: u32) {
        match key_code {
            KEY_SPACE => {
                self.orrery.toggle_play();
            }
            KEY_R => self.reset_camera(ctx),
            KEY_S => self.switch_scale_mode(ctx),
            KEY_L => self.toggle_labels(),
            KEY_T => {
                self.orrery.toggle_trails();
            }
            KEY_ESCAPE => self.orrery.deselect(),
            _ => {}
        }
    }

    fn custom(&mut self, ctx: &mut EngineContext, kind: u32, a: f32, b: f32) {
        match kind {
            CUSTOM_TOGGLE_PLAY => {
                self.orrery.toggle_play();
            }
            CUSTOM_SWITCH_SCALE => self.switch_scale_mode(ctx),
            CUSTOM_SET_SPEED => {
                self.orrery.set_speed(a as f64);
            }
            CUSTOM_SELECT => match Selection::from_indices(a as i32, b as i32) {
                Some(selection) => self.select(ctx, selection),
                None => self.orrery.deselect(),
            },
            CUSTOM_DESELECT => self.orrery.deselect(),
            CUSTOM_RESET_CAMERA => self.reset_camera(ctx),
            CUSTOM_TOGGLE_LABELS => self.toggle_labels(),
            CUSTOM_TOGGLE_TRAILS => {
                self.orrery.toggle_trails();
            }
            other => log::debug!("unknown custom event {other}"),
        }
    }

    /// Pick under the latest hover position, at most once per throttle window.
    fn update_hover(&mut self, ctx: &EngineContext) {
        if self.rig.is_pressed() {
            self.pending_hover = None;
            return;
        }
        let Some(at) = self.pending_hover else {
            return;
        };
        let Some(ndc) = self.ndc(at.x, at.y) else {
            return;
        };
        if !self.hover.update(ctx.now_ms(), self.orrery.picks(), &ctx.scene, &ctx.camera, ndc) {
            return;
        }
        self.pending_hover = None;
        self.hover_label = self
            .hover
            .current()
            .filter(|_| self.orrery.labels_visible())
            .and_then(|s| self.orrery.name(s))
            .map(|name| HoverLabel {
                name: name.to_string(),
                x: at.x + LABEL_OFFSET,
                y: at.y + LABEL_OFFSET,
            });
    }

    fn emit_events(&self, ctx: &mut EngineContext) {
        let clock = *self.orrery.clock();
        ctx.emit_event(GameEvent::new(EVENT_CLOCK, clock.ticks as f32, clock.speed as f32, flag(clock.playing)));
        ctx.emit_event(GameEvent::new(
            EVENT_MODE,
            flag(clock.mode == ScaleMode::Realistic),
            flag(self.orrery.labels_visible()),
            flag(self.orrery.trails_visible()),
        ));
        let (body, moon) = Selection::indices(self.orrery.selection());
        ctx.emit_event(GameEvent::new(EVENT_SELECTION, body, moon, 0.0));
        let (visible, x, y) = match &self.hover_label {
            Some(label) => (1.0, label.x, label.y),
            None => (0.0, 0.0, 0.0),
        };
        ctx.emit_event(GameEvent::new(EVENT_HOVER, visible, x, y));
    }
}

pub struct SolarSystem {
    config: ExplorerConfig,
    session: Option<Session>,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self {
            config: ExplorerConfig::default(),
            session: None,
        }
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SolarSystem {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_renderables: 128,
            max_line_vertices: self.config.orbit_segments.max(3) * 2 * MAX_ORBIT_PATHS,
            max_point_vertices: self.config.starfield_count + MAX_BELT_PARTICLES,
            max_events: 16,
        }
    }

    fn configure(&mut self, json: &str) -> EngineResult<()> {
        self.config = ExplorerConfig::from_json(json)?;
        log::info!("explorer config loaded ({:?} mode)", self.config.scale_mode);
        Ok(())
    }

    fn init(&mut self, ctx: &mut EngineContext) -> EngineResult<()> {
        let catalog = Catalog::builtin().map_err(|e| EngineError::Init(e.to_string()))?;

        let mut camera = Camera3D::new(self.config.fov_y_deg, ctx.camera.aspect, self.config.near, self.config.far);
        camera.position = Vec3::from_array(self.config.home_position);
        camera.look_at(Vec3::ZERO);
        ctx.camera = camera;

        let mut rng = Rng::new(self.config.seed);
        let orrery = Orrery::build(catalog, &self.config, &mut ctx.scene, &mut rng)?;
        self.session = Some(Session::new(orrery, &self.config));
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if let Some(session) = &mut self.session {
            session.update(ctx, input);
        }
    }

    fn snapshot_json(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        let snapshot = session.orrery.snapshot(session.hover_label.as_ref());
        match serde_json::to_string(&snapshot) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("snapshot not serializable: {e}");
                None
            }
        }
    }
}
