pub mod runner;

pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// The macro generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (config, init, tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MyGame;
///
/// orrery_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: A type implementing `orrery_engine::Game` with a `new()` constructor
/// - `$game_name`: A string literal used in log messages
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;
        use orrery_engine::InputEvent;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Install the logger and panic hook, and create the runner on first use.
        fn ensure_runner() {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                if borrow.is_none() {
                    console_error_panic_hook::set_once();
                    let _ = console_log::init_with_level(log::Level::Info);
                    *borrow = Some($crate::GameRunner::new(<$game_type>::new()));
                }
            });
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        /// Optional. Must be called before `game_init`. Invalid JSON is logged
        /// and the defaults stay in effect.
        #[wasm_bindgen]
        pub fn game_load_config(json: &str) -> bool {
            ensure_runner();
            match with_runner(|r| r.load_config(json)) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("{}: config ignored: {}", $game_name, e);
                    false
                }
            }
        }

        #[wasm_bindgen]
        pub fn game_init() -> bool {
            ensure_runner();
            match with_runner(|r| r.init()) {
                Ok(()) => {
                    log::info!("{}: initialized", $game_name);
                    true
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("{}: {}", $game_name, e).into());
                    false
                }
            }
        }

        #[wasm_bindgen]
        pub fn game_init_failed() -> bool {
            with_runner(|r| r.init_failed())
        }

        #[wasm_bindgen]
        pub fn get_init_error() -> String {
            with_runner(|r| r.init_error().unwrap_or_default().to_string())
        }

        /// Returns false when the runner refused to tick.
        #[wasm_bindgen]
        pub fn game_tick(now_ms: f64) -> bool {
            with_runner(|r| r.tick(now_ms).is_ok())
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_wheel(delta: f32) {
            with_runner(|r| r.push_input(InputEvent::Wheel { delta }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_resize(width: f32, height: f32) {
            with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_data_ptr() -> *const f32 {
            with_runner(|r| r.frame_data_ptr())
        }

        #[wasm_bindgen]
        pub fn get_spheres_ptr() -> *const f32 {
            with_runner(|r| r.spheres_ptr())
        }

        #[wasm_bindgen]
        pub fn get_sphere_count() -> u32 {
            with_runner(|r| r.sphere_count())
        }

        #[wasm_bindgen]
        pub fn get_line_vertices_ptr() -> *const f32 {
            with_runner(|r| r.line_vertices_ptr())
        }

        #[wasm_bindgen]
        pub fn get_line_vertex_count() -> u32 {
            with_runner(|r| r.line_vertex_count())
        }

        #[wasm_bindgen]
        pub fn get_point_vertices_ptr() -> *const f32 {
            with_runner(|r| r.point_vertices_ptr())
        }

        #[wasm_bindgen]
        pub fn get_point_vertex_count() -> u32 {
            with_runner(|r| r.point_vertex_count())
        }

        #[wasm_bindgen]
        pub fn get_view_projection_ptr() -> *const f32 {
            with_runner(|r| r.view_projection_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        /// UI state as JSON; empty when the game has none.
        #[wasm_bindgen]
        pub fn get_snapshot_json() -> String {
            with_runner(|r| r.snapshot_json().unwrap_or_default())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_spheres() -> u32 {
            with_runner(|r| r.max_spheres())
        }

        #[wasm_bindgen]
        pub fn get_max_line_vertices() -> u32 {
            with_runner(|r| r.max_line_vertices())
        }

        #[wasm_bindgen]
        pub fn get_max_point_vertices() -> u32 {
            with_runner(|r| r.max_point_vertices())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }
    };
}
