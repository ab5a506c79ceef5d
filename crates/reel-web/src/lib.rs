pub mod runner;

pub use reel_engine;
pub use runner::SlotRunner;

/// Generate all `#[wasm_bindgen]` exports for a slot game.
///
/// Generates:
/// - `thread_local!` storage for the SlotRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (slot_init, slot_tick, spin/stop input, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// reel_web::export_slot!(include_str!("../config/fruit.json"), "fruit-slot");
/// ```
///
/// # Arguments
///
/// - `$config_json`: A `&str` expression holding the slot configuration
/// - `$slot_name`: A string literal used in log messages
///
/// The calling crate must depend on `wasm-bindgen`, `log`, `console_log` and
/// `console_error_panic_hook`.
#[macro_export]
macro_rules! export_slot {
    ($config_json:expr, $slot_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::SlotRunner>> = RefCell::new(None);
        }

        fn with_runner<R>(fallback: R, f: impl FnOnce(&mut $crate::SlotRunner) -> R) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    log::error!("{}: not initialized, call slot_init() first", $slot_name);
                    fallback
                }
            })
        }

        /// Load the bundled configuration. Returns false if it is invalid.
        #[wasm_bindgen]
        pub fn slot_init() -> bool {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let seed = $crate::SlotRunner::host_seed();
            match $crate::SlotRunner::from_json($config_json, seed) {
                Ok(runner) => {
                    RUNNER.with(|cell| {
                        *cell.borrow_mut() = Some(runner);
                    });
                    with_runner((), |r| r.init());
                    log::info!("{}: initialized", $slot_name);
                    true
                }
                Err(err) => {
                    log::error!("{}: {}", $slot_name, err);
                    false
                }
            }
        }

        /// Advance by the frame time in milliseconds.
        #[wasm_bindgen]
        pub fn slot_tick(dt_ms: f64) {
            with_runner((), |r| r.tick(dt_ms));
        }

        #[wasm_bindgen]
        pub fn slot_spin(bet: u32) {
            with_runner((), |r| r.spin(bet as u64));
        }

        /// Stop a reel in manual mode; no index stops the next one.
        #[wasm_bindgen]
        pub fn slot_stop(reel: Option<u32>) {
            with_runner((), |r| r.stop(reel.map(|i| i as usize)));
        }

        #[wasm_bindgen]
        pub fn slot_key_down(key_code: u32) {
            with_runner((), |r| r.push_input($crate::reel_engine::InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn slot_set_manual(manual: bool) -> bool {
            let mode = if manual { $crate::reel_engine::StopMode::Manual } else { $crate::reel_engine::StopMode::Auto };
            with_runner(false, |r| r.set_stop_mode(mode))
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn slot_reel_count() -> u32 {
            with_runner(0, |r| r.reel_count())
        }

        #[wasm_bindgen]
        pub fn slot_visible_offset(reel: u32) -> f64 {
            with_runner(0.0, |r| r.visible_offset(reel as usize))
        }

        #[wasm_bindgen]
        pub fn slot_is_spinning() -> bool {
            with_runner(false, |r| r.is_spinning())
        }

        #[wasm_bindgen]
        pub fn slot_credits() -> f64 {
            with_runner(0.0, |r| r.credits() as f64)
        }

        #[wasm_bindgen]
        pub fn slot_events_ptr() -> *const f32 {
            with_runner(std::ptr::null(), |r| r.events_ptr())
        }

        #[wasm_bindgen]
        pub fn slot_events_len() -> u32 {
            with_runner(0, |r| r.events_len())
        }

        #[wasm_bindgen]
        pub fn slot_events_json() -> String {
            with_runner(String::from("[]"), |r| r.events_json())
        }

        #[wasm_bindgen]
        pub fn slot_last_outcome_json() -> String {
            with_runner(String::from("null"), |r| r.last_outcome_json())
        }

        #[wasm_bindgen]
        pub fn slot_take_error() -> Option<String> {
            with_runner(None, |r| r.take_last_error())
        }
    };
}
