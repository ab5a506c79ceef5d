use reel_engine::{
    ConfigError, FixedTimestep, InputEvent, InputQueue, SlotConfig, SlotEvent, SlotMachine, StopMode,
    WireEvent,
};

/// Drives a `SlotMachine` from the browser's frame loop.
///
/// Each slot game keeps one runner in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]` (see `export_slot!`), because wasm-bindgen
/// cannot export the machine's API directly.
pub struct SlotRunner {
    machine: SlotMachine,
    input: InputQueue,
    timestep: FixedTimestep,
    initialized: bool,
    /// Events from the last tick, kept for the JSON accessor.
    frame_events: Vec<SlotEvent>,
    /// Flat copy of `frame_events` for direct memory reads.
    event_buffer: Vec<WireEvent>,
    last_error: Option<String>,
}

impl SlotRunner {
    pub fn new(config: SlotConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self {
            machine: SlotMachine::with_seed(config, seed)?,
            input: InputQueue::new(),
            timestep: FixedTimestep::default(),
            initialized: false,
            frame_events: Vec::new(),
            event_buffer: Vec::with_capacity(8),
            last_error: None,
        })
    }

    pub fn from_json(json: &str, seed: u64) -> Result<Self, ConfigError> {
        Self::new(SlotConfig::from_json(json)?, seed)
    }

    /// Seed from the host clock. Only meaningful inside a browser.
    pub fn host_seed() -> u64 {
        js_sys::Date::now() as u64
    }

    /// Mark the runner live. Ticks before this are ignored.
    pub fn init(&mut self) {
        self.initialized = true;
        log::info!(
            "slot runner: {} reels, {} credits",
            self.machine.reels().len(),
            self.machine.credits()
        );
    }

    pub fn machine(&self) -> &SlotMachine {
        &self.machine
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn spin(&mut self, bet: u64) {
        self.push_input(InputEvent::Spin { bet });
    }

    /// Queue a manual stop; `None` stops the next reel.
    pub fn stop(&mut self, reel: Option<usize>) {
        match reel {
            Some(reel) => self.push_input(InputEvent::StopReel { reel }),
            None => self.push_input(InputEvent::StopNext),
        }
    }

    pub fn set_stop_mode(&mut self, mode: StopMode) -> bool {
        self.machine.set_stop_mode(mode)
    }

    /// Run one frame: apply queued input, step the machine at a fixed rate,
    /// then publish the frame's events.
    pub fn tick(&mut self, dt_ms: f64) {
        if !self.initialized {
            return;
        }

        for event in self.input.drain() {
            if let Err(err) = self.machine.handle_input(event) {
                log::warn!("input {event:?} rejected: {err}");
                self.last_error = Some(err.to_string());
            }
        }

        let steps = self.timestep.accumulate(dt_ms);
        for _ in 0..steps {
            self.machine.advance(self.timestep.dt_ms());
        }

        self.frame_events = self.machine.drain_events();
        self.event_buffer.clear();
        self.event_buffer.extend(self.frame_events.iter().map(WireEvent::from));
    }

    pub fn is_spinning(&self) -> bool {
        self.machine.is_spinning()
    }

    pub fn reel_count(&self) -> u32 {
        self.machine.reels().len() as u32
    }

    /// Offset to paint for a reel; 0 for an unknown reel.
    pub fn visible_offset(&self, reel: usize) -> f64 {
        self.machine.visible_offset(reel).unwrap_or(0.0)
    }

    pub fn credits(&self) -> u64 {
        self.machine.credits()
    }

    // ---- Event buffer for direct memory reads ----

    pub fn events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr() as *const f32
    }

    /// Number of events (each `WireEvent::FLOATS` floats) written last tick.
    pub fn events_len(&self) -> u32 {
        self.event_buffer.len() as u32
    }

    pub fn events_json(&self) -> String {
        to_json(&self.frame_events)
    }

    /// Most recent settled spin as JSON, `null` before the first one.
    pub fn last_outcome_json(&self) -> String {
        to_json(&self.machine.last_outcome())
    }

    /// Take the last rejected-input message, if any.
    pub fn take_last_error(&mut self) -> Option<String> {
        self.last_error.take()
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::error!("failed to serialize for JS: {err}");
        "null".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_engine::FRAME_MS;

    fn runner() -> SlotRunner {
        let mut r = SlotRunner::new(SlotConfig::default(), 21).unwrap();
        r.init();
        r
    }

    #[test]
    fn ticks_before_init_are_ignored() {
        let mut r = SlotRunner::new(SlotConfig::default(), 21).unwrap();
        r.spin(5);
        r.tick(FRAME_MS);
        assert!(!r.is_spinning());
        assert_eq!(r.credits(), 100);
    }

    #[test]
    fn spin_runs_to_settlement() {
        let mut r = runner();
        r.spin(5);
        r.tick(FRAME_MS);
        assert!(r.is_spinning());
        assert_eq!(r.events_len(), 1);
        let started = unsafe { std::slice::from_raw_parts(r.events_ptr(), WireEvent::FLOATS) };
        assert_eq!(started, &[SlotEvent::KIND_SPIN_STARTED, 5.0, 95.0, 0.0]);

        let mut settled = false;
        for _ in 0..1000 {
            r.tick(FRAME_MS);
            if r.events_json().contains("spinSettled") {
                settled = true;
                break;
            }
        }
        assert!(settled);
        assert!(!r.is_spinning());
        assert!(r.last_outcome_json().contains("\"bet\":5"));
        for reel in 0..r.reel_count() as usize {
            let offset = r.visible_offset(reel);
            assert!(offset < 0.0 && offset >= -12.0 * 80.0);
        }
    }

    #[test]
    fn rejected_spin_is_reported() {
        let mut r = runner();
        assert_eq!(r.last_outcome_json(), "null");
        r.spin(500);
        r.tick(FRAME_MS);
        assert!(!r.is_spinning());
        assert!(r.take_last_error().unwrap().contains("insufficient"));
        assert!(r.take_last_error().is_none());
    }

    #[test]
    fn manual_stops_through_queue() {
        let mut r = runner();
        assert!(r.set_stop_mode(StopMode::Manual));
        r.spin(1);
        for _ in 0..30 {
            r.tick(FRAME_MS);
        }
        r.stop(None);
        r.stop(Some(2));
        r.stop(None);
        for _ in 0..200 {
            r.tick(FRAME_MS);
        }
        assert!(!r.is_spinning());
        assert_eq!(r.visible_offset(99), 0.0);
    }
}
