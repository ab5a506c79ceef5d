/// Player actions the machine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Spin button with a bet.
    Spin { bet: u64 },
    /// Stop the next spinning reel, left to right.
    StopNext,
    /// Stop one reel directly.
    StopReel { reel: usize },
    /// Raw keyboard key (DOM `keyCode`).
    KeyDown { key_code: u32 },
}

pub const KEY_ENTER: u32 = 13;
pub const KEY_SPACE: u32 = 32;
pub const KEY_DIGIT_1: u32 = 49;
pub const KEY_DIGIT_9: u32 = 57;

/// A queue of input events.
/// JS pushes events between frames; the runner drains them each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Spin { bet: 5 });
        q.push(InputEvent::KeyDown { key_code: KEY_SPACE });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events, vec![InputEvent::Spin { bet: 5 }, InputEvent::KeyDown { key_code: 32 }]);
        assert!(q.is_empty());
    }
}
