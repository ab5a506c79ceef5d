use bytemuck::{Pod, Zeroable};
use serde::Serialize;

/// Something the renderer or sound layer should react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SlotEvent {
    /// A bet was accepted and all reels started.
    SpinStarted { bet: u64, balance: u64 },
    /// One reel came to rest.
    #[serde(rename_all = "camelCase")]
    ReelStopped { reel: usize, top_index: usize, symbols: [String; 3] },
    /// All reels are idle and the payout has been credited.
    #[serde(rename_all = "camelCase")]
    SpinSettled { payout: u64, winning_lines: Vec<usize>, balance: u64 },
}

impl SlotEvent {
    pub const KIND_SPIN_STARTED: f32 = 1.0;
    pub const KIND_REEL_STOPPED: f32 = 2.0;
    pub const KIND_SPIN_SETTLED: f32 = 3.0;
}

/// A slot event flattened for JS, read straight out of WASM memory.
/// `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct WireEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl WireEvent {
    pub const FLOATS: usize = 4;
    /// Largest integer an `f32` holds exactly. Credit amounts above it are
    /// saturated on the wire; the JSON accessors carry the exact values.
    pub const MAX_EXACT: u64 = 1 << 24;
}

fn credits_f32(value: u64) -> f32 {
    value.min(WireEvent::MAX_EXACT) as f32
}

impl From<&SlotEvent> for WireEvent {
    /// Payload per kind:
    /// spin started `(bet, balance, 0)`, reel stopped `(reel, top_index, 0)`,
    /// spin settled `(payout, winning line bitmask, balance)`.
    /// Credit values saturate at `MAX_EXACT`.
    fn from(event: &SlotEvent) -> Self {
        match event {
            SlotEvent::SpinStarted { bet, balance } => WireEvent {
                kind: SlotEvent::KIND_SPIN_STARTED,
                a: credits_f32(*bet),
                b: credits_f32(*balance),
                c: 0.0,
            },
            SlotEvent::ReelStopped { reel, top_index, .. } => WireEvent {
                kind: SlotEvent::KIND_REEL_STOPPED,
                a: *reel as f32,
                b: *top_index as f32,
                c: 0.0,
            },
            SlotEvent::SpinSettled { payout, winning_lines, balance } => {
                let mask = winning_lines
                    .iter()
                    .filter(|line| **line < 24)
                    .fold(0u32, |mask, line| mask | (1 << line));
                WireEvent {
                    kind: SlotEvent::KIND_SPIN_SETTLED,
                    a: credits_f32(*payout),
                    b: mask as f32,
                    c: credits_f32(*balance),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settled_event_packs_line_mask() {
        let event = SlotEvent::SpinSettled { payout: 3000, winning_lines: vec![0, 3], balance: 3090 };
        let wire = WireEvent::from(&event);
        assert_eq!(wire.kind, SlotEvent::KIND_SPIN_SETTLED);
        assert_eq!(wire.a, 3000.0);
        assert_eq!(wire.b, 9.0);
        assert_eq!(wire.c, 3090.0);
    }

    #[test]
    fn large_credit_values_saturate() {
        let event = SlotEvent::SpinSettled { payout: u64::MAX, winning_lines: vec![], balance: (1 << 24) + 1 };
        let wire = WireEvent::from(&event);
        assert_eq!(wire.a, 16_777_216.0);
        assert_eq!(wire.c, 16_777_216.0);
        let started = WireEvent::from(&SlotEvent::SpinStarted { bet: 7, balance: 16_777_215 });
        assert_eq!(started.b, 16_777_215.0);
    }

    #[test]
    fn wire_event_is_four_floats() {
        assert_eq!(std::mem::size_of::<WireEvent>(), WireEvent::FLOATS * 4);
        let events = [WireEvent { kind: 2.0, a: 1.0, b: 17.0, c: 0.0 }];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats, &[2.0, 1.0, 17.0, 0.0]);
    }

    #[test]
    fn events_serialize_tagged() {
        let event = SlotEvent::ReelStopped {
            reel: 1,
            top_index: 4,
            symbols: ["a".into(), "b".into(), "c".into()],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"reelStopped","reel":1,"topIndex":4,"symbols":["a","b","c"]}"#);
    }
}
