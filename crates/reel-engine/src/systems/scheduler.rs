//! Automatic stop scheduling.
//!
//! Stops are spread evenly between the configured bounds, jittered, then
//! walked left to right so each reel stops at least `min_gap_ms` after the
//! previous one whatever the jitter draw was.

use rand::Rng;

use crate::config::AutoStopConfig;
use crate::core::rng::jitter;

/// Jitter half-width used when none is configured: half the slack between
/// the even spacing and the minimum gap, so neighbours cannot swap.
pub fn derived_jitter(count: usize, config: &AutoStopConfig) -> f64 {
    if count < 2 {
        return 0.0;
    }
    let step = (config.max_time_ms - config.min_time_ms) / (count - 1) as f64;
    ((step - config.min_gap_ms) / 2.0).max(0.0)
}

/// Stop times in ms from spin start, one per reel, left to right.
///
/// The first stop is never earlier than `min_time_ms` and the last never
/// later than `max_time_ms`. Each jittered time is clamped to the slot that
/// still leaves room for the gaps on both sides, then pushed later where
/// needed to keep the gap. When `(count - 1) * min_gap_ms` exceeds the window
/// the gap wins over `max_time_ms`.
pub fn schedule_auto_stops<R: Rng + ?Sized>(count: usize, config: &AutoStopConfig, rng: &mut R) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let step = if count > 1 {
        (config.max_time_ms - config.min_time_ms) / (count - 1) as f64
    } else {
        0.0
    };
    let window = config.jitter_ms.unwrap_or_else(|| derived_jitter(count, config));
    let last = (count - 1) as f64;
    let fits = last * config.min_gap_ms <= config.max_time_ms - config.min_time_ms;

    let mut times: Vec<f64> = (0..count)
        .map(|i| {
            let base = config.min_time_ms + step * i as f64;
            let (lo, hi) = if fits {
                (
                    config.min_time_ms + config.min_gap_ms * i as f64,
                    config.max_time_ms - config.min_gap_ms * (last - i as f64),
                )
            } else {
                (config.min_time_ms, config.max_time_ms)
            };
            (base + jitter(rng, window)).clamp(lo, hi)
        })
        .collect();

    for i in 1..count {
        let earliest = times[i - 1] + config.min_gap_ms;
        if times[i] < earliest {
            times[i] = earliest;
        }
    }

    log::debug!("auto stop schedule: {times:?}");
    times
}
