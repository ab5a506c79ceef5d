// extensions/easing.rs
//
// Pure easing functions for reel acceleration and deceleration.
// No dependencies on reels or the machine, just math.

use std::f64::consts::{LN_2, PI};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const BACK_C1: f64 = 1.70158;
const BACK_C2: f64 = BACK_C1 * 1.525;
const BACK_C3: f64 = BACK_C1 + 1.0;
const ELASTIC_C4: f64 = (2.0 * PI) / 3.0;

/// Easing function type.
///
/// Serialized by its JS-style name (`"easeOutCubic"`), which is how stop
/// curves are named in slot configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Slow start and end.
    QuadInOut,
    /// Stronger slow start. Used for the spin-up ramp.
    CubicIn,
    /// Stronger slow end. The default stop curve.
    CubicOut,
    /// Stronger slow start and end.
    CubicInOut,
    /// Very strong slow start.
    QuartIn,
    /// Very strong slow end.
    QuartOut,
    /// Very strong slow start and end.
    QuartInOut,
    /// Sine wave easing (smooth).
    SineIn,
    SineOut,
    SineInOut,
    /// Exponential easing (dramatic).
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    /// Overshoot then settle.
    BackIn,
    BackOut,
    BackInOut,
    /// Bouncy finish.
    BounceOut,
    /// Elastic spring.
    ElasticOut,
}

impl Easing {
    /// Every variant, in declaration order.
    pub const ALL: [Easing; 21] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::BackIn,
        Easing::BackOut,
        Easing::BackInOut,
        Easing::BounceOut,
        Easing::ElasticOut,
    ];

    /// Apply the easing function to a normalized progress `t` in [0, 1].
    /// Returns the eased value, also typically in [0, 1] (but can overshoot for Back/Elastic).
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,

            // Quadratic
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }

            // Cubic
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }

            // Quartic
            Easing::QuartIn => t * t * t * t,
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::QuartInOut => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }

            // Sine
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,

            // Exponential
            Easing::ExpoIn => {
                if t == 0.0 { 0.0 } else { 2.0_f64.powf(10.0 * t - 10.0) }
            }
            Easing::ExpoOut => {
                if t == 1.0 { 1.0 } else { 1.0 - 2.0_f64.powf(-10.0 * t) }
            }
            Easing::ExpoInOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }

            // Back (overshoot)
            Easing::BackIn => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Easing::BackOut => {
                1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2)
            }
            Easing::BackInOut => {
                if t < 0.5 {
                    (2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2) + 2.0)
                        / 2.0
                }
            }

            // Bounce
            Easing::BounceOut => bounce_out(t),

            // Elastic
            Easing::ElasticOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    2.0_f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
        }
    }

    /// Slope of the curve at `t = 0`.
    ///
    /// A deceleration that starts with this curve moves `distance * slope / duration`
    /// per unit time on its first instant, so multiplying the linear travel time by the
    /// slope keeps the reel's speed continuous when it switches from cruise to stop.
    pub fn derivative_at_zero(self) -> f64 {
        match self {
            Easing::Linear => 1.0,
            Easing::QuadOut => 2.0,
            Easing::CubicOut => 3.0,
            Easing::QuartOut => 4.0,
            Easing::SineOut => PI / 2.0,
            Easing::ExpoIn | Easing::ExpoInOut => 10.0 * LN_2 * 2.0_f64.powi(-10),
            Easing::ExpoOut | Easing::ElasticOut => 10.0 * LN_2,
            Easing::BackOut => 3.0 * BACK_C3 - 2.0 * BACK_C1,
            Easing::QuadIn
            | Easing::QuadInOut
            | Easing::CubicIn
            | Easing::CubicInOut
            | Easing::QuartIn
            | Easing::QuartInOut
            | Easing::SineIn
            | Easing::SineInOut
            | Easing::BackIn
            | Easing::BackInOut
            | Easing::BounceOut => 0.0,
        }
    }

    /// JS-style name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::QuadIn => "easeInQuad",
            Easing::QuadOut => "easeOutQuad",
            Easing::QuadInOut => "easeInOutQuad",
            Easing::CubicIn => "easeInCubic",
            Easing::CubicOut => "easeOutCubic",
            Easing::CubicInOut => "easeInOutCubic",
            Easing::QuartIn => "easeInQuart",
            Easing::QuartOut => "easeOutQuart",
            Easing::QuartInOut => "easeInOutQuart",
            Easing::SineIn => "easeInSine",
            Easing::SineOut => "easeOutSine",
            Easing::SineInOut => "easeInOutSine",
            Easing::ExpoIn => "easeInExpo",
            Easing::ExpoOut => "easeOutExpo",
            Easing::ExpoInOut => "easeInOutExpo",
            Easing::BackIn => "easeInBack",
            Easing::BackOut => "easeOutBack",
            Easing::BackInOut => "easeInOutBack",
            Easing::BounceOut => "easeOutBounce",
            Easing::ElasticOut => "easeOutElastic",
        }
    }
}

impl FromStr for Easing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownEasing(s.to_string()))
    }
}

impl From<String> for Easing {
    fn from(name: String) -> Self {
        name.parse().unwrap_or_else(|err| {
            log::warn!("{err}; falling back to {}", Easing::CubicOut);
            Easing::CubicOut
        })
    }
}

impl From<Easing> for &'static str {
    fn from(easing: Easing) -> Self {
        easing.name()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f64, b: f64, t: f64, easing: Easing) -> f64 {
    lerp(a, b, easing.apply(t))
}
