use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::extensions::Easing;
use crate::reel::{Row, StopTarget};
use crate::systems::selector::DiagonalDirection;

/// Complete slot machine configuration.
/// Loaded from a JSON document at runtime; every group is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlotConfig {
    /// Symbol strip per reel, left to right.
    pub reels: Vec<Vec<String>>,
    /// Pixel height of one symbol cell.
    pub symbol_height: f64,
    /// Spin with increasing virtual position instead of decreasing.
    pub reverse_rotation: bool,
    /// Strip index resting on the top row of each reel at startup.
    /// Reels without an entry start at a random index.
    pub initial_positions: Vec<usize>,
    pub timing: TimingConfig,
    pub stop_mode: StopMode,
    pub auto_stop: AutoStopConfig,
    pub win: WinConfig,
    pub forced_targets: ForcedTargetConfig,
    pub payouts: PayoutConfig,
    /// Credit balance at startup.
    pub starting_credits: u64,
    /// Bet used by keyboard spins until a spin request names one.
    pub default_bet: u64,
    /// RNG seed. `None` lets the host supply one.
    pub seed: Option<u64>,
}

/// Reel animation timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimingConfig {
    /// Cruise speed in pixels per 60 Hz frame.
    pub spin_speed: f64,
    /// Duration of the cubic spin-up ramp.
    pub acceleration_ms: f64,
    pub min_stop_ms: f64,
    pub max_stop_ms: f64,
    /// Minimum deceleration time in automatic mode.
    pub base_deceleration_ms: f64,
    /// Curve used to bring a reel to rest.
    pub stop_easing: Easing,
}

/// How reels are told to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopMode {
    /// Stops fire on a jittered schedule.
    #[default]
    Auto,
    /// Each stop is a button press or key.
    Manual,
}

/// Automatic stop schedule bounds, in ms from spin start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoStopConfig {
    pub min_time_ms: f64,
    pub max_time_ms: f64,
    pub min_gap_ms: f64,
    /// Half-width of the per-reel jitter. Derived from the spacing when absent.
    pub jitter_ms: Option<f64>,
}

/// Staged-win probabilities and symbol weights.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WinConfig {
    pub horizontal_probability: f64,
    pub diagonal_probability: f64,
    /// Relative draw weight per symbol. Symbols without a positive weight are never staged.
    pub weights: HashMap<String, f64>,
    /// Fixed row for horizontal wins; random when absent.
    pub row: Option<Row>,
    /// Fixed direction for diagonal wins; random when absent.
    pub diagonal: Option<DiagonalDirection>,
}

/// Always-on stop targets, applied when no staged win claims the reel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForcedTargetConfig {
    /// Chance per spin that the targets are applied.
    pub probability: f64,
    pub targets: Vec<StopTarget>,
}

/// Payout multipliers and paylines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PayoutConfig {
    /// Explicit multiplier per symbol. Derived from `win.weights` when absent.
    pub table: Option<HashMap<String, f64>>,
    /// Target multiplier for a weight of 1 when deriving from weights.
    pub desired_max_payout: f64,
    /// Multiplier for a line holding at least two of the symbol without a full match.
    pub pair_payouts: HashMap<String, f64>,
    /// Explicit paylines as one row per reel. Derived from the reel count when absent.
    pub paylines: Option<Vec<Vec<Row>>>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            spin_speed: 30.0,
            acceleration_ms: 400.0,
            min_stop_ms: 250.0,
            max_stop_ms: 1600.0,
            base_deceleration_ms: 500.0,
            stop_easing: Easing::CubicOut,
        }
    }
}

impl Default for AutoStopConfig {
    fn default() -> Self {
        Self {
            min_time_ms: 900.0,
            max_time_ms: 2100.0,
            min_gap_ms: 200.0,
            jitter_ms: None,
        }
    }
}

impl Default for ForcedTargetConfig {
    fn default() -> Self {
        Self {
            probability: 1.0,
            targets: Vec::new(),
        }
    }
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            table: None,
            desired_max_payout: 100.0,
            pair_payouts: HashMap::new(),
            paylines: None,
        }
    }
}

fn strip(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

impl Default for SlotConfig {
    /// The classic three-reel fruit machine.
    fn default() -> Self {
        let reels = vec![
            strip(&["7", "bell", "orange", "cherry", "star", "lemon", "cherry", "bell", "cherry", "orange", "cherry", "lemon"]),
            strip(&["cherry", "lemon", "7", "cherry", "bell", "orange", "cherry", "star", "lemon", "cherry", "bell", "orange"]),
            strip(&["star", "cherry", "lemon", "bell", "orange", "cherry", "lemon", "7", "cherry", "bell", "orange", "cherry"]),
        ];
        let table = [("7", 100.0), ("star", 50.0), ("bell", 20.0), ("lemon", 10.0), ("orange", 10.0), ("cherry", 10.0)]
            .into_iter()
            .map(|(s, m)| (s.to_string(), m))
            .collect();
        let weights = [("7", 1.0), ("star", 2.0), ("bell", 5.0), ("lemon", 10.0), ("orange", 10.0), ("cherry", 10.0)]
            .into_iter()
            .map(|(s, w)| (s.to_string(), w))
            .collect();

        Self {
            reels,
            symbol_height: 80.0,
            reverse_rotation: false,
            initial_positions: Vec::new(),
            timing: TimingConfig::default(),
            stop_mode: StopMode::Auto,
            auto_stop: AutoStopConfig::default(),
            win: WinConfig {
                horizontal_probability: 0.1,
                diagonal_probability: 0.05,
                weights,
                row: None,
                diagonal: None,
            },
            forced_targets: ForcedTargetConfig::default(),
            payouts: PayoutConfig {
                table: Some(table),
                ..PayoutConfig::default()
            },
            starting_credits: 100,
            default_bet: 1,
            seed: None,
        }
    }
}

impl SlotConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SlotConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn reel_count(&self) -> usize {
        self.reels.len()
    }

    /// Reject configurations the motion model cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reels.is_empty() {
            return Err(ConfigError::NoReels);
        }
        if let Some(reel) = self.reels.iter().position(|s| s.is_empty()) {
            return Err(ConfigError::EmptyStrip { reel });
        }
        if !(self.symbol_height > 0.0 && self.symbol_height.is_finite()) {
            return Err(ConfigError::InvalidSymbolHeight(self.symbol_height));
        }

        let t = &self.timing;
        if !(t.spin_speed > 0.0 && t.spin_speed.is_finite()) {
            return Err(ConfigError::InvalidSpinSpeed(t.spin_speed));
        }
        check_bounds("stop animation", t.min_stop_ms, t.max_stop_ms)?;
        check_non_negative("accelerationMs", t.acceleration_ms)?;
        check_non_negative("baseDecelerationMs", t.base_deceleration_ms)?;

        let a = &self.auto_stop;
        check_bounds("auto stop", a.min_time_ms, a.max_time_ms)?;
        check_non_negative("minGapMs", a.min_gap_ms)?;
        if let Some(jitter) = a.jitter_ms {
            check_non_negative("jitterMs", jitter)?;
        }

        check_non_negative("horizontalProbability", self.win.horizontal_probability)?;
        check_non_negative("diagonalProbability", self.win.diagonal_probability)?;
        check_non_negative("forcedTargets.probability", self.forced_targets.probability)?;
        for (symbol, weight) in &self.win.weights {
            check_non_negative(&format!("weight of '{symbol}'"), *weight)?;
        }
        Ok(())
    }
}

fn check_bounds(name: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min < 0.0 || min > max || !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::InvalidTimingBounds { name, min, max });
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value < 0.0 || !value.is_finite() {
        return Err(ConfigError::InvalidProbability {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}
