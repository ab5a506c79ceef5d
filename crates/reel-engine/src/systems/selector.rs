//! Per-spin win staging and stop-target planning.
//!
//! One roll decides whether the spin stages a horizontal or diagonal win. A
//! staged win draws a weighted symbol present on every reel and pins it to a
//! row (or a diagonal) across all reels. Reels not claimed by a staged win may
//! still take an always-on target from configuration.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ForcedTargetConfig, WinConfig};
use crate::core::rng::unit;
use crate::reel::{Row, StopTarget};

/// Kind of staged win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinType {
    Horizontal,
    Diagonal,
}

/// Diagonal orientation, read left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagonalDirection {
    /// Top-left to bottom-right.
    Down,
    /// Bottom-left to top-right.
    Up,
}

impl DiagonalDirection {
    pub fn rows(self) -> [Row; 3] {
        match self {
            DiagonalDirection::Down => [Row::Top, Row::Middle, Row::Bottom],
            DiagonalDirection::Up => [Row::Bottom, Row::Middle, Row::Top],
        }
    }
}

/// A win staged for this spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedWin {
    pub win_type: WinType,
    pub symbol: String,
    /// Row the symbol lands on, per reel.
    pub rows: Vec<Row>,
}

/// Stop targets decided at spin start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpinPlan {
    pub staged: Option<StagedWin>,
    /// One slot per reel; `None` stops at the nearest boundary.
    pub targets: Vec<Option<StopTarget>>,
}

/// Decide the win type from one uniform roll.
///
/// Horizontal and diagonal probabilities are independent; their sum is capped
/// at 1 and horizontal takes the lower part of the interval.
pub fn roll_win_type(roll: f64, config: &WinConfig) -> Option<WinType> {
    let hp = config.horizontal_probability.min(1.0);
    let sum = (config.horizontal_probability + config.diagonal_probability).min(1.0);
    if roll >= sum {
        None
    } else if roll < hp {
        Some(WinType::Horizontal)
    } else {
        Some(WinType::Diagonal)
    }
}

/// Symbols present on every reel with a positive weight, in first-reel order.
pub fn common_weighted_symbols<'a>(reels: &'a [Vec<String>], config: &WinConfig) -> Vec<(&'a str, f64)> {
    let Some(first) = reels.first() else {
        return Vec::new();
    };
    let mut candidates: Vec<(&str, f64)> = Vec::new();
    for symbol in first {
        if candidates.iter().any(|(s, _)| *s == symbol.as_str()) {
            continue;
        }
        let weight = config.weights.get(symbol).copied().unwrap_or(0.0);
        if !(weight > 0.0 && weight.is_finite()) {
            continue;
        }
        if reels.iter().all(|strip| strip.contains(symbol)) {
            candidates.push((symbol.as_str(), weight));
        }
    }
    candidates
}

/// Weighted draw among symbols common to all reels.
pub fn pick_win_symbol<R: Rng + ?Sized>(reels: &[Vec<String>], config: &WinConfig, rng: &mut R) -> Option<String> {
    let candidates = common_weighted_symbols(reels, config);
    let dist = WeightedIndex::new(candidates.iter().map(|(_, w)| *w)).ok()?;
    let (symbol, _) = candidates[dist.sample(rng)];
    Some(symbol.to_string())
}

fn stage_win<R: Rng + ?Sized>(
    win_type: WinType,
    reels: &[Vec<String>],
    config: &WinConfig,
    rng: &mut R,
) -> Option<StagedWin> {
    let symbol = pick_win_symbol(reels, config, rng)?;

    // Diagonals only exist on a three-reel window; anything else stages a horizontal line.
    let win_type = if win_type == WinType::Diagonal && reels.len() != 3 {
        log::debug!("diagonal win on {} reels, staging horizontal instead", reels.len());
        WinType::Horizontal
    } else {
        win_type
    };

    let rows = match win_type {
        WinType::Horizontal => {
            let row = config
                .row
                .unwrap_or_else(|| Row::ALL[rng.gen_range(0..Row::ALL.len())]);
            vec![row; reels.len()]
        }
        WinType::Diagonal => {
            let direction = config.diagonal.unwrap_or_else(|| {
                if rng.gen_bool(0.5) { DiagonalDirection::Down } else { DiagonalDirection::Up }
            });
            direction.rows().to_vec()
        }
    };

    if !reels.iter().all(|strip| strip.contains(&symbol)) {
        log::warn!("staged symbol '{symbol}' missing from a reel, skipping staged win");
        return None;
    }
    Some(StagedWin { win_type, symbol, rows })
}

/// Build this spin's targets: staged win, then always-on targets, then none.
pub fn plan_spin<R: Rng + ?Sized>(
    reels: &[Vec<String>],
    win: &WinConfig,
    forced: &ForcedTargetConfig,
    rng: &mut R,
) -> SpinPlan {
    let staged = roll_win_type(unit(rng), win).and_then(|kind| stage_win(kind, reels, win, rng));

    let forced_active = !forced.targets.is_empty() && unit(rng) < forced.probability;

    let targets = (0..reels.len())
        .map(|reel| {
            if let Some(staged) = &staged {
                return Some(StopTarget::symbol(reel, staged.symbol.clone(), Some(staged.rows[reel])));
            }
            if forced_active {
                return forced.targets.iter().find(|t| t.reel == reel).cloned();
            }
            None
        })
        .collect();

    if let Some(staged) = &staged {
        log::debug!("staged {:?} win on '{}' rows {:?}", staged.win_type, staged.symbol, staged.rows);
    }
    SpinPlan { staged, targets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::seeded;
    use std::collections::HashMap;

    fn reels() -> Vec<Vec<String>> {
        let r = |s: &[&str]| s.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        vec![
            r(&["7", "bell", "cherry", "lemon"]),
            r(&["cherry", "7", "plum", "bell"]),
            r(&["bell", "cherry", "7", "grape"]),
        ]
    }

    fn weights(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(s, w)| (s.to_string(), *w)).collect()
    }

    #[test]
    fn roll_partitions_interval() {
        let cfg = WinConfig {
            horizontal_probability: 0.2,
            diagonal_probability: 0.3,
            ..WinConfig::default()
        };
        assert_eq!(roll_win_type(0.0, &cfg), Some(WinType::Horizontal));
        assert_eq!(roll_win_type(0.19, &cfg), Some(WinType::Horizontal));
        assert_eq!(roll_win_type(0.2, &cfg), Some(WinType::Diagonal));
        assert_eq!(roll_win_type(0.49, &cfg), Some(WinType::Diagonal));
        assert_eq!(roll_win_type(0.5, &cfg), None);
    }

    #[test]
    fn roll_sum_is_capped() {
        let cfg = WinConfig {
            horizontal_probability: 0.8,
            diagonal_probability: 0.9,
            ..WinConfig::default()
        };
        assert_eq!(roll_win_type(0.79, &cfg), Some(WinType::Horizontal));
        assert_eq!(roll_win_type(0.99, &cfg), Some(WinType::Diagonal));
    }

    #[test]
    fn only_common_weighted_symbols_are_candidates() {
        let cfg = WinConfig {
            weights: weights(&[("7", 1.0), ("bell", 0.0), ("cherry", 3.0), ("lemon", 5.0)]),
            ..WinConfig::default()
        };
        let strips = reels();
        let c = common_weighted_symbols(&strips, &cfg);
        assert_eq!(c, vec![("7", 1.0), ("cherry", 3.0)]);
    }

    #[test]
    fn full_mass_symbol_always_chosen() {
        let mut rng = seeded(77);
        let cfg = WinConfig {
            horizontal_probability: 1.0,
            weights: weights(&[("cherry", 1.0), ("lemon", 50.0)]),
            ..WinConfig::default()
        };
        for _ in 0..1000 {
            let plan = plan_spin(&reels(), &cfg, &ForcedTargetConfig::default(), &mut rng);
            let win = plan.staged.expect("win always staged");
            assert_eq!(win.symbol, "cherry");
            assert_eq!(win.win_type, WinType::Horizontal);
            assert!(win.rows.iter().all(|r| *r == win.rows[0]));
            for (reel, target) in plan.targets.iter().enumerate() {
                let t = target.as_ref().unwrap();
                assert_eq!(t.reel, reel);
                assert_eq!(t.symbol.as_deref(), Some("cherry"));
                assert!(reels()[reel].contains(&"cherry".to_string()));
            }
        }
    }

    #[test]
    fn no_common_symbol_means_no_targets() {
        let mut rng = seeded(4);
        let cfg = WinConfig {
            horizontal_probability: 1.0,
            weights: weights(&[("lemon", 1.0), ("plum", 1.0)]),
            ..WinConfig::default()
        };
        let plan = plan_spin(&reels(), &cfg, &ForcedTargetConfig::default(), &mut rng);
        assert!(plan.staged.is_none());
        assert!(plan.targets.iter().all(Option::is_none));
    }

    #[test]
    fn diagonal_maps_rows_per_direction() {
        let mut rng = seeded(8);
        let cfg = WinConfig {
            diagonal_probability: 1.0,
            weights: weights(&[("7", 1.0)]),
            diagonal: Some(DiagonalDirection::Up),
            ..WinConfig::default()
        };
        let plan = plan_spin(&reels(), &cfg, &ForcedTargetConfig::default(), &mut rng);
        let win = plan.staged.unwrap();
        assert_eq!(win.win_type, WinType::Diagonal);
        assert_eq!(win.rows, vec![Row::Bottom, Row::Middle, Row::Top]);
    }

    #[test]
    fn diagonal_on_four_reels_stages_horizontal() {
        let mut rng = seeded(8);
        let mut four = reels();
        four.push(vec!["7".into(), "cherry".into()]);
        let cfg = WinConfig {
            diagonal_probability: 1.0,
            weights: weights(&[("7", 1.0)]),
            row: Some(Row::Bottom),
            ..WinConfig::default()
        };
        let plan = plan_spin(&four, &cfg, &ForcedTargetConfig::default(), &mut rng);
        let win = plan.staged.unwrap();
        assert_eq!(win.win_type, WinType::Horizontal);
        assert_eq!(win.rows, vec![Row::Bottom; 4]);
    }

    #[test]
    fn forced_targets_fill_unstaged_spins() {
        let mut rng = seeded(12);
        let forced = ForcedTargetConfig {
            probability: 1.0,
            targets: vec![StopTarget::symbol(1, "plum", Some(Row::Middle))],
        };
        let plan = plan_spin(&reels(), &WinConfig::default(), &forced, &mut rng);
        assert!(plan.staged.is_none());
        assert_eq!(plan.targets[0], None);
        assert_eq!(plan.targets[1], Some(StopTarget::symbol(1, "plum", Some(Row::Middle))));
        assert_eq!(plan.targets[2], None);
    }

    #[test]
    fn staged_win_overrides_forced_targets() {
        let mut rng = seeded(12);
        let forced = ForcedTargetConfig {
            probability: 1.0,
            targets: vec![StopTarget::symbol(1, "plum", Some(Row::Middle))],
        };
        let cfg = WinConfig {
            horizontal_probability: 1.0,
            weights: weights(&[("bell", 1.0)]),
            row: Some(Row::Top),
            ..WinConfig::default()
        };
        let plan = plan_spin(&reels(), &cfg, &forced, &mut rng);
        assert_eq!(plan.targets[1], Some(StopTarget::symbol(1, "bell", Some(Row::Top))));
    }

    #[test]
    fn forced_targets_gated_by_probability() {
        let mut rng = seeded(3);
        let forced = ForcedTargetConfig {
            probability: 0.0,
            targets: vec![StopTarget::index(0, 2, None)],
        };
        for _ in 0..100 {
            let plan = plan_spin(&reels(), &WinConfig::default(), &forced, &mut rng);
            assert!(plan.targets.iter().all(Option::is_none));
        }
    }
}
