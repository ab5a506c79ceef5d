//! Payline evaluation over the final symbol grid.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{PayoutConfig, WinConfig};
use crate::reel::Row;

/// Symbol → multiplier mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayoutTable {
    multipliers: HashMap<String, f64>,
}

impl PayoutTable {
    pub fn from_multipliers(multipliers: HashMap<String, f64>) -> Self {
        Self { multipliers }
    }

    /// Derive multipliers from win weights: rarer symbols pay more.
    /// `multiplier = max(1, round(desired_max / weight))`; non-positive weights are skipped.
    pub fn from_weights(weights: &HashMap<String, f64>, desired_max: f64) -> Self {
        let multipliers = weights
            .iter()
            .filter(|(_, w)| **w > 0.0 && w.is_finite())
            .map(|(symbol, w)| (symbol.clone(), (desired_max / w).round().max(1.0)))
            .collect();
        Self { multipliers }
    }

    /// Explicit table when configured, otherwise derived from the win weights.
    pub fn from_config(payouts: &PayoutConfig, win: &WinConfig) -> Self {
        match &payouts.table {
            Some(table) => Self::from_multipliers(table.clone()),
            None => {
                log::info!("no payout table configured, deriving from win weights");
                Self::from_weights(&win.weights, payouts.desired_max_payout)
            }
        }
    }

    /// Multiplier for a symbol, 0 when absent.
    pub fn multiplier(&self, symbol: &str) -> f64 {
        self.multipliers.get(symbol).copied().unwrap_or(0.0)
    }
}

/// One evaluable line: a (reel, row) cell per reel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payline {
    pub cells: Vec<(usize, Row)>,
}

impl Payline {
    pub fn horizontal(reel_count: usize, row: Row) -> Self {
        Self {
            cells: (0..reel_count).map(|reel| (reel, row)).collect(),
        }
    }

    /// Line from one row per reel, left to right.
    pub fn from_rows(rows: &[Row]) -> Self {
        Self {
            cells: rows.iter().copied().enumerate().collect(),
        }
    }

    /// Top, middle and bottom rows, plus both diagonals on a three-reel layout.
    pub fn standard(reel_count: usize) -> Vec<Payline> {
        let mut lines: Vec<Payline> = Row::ALL.iter().map(|row| Payline::horizontal(reel_count, *row)).collect();
        if reel_count == 3 {
            lines.push(Payline::from_rows(&[Row::Top, Row::Middle, Row::Bottom]));
            lines.push(Payline::from_rows(&[Row::Bottom, Row::Middle, Row::Top]));
        }
        lines
    }

    /// Configured lines when present, otherwise the standard set.
    pub fn from_config(payouts: &PayoutConfig, reel_count: usize) -> Vec<Payline> {
        match &payouts.paylines {
            Some(rows) => rows
                .iter()
                .filter(|line| {
                    let ok = line.len() == reel_count;
                    if !ok {
                        log::warn!("payline {:?} does not cover {} reels, ignoring", line, reel_count);
                    }
                    ok
                })
                .map(|line| Payline::from_rows(line))
                .collect(),
            None => Payline::standard(reel_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Every cell holds the same symbol.
    Full,
    /// Not a full match, but the symbol appears at least twice.
    Pair,
}

/// A paying (or matching) line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineWin {
    pub line: usize,
    pub symbol: String,
    pub kind: MatchKind,
    pub amount: u64,
}

/// Result of settling one spin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinOutcome {
    pub bet: u64,
    pub payout: u64,
    pub winning_lines: Vec<usize>,
    pub line_wins: Vec<LineWin>,
    /// Visible symbols per reel, top to bottom.
    pub grid: Vec<[String; 3]>,
}

fn line_amount(bet: u64, multiplier: f64) -> u64 {
    let amount = (bet as f64 * multiplier).floor();
    if amount.is_finite() && amount > 0.0 { amount as u64 } else { 0 }
}

fn evaluate_line<'a>(
    grid: &'a [[String; 3]],
    line: &Payline,
    bet: u64,
    table: &PayoutTable,
    pair_payouts: &HashMap<String, f64>,
) -> Option<(&'a str, MatchKind, u64)> {
    let mut symbols = Vec::with_capacity(line.cells.len());
    for (reel, row) in &line.cells {
        symbols.push(grid.get(*reel)?[row.offset()].as_str());
    }
    let first = *symbols.first()?;

    if symbols.iter().all(|s| *s == first) {
        return Some((first, MatchKind::Full, line_amount(bet, table.multiplier(first))));
    }

    // Highest paying pair only; two pairs can coexist from four reels up.
    symbols
        .iter()
        .filter_map(|s| {
            let multiplier = pair_payouts.get(*s)?;
            let count = symbols.iter().filter(|o| *o == s).count();
            (count >= 2).then(|| (*s, line_amount(bet, *multiplier)))
        })
        .filter(|(_, amount)| *amount > 0)
        .max_by_key(|(_, amount)| *amount)
        .map(|(s, amount)| (s, MatchKind::Pair, amount))
}

/// Evaluate every payline against the final grid and total the payout.
///
/// A full line always counts as winning, even if its symbol pays nothing;
/// a pair only counts when it pays.
pub fn evaluate(
    grid: &[[String; 3]],
    bet: u64,
    table: &PayoutTable,
    lines: &[Payline],
    pair_payouts: &HashMap<String, f64>,
) -> SpinOutcome {
    let mut outcome = SpinOutcome {
        bet,
        grid: grid.to_vec(),
        ..SpinOutcome::default()
    };

    for (index, line) in lines.iter().enumerate() {
        let Some((symbol, kind, amount)) = evaluate_line(grid, line, bet, table, pair_payouts) else {
            continue;
        };
        outcome.payout += amount;
        outcome.winning_lines.push(index);
        outcome.line_wins.push(LineWin {
            line: index,
            symbol: symbol.to_string(),
            kind,
            amount,
        });
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(a: &str, b: &str, c: &str) -> [String; 3] {
        [a.to_string(), b.to_string(), c.to_string()]
    }

    fn table(pairs: &[(&str, f64)]) -> PayoutTable {
        PayoutTable::from_multipliers(pairs.iter().map(|(s, m)| (s.to_string(), *m)).collect())
    }

    #[test]
    fn top_row_sevens_pay_bet_times_multiplier() {
        let grid = [col("7", "bell", "lemon"), col("7", "cherry", "bell"), col("7", "lemon", "cherry")];
        let outcome = evaluate(&grid, 10, &table(&[("7", 300.0)]), &Payline::standard(3), &HashMap::new());
        assert_eq!(outcome.payout, 3000);
        assert_eq!(outcome.winning_lines, vec![0]);
        assert_eq!(outcome.line_wins[0].symbol, "7");
        assert_eq!(outcome.line_wins[0].kind, MatchKind::Full);
    }

    #[test]
    fn lines_stack() {
        // Top row and down-diagonal both read 7,7,7.
        let grid = [col("7", "a", "b"), col("7", "7", "c"), col("7", "d", "7")];
        let outcome = evaluate(&grid, 2, &table(&[("7", 5.0)]), &Payline::standard(3), &HashMap::new());
        assert_eq!(outcome.winning_lines, vec![0, 3]);
        assert_eq!(outcome.payout, 20);
    }

    #[test]
    fn fractional_multiplier_is_floored() {
        let grid = [col("x", "a", "b"), col("x", "c", "d"), col("x", "e", "f")];
        let outcome = evaluate(&grid, 3, &table(&[("x", 1.5)]), &Payline::standard(3), &HashMap::new());
        assert_eq!(outcome.payout, 4);
    }

    #[test]
    fn unlisted_symbol_matches_but_pays_nothing() {
        let grid = [col("x", "a", "b"), col("x", "c", "d"), col("x", "e", "f")];
        let outcome = evaluate(&grid, 10, &PayoutTable::default(), &Payline::standard(3), &HashMap::new());
        assert_eq!(outcome.payout, 0);
        assert_eq!(outcome.winning_lines, vec![0]);
    }

    #[test]
    fn pair_rule_only_on_partial_lines() {
        let pairs: HashMap<String, f64> = [("cherry".to_string(), 2.0)].into_iter().collect();
        let grid = [col("cherry", "a", "b"), col("cherry", "c", "d"), col("lemon", "e", "f")];
        let outcome = evaluate(&grid, 5, &table(&[("cherry", 10.0)]), &Payline::standard(3), &pairs);
        assert_eq!(outcome.payout, 10);
        assert_eq!(outcome.line_wins[0].kind, MatchKind::Pair);

        let full = [col("cherry", "a", "b"), col("cherry", "c", "d"), col("cherry", "e", "f")];
        let outcome = evaluate(&full, 5, &table(&[("cherry", 10.0)]), &Payline::standard(3), &pairs);
        assert_eq!(outcome.payout, 50);
        assert_eq!(outcome.line_wins[0].kind, MatchKind::Full);
    }

    #[test]
    fn no_partial_payout_by_default() {
        let grid = [col("7", "a", "b"), col("7", "c", "d"), col("bell", "e", "f")];
        let outcome = evaluate(&grid, 10, &table(&[("7", 100.0)]), &Payline::standard(3), &HashMap::new());
        assert_eq!(outcome.payout, 0);
        assert!(outcome.winning_lines.is_empty());
    }

    #[test]
    fn weights_derive_multipliers() {
        let weights: HashMap<String, f64> =
            [("7", 1.0), ("bell", 5.0), ("lemon", 300.0), ("none", 0.0)]
                .into_iter()
                .map(|(s, w)| (s.to_string(), w))
                .collect();
        let t = PayoutTable::from_weights(&weights, 100.0);
        assert_eq!(t.multiplier("7"), 100.0);
        assert_eq!(t.multiplier("bell"), 20.0);
        assert_eq!(t.multiplier("lemon"), 1.0);
        assert_eq!(t.multiplier("none"), 0.0);
    }

    #[test]
    fn standard_lines_by_reel_count() {
        assert_eq!(Payline::standard(3).len(), 5);
        assert_eq!(Payline::standard(5).len(), 3);
        assert_eq!(Payline::standard(5)[1], Payline::horizontal(5, Row::Middle));
    }

    #[test]
    fn configured_lines_must_cover_every_reel() {
        let cfg = PayoutConfig {
            paylines: Some(vec![vec![Row::Top, Row::Top, Row::Top], vec![Row::Middle]]),
            ..PayoutConfig::default()
        };
        let lines = Payline::from_config(&cfg, 3);
        assert_eq!(lines, vec![Payline::horizontal(3, Row::Top)]);
    }
}
