use std::sync::Arc;

use rand::Rng;

use crate::api::types::SlotEvent;
use crate::config::{SlotConfig, StopMode};
use crate::core::rng::{seeded, SlotRng};
use crate::error::{ConfigError, SpinError};
use crate::input::queue::{InputEvent, KEY_DIGIT_1, KEY_DIGIT_9, KEY_ENTER, KEY_SPACE};
use crate::reel::{Reel, Rotation};
use crate::systems::payout::{evaluate, Payline, PayoutTable, SpinOutcome};
use crate::systems::scheduler::schedule_auto_stops;
use crate::systems::selector::{plan_spin, SpinPlan};

const DEFAULT_SEED: u64 = 0x5107_5EED;

/// State of the spin in progress. Dropped once the payout is settled.
#[derive(Debug)]
struct Spin {
    bet: u64,
    mode: StopMode,
    elapsed_ms: f64,
    /// Automatic stop times in ms from spin start; empty in manual mode.
    schedule: Vec<f64>,
    stop_requested: Vec<bool>,
    plan: SpinPlan,
    manual_stops: usize,
}

/// The slot machine core: reels, spin lifecycle, credits and events.
///
/// Time only moves through [`SlotMachine::advance`], so a test can drive a
/// whole spin with a fixed clock.
pub struct SlotMachine {
    config: SlotConfig,
    reels: Vec<Reel>,
    rng: SlotRng,
    stop_mode: StopMode,
    table: PayoutTable,
    lines: Vec<Payline>,
    credits: u64,
    last_bet: u64,
    spin: Option<Spin>,
    events: Vec<SlotEvent>,
    last_outcome: Option<SpinOutcome>,
}

impl SlotMachine {
    /// Build a machine from a validated configuration.
    /// Uses `config.seed` when set, otherwise a fixed seed.
    pub fn new(config: SlotConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        Self::with_seed(config, seed)
    }

    /// Build a machine with a host-supplied seed. `config.seed` takes precedence.
    pub fn with_seed(config: SlotConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or(seed);
        let rotation = Rotation::from_reverse_flag(config.reverse_rotation);
        let mut rng = seeded(seed);

        // Reels without a configured start rest at a random strip index.
        let mut reels = Vec::with_capacity(config.reels.len());
        for (i, symbols) in config.reels.iter().enumerate() {
            let strip: Arc<[String]> = symbols.clone().into();
            let mut reel = Reel::new(strip, config.symbol_height, rotation, config.timing.clone());
            let index = match config.initial_positions.get(i) {
                Some(index) => *index,
                None => rng.gen_range(0..symbols.len()),
            };
            reel.place_at_index(index);
            reels.push(reel);
        }

        let table = PayoutTable::from_config(&config.payouts, &config.win);
        let lines = Payline::from_config(&config.payouts, reels.len());

        log::info!(
            "slot machine ready: {} reels, {} paylines, {:?} stops, seed {seed}",
            reels.len(),
            lines.len(),
            config.stop_mode
        );

        Ok(Self {
            reels,
            rng,
            stop_mode: config.stop_mode,
            table,
            lines,
            credits: config.starting_credits,
            last_bet: config.default_bet,
            spin: None,
            events: Vec::new(),
            last_outcome: None,
            config,
        })
    }

    /// Parse, validate and build in one step.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(SlotConfig::from_json(json)?)
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    pub fn stop_mode(&self) -> StopMode {
        self.stop_mode
    }

    /// True from an accepted spin request until its payout is settled.
    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    /// Switch between automatic and manual stops. Only allowed between spins.
    pub fn set_stop_mode(&mut self, mode: StopMode) -> bool {
        if self.spin.is_some() {
            log::warn!("stop mode change to {mode:?} ignored while spinning");
            return false;
        }
        self.stop_mode = mode;
        true
    }

    /// Accept a bet and start every reel.
    pub fn request_spin_start(&mut self, bet: u64) -> Result<(), SpinError> {
        if self.spin.is_some() {
            return Err(SpinError::AlreadySpinning);
        }
        if bet == 0 {
            return Err(SpinError::ZeroBet);
        }
        if bet > self.credits {
            return Err(SpinError::InsufficientCredits { bet, balance: self.credits });
        }

        self.credits -= bet;
        self.last_bet = bet;

        let plan = plan_spin(
            &self.config.reels,
            &self.config.win,
            &self.config.forced_targets,
            &mut self.rng,
        );
        let schedule = match self.stop_mode {
            StopMode::Auto => schedule_auto_stops(self.reels.len(), &self.config.auto_stop, &mut self.rng),
            StopMode::Manual => Vec::new(),
        };

        for reel in &mut self.reels {
            reel.start_spin();
        }

        log::info!("spin started: bet {bet}, balance {}", self.credits);
        self.spin = Some(Spin {
            bet,
            mode: self.stop_mode,
            elapsed_ms: 0.0,
            schedule,
            stop_requested: vec![false; self.reels.len()],
            plan,
            manual_stops: 0,
        });
        self.events.push(SlotEvent::SpinStarted { bet, balance: self.credits });
        Ok(())
    }

    /// Stop one reel in manual mode. `None` stops the next reel, left to right.
    ///
    /// Returns false when there is nothing to stop: no spin, automatic mode,
    /// an unknown reel, or a reel already stopping.
    pub fn request_manual_stop(&mut self, reel: Option<usize>) -> bool {
        let Some(spin) = &self.spin else {
            return false;
        };
        if spin.mode != StopMode::Manual {
            log::debug!("manual stop ignored in automatic mode");
            return false;
        }
        let index = match reel {
            Some(i) if i >= self.reels.len() => {
                log::warn!("manual stop for reel {i}, machine has {}", self.reels.len());
                return false;
            }
            Some(i) => i,
            None => match spin.stop_requested.iter().position(|requested| !requested) {
                Some(i) => i,
                None => return false,
            },
        };
        let stopped = self.stop_reel(index, None);
        if stopped {
            if let Some(spin) = &mut self.spin {
                spin.manual_stops += 1;
                log::debug!("manual stop {} on reel {index}", spin.manual_stops);
            }
        }
        stopped
    }

    /// Send one reel into deceleration towards its planned target.
    fn stop_reel(&mut self, index: usize, floor_ms: Option<f64>) -> bool {
        let Some(spin) = &mut self.spin else {
            return false;
        };
        if spin.stop_requested.get(index).copied().unwrap_or(true) {
            return false;
        }
        let target = spin.plan.targets.get(index).and_then(Option::as_ref);
        let Some(reel) = self.reels.get_mut(index) else {
            return false;
        };
        if reel.request_stop(target, floor_ms).is_none() {
            return false;
        }
        spin.stop_requested[index] = true;
        true
    }

    /// Apply one player action.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), SpinError> {
        match event {
            InputEvent::Spin { bet } => self.request_spin_start(bet),
            InputEvent::StopNext => {
                self.request_manual_stop(None);
                Ok(())
            }
            InputEvent::StopReel { reel } => {
                self.request_manual_stop(Some(reel));
                Ok(())
            }
            InputEvent::KeyDown { key_code } => match key_code {
                KEY_ENTER | KEY_SPACE if self.spin.is_none() => self.request_spin_start(self.last_bet),
                KEY_ENTER | KEY_SPACE => {
                    self.request_manual_stop(None);
                    Ok(())
                }
                KEY_DIGIT_1..=KEY_DIGIT_9 => {
                    self.request_manual_stop(Some((key_code - KEY_DIGIT_1) as usize));
                    Ok(())
                }
                _ => Ok(()),
            },
        }
    }

    /// Advance the whole machine by `dt_ms`.
    ///
    /// Due automatic stops fire first so each reel switches phase from the
    /// position it held at the end of the previous tick. Every reel that
    /// comes to rest emits an event and triggers a settlement check.
    pub fn advance(&mut self, dt_ms: f64) {
        let due: Vec<usize> = match &mut self.spin {
            Some(spin) => {
                spin.elapsed_ms += dt_ms.max(0.0);
                spin.schedule
                    .iter()
                    .enumerate()
                    .filter(|(i, at)| !spin.stop_requested[*i] && spin.elapsed_ms >= **at)
                    .map(|(i, _)| i)
                    .collect()
            }
            None => Vec::new(),
        };
        let floor = Some(self.config.timing.base_deceleration_ms);
        for index in due {
            self.stop_reel(index, floor);
        }

        for index in 0..self.reels.len() {
            if self.reels[index].advance(dt_ms) {
                let reel = &self.reels[index];
                self.events.push(SlotEvent::ReelStopped {
                    reel: index,
                    top_index: reel.top_index(),
                    symbols: reel.visible_symbols(),
                });
                self.check_all_stopped();
            }
        }
    }

    /// Settle the spin if every reel is at rest.
    ///
    /// Returns the outcome on the call that settles it and `None` on every
    /// other call, so redundant polling never pays twice.
    pub fn check_all_stopped(&mut self) -> Option<SpinOutcome> {
        let spin = self.spin.as_ref()?;
        let all_stopped = spin.stop_requested.iter().all(|r| *r) && self.reels.iter().all(|r| !r.is_spinning());
        if !all_stopped {
            return None;
        }
        let spin = self.spin.take()?;

        let grid = self.visible_grid();
        let outcome = evaluate(&grid, spin.bet, &self.table, &self.lines, &self.config.payouts.pair_payouts);
        self.credits += outcome.payout;

        if let Some(staged) = &spin.plan.staged {
            log::debug!("staged {:?} win on '{}' settled", staged.win_type, staged.symbol);
        }
        log::info!(
            "spin settled: payout {} on lines {:?}, balance {}",
            outcome.payout,
            outcome.winning_lines,
            self.credits
        );
        self.events.push(SlotEvent::SpinSettled {
            payout: outcome.payout,
            winning_lines: outcome.winning_lines.clone(),
            balance: self.credits,
        });
        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }

    /// Offset to paint for one reel, in [-total_height, 0).
    pub fn visible_offset(&self, reel: usize) -> Option<f64> {
        self.reels.get(reel).map(Reel::visible_offset)
    }

    /// Top, middle and bottom symbols for every reel.
    pub fn visible_grid(&self) -> Vec<[String; 3]> {
        self.reels.iter().map(Reel::visible_symbols).collect()
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<SlotEvent> {
        std::mem::take(&mut self.events)
    }
}
