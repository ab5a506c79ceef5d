pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod extensions;
pub mod input;
pub mod reel;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::machine::SlotMachine;
pub use api::types::{SlotEvent, WireEvent};
pub use config::{AutoStopConfig, ForcedTargetConfig, PayoutConfig, SlotConfig, StopMode, TimingConfig, WinConfig};
pub use core::time::{FixedTimestep, FRAME_MS};
pub use error::{ConfigError, SpinError};
pub use input::queue::{InputEvent, InputQueue};
pub use reel::{normalize_offset, Reel, ReelPhase, Resolution, Rotation, Row, StopTarget, TargetKind};
pub use systems::payout::{evaluate, LineWin, MatchKind, Payline, PayoutTable, SpinOutcome};
pub use systems::scheduler::schedule_auto_stops;
pub use systems::selector::{pick_win_symbol, plan_spin, roll_win_type, DiagonalDirection, SpinPlan, StagedWin, WinType};

pub use extensions::{ease, lerp, Easing, PositionTween};
