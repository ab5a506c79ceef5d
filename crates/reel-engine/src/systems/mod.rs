pub mod payout;
pub mod scheduler;
pub mod selector;
