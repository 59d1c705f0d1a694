//! Call-rate governor for provider submissions.
//!
//! The governor is advisory: the orchestrator tells it when a record starts
//! and asks it to pace once the record is logged. All state is explicit
//! (a counter and two timestamps) and time comes from an injected [`Clock`].

pub mod clock;
pub mod config;
pub mod error;
pub mod governor;

pub use clock::{Clock, SystemClock};
pub use config::GovernorConfig;
pub use error::GovernorError;
pub use governor::{Pause, ThroughputGovernor};
