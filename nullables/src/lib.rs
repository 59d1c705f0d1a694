//! Nullable infrastructure for deterministic testing.
//!
//! The external dependencies of a batch run (clock, provider, audit sink,
//! record source) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be scripted to fail at a chosen call
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod audit;
pub mod clock;
pub mod provider;
pub mod source;

pub use audit::NullAuditSink;
pub use clock::NullClock;
pub use provider::{NullProvider, ProviderCall};
pub use source::{record, NullSource};
