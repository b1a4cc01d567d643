//! Engine error type
//!
//! The engine is total over data shape: missing sub-records, empty windows,
//! and unknown labels all degrade to documented defaults. The only thing a
//! caller can get wrong is the call itself.

use thiserror::Error;

/// Errors returned by the analytics engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A trailing window was requested with a negative day count.
    #[error("invalid report window: days must be >= 0, got {days}")]
    InvalidWindow { days: i64 },
}
