//! Error types for ID generation.
//!
//! The core generator surfaces exactly two failure cases, both returned
//! synchronously to the immediate caller:
//!
//! - `InvalidWorkerId`: the supplied worker ID does not fit its bit field.
//! - `ClockRegression`: the clock moved backward relative to the last
//!   successful generation.
//!
//! Worker-ID resolution has its own [`ResolveError`] since it reads host
//! state outside the generator.

use std::net::IpAddr;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors produced by the core generator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The supplied worker ID exceeds the 16-bit worker field.
    ///
    /// Not retryable without a corrected value.
    #[error("invalid worker id {worker_id}: must be at most {max}")]
    InvalidWorkerId { worker_id: u64, max: u64 },

    /// The clock reported a time earlier than the last successful
    /// generation.
    ///
    /// The failed call leaves generator state untouched. Recovery (retry,
    /// backoff, alerting) belongs to the caller; the generator never waits
    /// out or papers over a backward step.
    #[error("clock moved backwards: last generated at {last} ms, observed {observed} ms")]
    ClockRegression { last: u64, observed: u64 },
}

/// Errors from deriving a worker ID out of host network configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// Socket setup or local address lookup failed.
    #[error("worker id lookup failed: {0}")]
    Io(#[from] std::io::Error),

    /// The egress interface has no usable (non-loopback IPv4) address.
    #[error("no usable IPv4 address on the egress interface (got {addr})")]
    NoUsableIpv4 { addr: IpAddr },
}
