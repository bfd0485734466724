//! Stable duration type for the wire protocol.
//!
//! [`DurationMs`] serializes as a plain integer (milliseconds), not serde's
//! internal `{"secs": N, "nanos": N}` format — stable and portable across
//! languages on the other end of a blueprint or trace export.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Duration in milliseconds with a stable JSON serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMs(u64);

impl DurationMs {
    /// Zero duration.
    pub const ZERO: Self = Self(0);

    /// Create from milliseconds.
    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Get the value in milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Convert to `std::time::Duration`.
    pub fn to_std(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl From<Duration> for DurationMs {
    fn from(d: Duration) -> Self {
        Self(d.as_millis() as u64)
    }
}

impl From<DurationMs> for Duration {
    fn from(d: DurationMs) -> Self {
        Duration::from_millis(d.0)
    }
}

impl Default for DurationMs {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for DurationMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_is_plain_integer() {
        let d = DurationMs::from_millis(1500);
        assert_eq!(d.as_millis(), 1500);
        assert_eq!(serde_json::to_string(&d).unwrap(), "1500");
    }

    #[test]
    fn roundtrips_through_std_duration() {
        let d: DurationMs = Duration::from_secs(2).into();
        let back: Duration = d.into();
        assert_eq!(back, Duration::from_secs(2));
    }
}
