//! W3C-style trace correlation identifiers.
//!
//! A trace id is 128 bits (32 lowercase hex chars), a span id is 64 bits
//! (16 lowercase hex chars). Generation draws randomness from [`uuid::Uuid`]
//! since it is already the workspace's source of entropy — no separate
//! `rand` dependency.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

fn is_lowercase_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// 128-bit trace identifier, 32 lowercase hex characters.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Generate a fresh, randomly-derived trace id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Validate and wrap an existing trace id string.
    pub fn parse(s: impl Into<String>) -> Result<Self, InvalidTraceId> {
        let s = s.into();
        if is_lowercase_hex(&s, 32) {
            Ok(Self(s))
        } else {
            Err(InvalidTraceId(s))
        }
    }

    /// Borrow the inner hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 64-bit span identifier, 16 lowercase hex characters.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanId(String);

impl SpanId {
    /// Generate a fresh, randomly-derived span id.
    pub fn generate() -> Self {
        let full = Uuid::new_v4().simple().to_string();
        Self(full[..16].to_string())
    }

    /// Validate and wrap an existing span id string.
    pub fn parse(s: impl Into<String>) -> Result<Self, InvalidSpanId> {
        let s = s.into();
        if is_lowercase_hex(&s, 16) {
            Ok(Self(s))
        } else {
            Err(InvalidSpanId(s))
        }
    }

    /// Borrow the inner hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque request correlation id. No format is imposed beyond being a string.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    /// Create a new request id from anything that converts to `String`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The string was not 32 lowercase hex characters.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid trace id (expected 32 lowercase hex chars): {0}")]
pub struct InvalidTraceId(pub String);

/// The string was not 16 lowercase hex characters.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid span id (expected 16 lowercase hex chars): {0}")]
pub struct InvalidSpanId(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_trace_id_is_32_lowercase_hex() {
        let id = TraceId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn generated_span_id_is_16_lowercase_hex() {
        let id = SpanId::generate();
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn rejects_wrong_length_or_case() {
        assert!(TraceId::parse("abc").is_err());
        assert!(TraceId::parse("A".repeat(32)).is_err());
        assert!(SpanId::parse("zz").is_err());
        assert!(TraceId::parse("a".repeat(32)).is_ok());
        assert!(SpanId::parse("b".repeat(16)).is_ok());
    }
}
