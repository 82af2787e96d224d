use thiserror::Error;

/// Unified error type for the arena-curve-core library.
///
/// The alignment engine itself never fails: malformed snapshots are dropped
/// or coerced. Errors only surface at the edges (fetching, decoding,
/// configuration).
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Decoding ────────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; the query string may hold
        // account filters or tokens, so strip it.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Replace everything after the first `?` with a redaction marker.
pub fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
