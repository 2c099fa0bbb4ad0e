//! JSON message shapes on the duplex scan channel.

use serde::{Deserialize, Serialize};

use common::{ScanLogEntry, ScannerConfig, Signal, SignalContext};

/// Client → server messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Run one scan cycle with the given configuration.
    Scan {
        config: ScannerConfig,
        #[serde(default)]
        muted_assets: Vec<String>,
    },
    /// Report the outcome of a prior signal. `direction` and `result`
    /// arrive as raw strings and are validated before anything is
    /// appended to the history.
    Feedback {
        asset: String,
        direction: String,
        result: String,
        #[serde(default)]
        context: Option<SignalContext>,
    },
}

/// Server → client messages.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// One scan cycle's result: at most one signal plus the full audit
    /// log in evaluation order.
    ScanResult {
        signal: Option<Signal>,
        log: Vec<ScanLogEntry>,
    },
    /// Feedback accepted; `total` is the new history size.
    FeedbackAck { total: usize },
    /// Validation failure or malformed message. The history is left
    /// untouched.
    Error { message: String },
}
