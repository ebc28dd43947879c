use crate::core::error::{ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ok,
    InvalidFunction,
    DuplicatedFunction,
    NotExisted,
    ArgsNotMatch,
    ArgEncode,
    AsyncHandler,
    HandlerError,
}

impl From<ErrorKind> for Outcome {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidFunction => Outcome::InvalidFunction,
            ErrorKind::DuplicatedFunction => Outcome::DuplicatedFunction,
            ErrorKind::NotExisted => Outcome::NotExisted,
            ErrorKind::ArgsNotMatch => Outcome::ArgsNotMatch,
            ErrorKind::ArgEncode => Outcome::ArgEncode,
            ErrorKind::AsyncHandler => Outcome::AsyncHandler,
            ErrorKind::Handler => Outcome::HandlerError,
        }
    }
}

/// A single entry in the invocation trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationTrace {
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub fn_id: String,
    pub temperature: bool,
    pub payload_count: usize,
    pub outcome: Outcome,
    pub elapsed_micros: u64,
    /// Rendered error, if the invocation failed.
    pub error: Option<String>,
}

impl InvocationTrace {
    pub(crate) fn new(
        fn_id: &str,
        temperature: bool,
        payload_count: usize,
        elapsed: Duration,
        result: &Result<()>,
    ) -> Self {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self {
            timestamp,
            fn_id: fn_id.to_string(),
            temperature,
            payload_count,
            outcome: match result {
                Ok(()) => Outcome::Ok,
                Err(err) => err.kind().into(),
            },
            elapsed_micros: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
            error: result.as_ref().err().map(ToString::to_string),
        }
    }
}

/// Trait for recording invocation traces.
pub trait Telemetry: Send + Sync {
    fn record(&self, entry: InvocationTrace);
    fn flush(&self);
}

/// Simple in-memory collector for traces.
#[derive(Default)]
pub struct MemoryTelemetry {
    traces: std::sync::Mutex<Vec<InvocationTrace>>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_traces(&self) -> Vec<InvocationTrace> {
        self.traces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Telemetry for MemoryTelemetry {
    fn record(&self, entry: InvocationTrace) {
        self.traces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }

    fn flush(&self) {
        // No-op for memory collector
    }
}
