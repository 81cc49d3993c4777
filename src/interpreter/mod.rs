//! The remote interpret operation and the transport seam behind it.

pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body sent to the interpreter service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretRequest {
    pub input: String,
}

impl InterpretRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Successful response from the interpreter service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretResult {
    pub result: String,
}

/// Why an interpret round-trip produced no result.
///
/// The `Display` output is what the user sees in place of a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretError {
    /// The exchange could not complete (unreachable host, refused connection, ...).
    #[error("{0}")]
    Transport(String),
    /// The body was not JSON, or had no string `result`.
    #[error("{0}")]
    Decode(String),
    /// The service answered with its own error envelope.
    #[error("interpreter error ({status}): {detail}")]
    Server { status: u16, detail: String },
}

/// Anything that can run a script remotely. HTTP in production, scripted in tests.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(&self, request: &InterpretRequest) -> Result<InterpretResult, InterpretError>;
}
