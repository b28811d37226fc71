//! Domain error types for gesture-dispatch
//!
//! - `DispatchError` for the child-process plumbing and the dispatch loop
//! - `ActionError` for building actions and selecting presets

use thiserror::Error;

/// Errors from the event source, the action sink and the dispatch loop
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Event source closed")]
    EndOfStream,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to action descriptors
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("Unknown mouse button '{0}'")]
    UnknownButton(String),

    #[error("Unknown preset '{0}' (expected 'decomposed' or 'compact')")]
    UnknownPreset(String),

    #[error("Action has no steps")]
    EmptyAction,
}

/// Result type alias for DispatchError
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;
