// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0
//
// == FILE PURPOSE ==
// This file: Universal result and error types for all HiveReg modules
// Architecture: Foundation layer - no dependencies on other HiveReg modules
// Data Flow: Every fallible operation returns HiveResult<T>; the dispatch
// layer maps HiveError to the numeric wire code expected by clients

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Standard Result type for all HiveReg operations.
pub type HiveResult<T> = Result<T, HiveError>;

/// Standard Error types across all modules.
///
/// Each variant corresponds to one wire error code (see `code()`); the
/// structured fields carry the human-readable context that the original
/// numeric codes could not.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum HiveError {
    /// Key or value lookup failed.
    #[error("Path not found: {path}")]
    NotFound { path: String },

    /// Deleting a root key, or a key that still has subkeys.
    #[error("Access denied: {reason}")]
    AccessDenied { reason: String },

    /// Allocation refused, including oversized request data.
    #[error("Out of memory: requested {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Enumeration index past the last element.
    #[error("No more items")]
    NoMoreItems,

    /// Snapshot load rejected before any line was applied.
    #[error("Not a registry file: {reason}")]
    NotRegistryFile { reason: String },

    /// Operation through a handle whose key has been detached.
    #[error("Key has been deleted")]
    KeyDeleted,

    /// Non-volatile key requested below a volatile parent.
    #[error("Cannot create a non-volatile key under a volatile parent")]
    ChildMustBeVolatile,

    /// File system or I/O operation error.
    #[error("I/O error during operation '{operation}' on path '{path}': {reason}")]
    IoError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Data parsing error.
    #[error("Parse error for input '{input}': {reason}")]
    ParseError { input: String, reason: String },

    /// Invalid CLI command or parameters.
    #[error("Invalid command '{command}': {reason}")]
    InvalidCommand { command: String, reason: String },
}

impl HiveError {
    /// Returns the numeric wire code for this error.
    ///
    /// ## Output
    /// - `u32`: Win32-compatible error code surfaced to registry clients
    pub fn code(&self) -> u32 {
        match self {
            HiveError::NotFound { .. } => 2,
            HiveError::AccessDenied { .. } => 5,
            HiveError::OutOfMemory { .. } => 14,
            HiveError::IoError { .. } => 29,
            HiveError::ParseError { .. } => 87,
            HiveError::InvalidCommand { .. } => 87,
            HiveError::NoMoreItems => 259,
            HiveError::NotRegistryFile { .. } => 1017,
            HiveError::KeyDeleted => 1018,
            HiveError::ChildMustBeVolatile => 1021,
        }
    }
}

// == HELPER FUNCTIONS ==

/// Returns current Unix timestamp in seconds.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// == CONVENIENCE FUNCTIONS ==

/// Creates a NotFound error.
pub fn not_found(path: impl Into<String>) -> HiveError {
    HiveError::NotFound { path: path.into() }
}

/// Creates an AccessDenied error.
pub fn access_denied(reason: impl Into<String>) -> HiveError {
    HiveError::AccessDenied {
        reason: reason.into(),
    }
}

/// Creates an OutOfMemory error.
pub fn out_of_memory(requested: usize) -> HiveError {
    HiveError::OutOfMemory { requested }
}

/// Creates a NotRegistryFile error.
pub fn not_registry_file(reason: impl Into<String>) -> HiveError {
    HiveError::NotRegistryFile {
        reason: reason.into(),
    }
}

/// Creates an IoError.
pub fn io_error(
    operation: impl Into<String>,
    path: impl Into<String>,
    reason: impl Into<String>,
) -> HiveError {
    HiveError::IoError {
        operation: operation.into(),
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a ParseError.
pub fn parse_error(input: impl Into<String>, reason: impl Into<String>) -> HiveError {
    HiveError::ParseError {
        input: input.into(),
        reason: reason.into(),
    }
}

/// Creates an InvalidCommand error.
pub fn invalid_command(command: impl Into<String>, reason: impl Into<String>) -> HiveError {
    HiveError::InvalidCommand {
        command: command.into(),
        reason: reason.into(),
    }
}

/// Automatic conversion from std::io::Error to HiveError.
impl From<std::io::Error> for HiveError {
    fn from(err: std::io::Error) -> Self {
        HiveError::IoError {
            operation: "io".to_string(),
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}
