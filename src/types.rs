//! Common types used throughout the snapshot crate
//!
//! Shared type aliases and small configuration enums used by more than one
//! module.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One loosely-typed constituent record exactly as the API returned it
pub type RawRecord = JsonObject;

// ============================================================================
// Log Level
// ============================================================================

/// Log level for the process-wide subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Sink Format
// ============================================================================

/// Which sink variant persists the snapshot
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    /// Row-oriented delimited text, no typed schema enforcement
    #[default]
    Csv,
    /// Typed columnar Parquet with a processing-date partition
    Parquet,
}

impl std::fmt::Display for SinkFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkFormat::Csv => write!(f, "csv"),
            SinkFormat::Parquet => write!(f, "parquet"),
        }
    }
}

// ============================================================================
// Schema Violation Policy
// ============================================================================

/// What the schema mapper does with a record it cannot coerce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationPolicy {
    /// Drop the record, log it, keep the rest of the dataset
    #[default]
    Drop,
    /// Fail the run on the first violation
    Abort,
}
