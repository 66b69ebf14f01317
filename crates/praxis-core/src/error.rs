//! Error types for Praxis Core
//!
//! This module defines the error types used throughout the compile pipeline.
//! We use `thiserror` for ergonomic error definitions with automatic Display/Error implementations.
//!
//! Only structural problems surface as errors. Unresolved variables and values the
//! pseudo-syntax generator cannot print degrade to placeholders instead.

use thiserror::Error;

/// Result type alias for Praxis operations
pub type Result<T> = std::result::Result<T, PraxisError>;

/// Main error type for Praxis operations
#[derive(Error, Debug)]
pub enum PraxisError {
    /// Build lifecycle errors
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Include resolution errors
    #[error("Include error: {0}")]
    Include(#[from] IncludeError),

    /// Unknown output format requested
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML serialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        source: Box<PraxisError>,
    },
}

/// Errors raised while driving an archetype through its lifecycle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Invalid lifecycle transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Archetype '{0}' is already finalized and cannot be built again")]
    AlreadyFinalized(String),
}

/// Errors raised while resolving includes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IncludeError {
    #[error("Archetype class not registered: {0}")]
    MissingClass(String),

    #[error("Include cycle detected: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
}

impl PraxisError {
    /// Add context to an error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazy context to a Result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.context(f()))
    }
}
