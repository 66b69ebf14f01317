//! Core types for Praxis
//!
//! Shared enums used by the node model and the build lifecycle:
//! - Rule severity
//! - Archetype lifecycle state

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rule severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Backing value used for attributes and data formats
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Marker shown next to a rule header in pseudo-xml
    pub fn marker(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::High
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

impl From<Severity> for serde_json::Value {
    fn from(severity: Severity) -> Self {
        serde_json::Value::String(severity.as_str().to_string())
    }
}

/// Archetype lifecycle state
///
/// States only move forward, one step at a time. `Finalized` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Unbuilt,
    AttributesExtracted,
    Initialized,
    Handled,
    Finalized,
}

impl LifecycleState {
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Unbuilt, AttributesExtracted)
                | (AttributesExtracted, Initialized)
                | (Initialized, Handled)
                | (Handled, Finalized)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Finalized)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_backing_values() {
        assert_eq!(Severity::Critical.as_str(), "critical");
        assert_eq!(Severity::Low.marker(), "LOW");
        assert_eq!(
            serde_json::to_value(Severity::Medium).unwrap(),
            serde_json::Value::from(Severity::Medium)
        );
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("CRITICAL".parse::<Severity>(), Ok(Severity::Critical));
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_lifecycle_moves_forward_only() {
        use LifecycleState::*;
        assert!(Unbuilt.can_transition_to(AttributesExtracted));
        assert!(Handled.can_transition_to(Finalized));
        assert!(!Unbuilt.can_transition_to(Handled));
        assert!(!Finalized.can_transition_to(Unbuilt));
        assert!(!Initialized.can_transition_to(Initialized));
        assert!(Finalized.is_terminal());
    }
}
