//! Severity and priority classification of domain scores.

use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) of the Critical band.
pub const CRITICAL_MAX: f64 = 2.0;

/// Upper bound (inclusive) of the High band.
pub const HIGH_MAX: f64 = 2.5;

/// Upper bound (inclusive) of the Medium band.
pub const MEDIUM_MAX: f64 = 3.5;

/// Qualitative risk label of a domain score.
///
/// Variants are declared from most to least severe, so `Ord` ranks
/// `Critical < High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Classifies a score on the 1..5 scale.
    pub fn from_score(score: f64) -> Self {
        if score <= CRITICAL_MAX {
            Severity::Critical
        } else if score <= HIGH_MAX {
            Severity::High
        } else if score <= MEDIUM_MAX {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Remediation bucket for this severity.
    pub fn priority(&self) -> Priority {
        match self {
            Severity::Critical | Severity::High => Priority::P1,
            Severity::Medium => Priority::P2,
            Severity::Low => Priority::P3,
        }
    }

    /// Returns the display label for this severity.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    /// True for the bands that demand immediate intervention.
    pub fn is_urgent(&self) -> bool {
        matches!(self, Severity::Critical | Severity::High)
    }
}

/// Coarse remediation urgency. `P1 < P2 < P3` in sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    P3,
}

impl Priority {
    /// Returns the display label for this priority.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }
}
