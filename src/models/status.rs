//! Lifecycle status enumeration shared by publishable content entities.
//!
//! Courses, quizzes, assignments, and training programs all move through the
//! same editorial lifecycle. The transition rules are enforced by the service
//! layer via [`LifecycleStatus::can_transition`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Editorial lifecycle of publishable content.
///
/// Legal transitions:
/// - `Draft → InReview` (submit for review)
/// - `InReview → Draft` (send back for edits)
/// - `InReview → Published` (approve)
/// - `Published → Archived` (retire)
///
/// Everything else is rejected as an illegal state change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStatus {
    Draft,
    InReview,
    Published,
    Archived,
}

impl LifecycleStatus {
    /// Check whether moving from `self` to `next` is a legal transition.
    pub fn can_transition(self, next: LifecycleStatus) -> bool {
        use LifecycleStatus::*;
        matches!(
            (self, next),
            (Draft, InReview) | (InReview, Draft) | (InReview, Published) | (Published, Archived)
        )
    }

    /// Wire representation, matching the serde rename.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Draft => "DRAFT",
            LifecycleStatus::InReview => "IN_REVIEW",
            LifecycleStatus::Published => "PUBLISHED",
            LifecycleStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(LifecycleStatus::Draft),
            "IN_REVIEW" => Ok(LifecycleStatus::InReview),
            "PUBLISHED" => Ok(LifecycleStatus::Published),
            "ARCHIVED" => Ok(LifecycleStatus::Archived),
            other => Err(format!("Unknown lifecycle status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [LifecycleStatus; 4] = [
        LifecycleStatus::Draft,
        LifecycleStatus::InReview,
        LifecycleStatus::Published,
        LifecycleStatus::Archived,
    ];

    #[test]
    fn test_happy_path_chain() {
        assert!(LifecycleStatus::Draft.can_transition(LifecycleStatus::InReview));
        assert!(LifecycleStatus::InReview.can_transition(LifecycleStatus::Published));
        assert!(LifecycleStatus::Published.can_transition(LifecycleStatus::Archived));
    }

    #[test]
    fn test_review_rejection_goes_back_to_draft() {
        assert!(LifecycleStatus::InReview.can_transition(LifecycleStatus::Draft));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!LifecycleStatus::Draft.can_transition(LifecycleStatus::Published));
        assert!(!LifecycleStatus::Draft.can_transition(LifecycleStatus::Archived));
        assert!(!LifecycleStatus::Published.can_transition(LifecycleStatus::Draft));
        assert!(!LifecycleStatus::Archived.can_transition(LifecycleStatus::Draft));
        assert!(!LifecycleStatus::Archived.can_transition(LifecycleStatus::Published));
    }

    #[test]
    fn test_round_trip_str() {
        for status in ALL {
            let parsed: LifecycleStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    proptest! {
        // No status may transition to itself, and Archived is terminal.
        #[test]
        fn prop_no_self_transitions(idx in 0usize..4) {
            let status = ALL[idx];
            prop_assert!(!status.can_transition(status));
            prop_assert!(!LifecycleStatus::Archived.can_transition(status));
        }
    }
}
