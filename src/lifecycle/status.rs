use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::UnknownVariant;

/// Persisted status of a single interview.
///
/// `Scheduled` is the only initial state. The three other states are terminal:
/// once an interview is completed, canceled or marked as a no-show it never
/// changes status again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewStatus {
    #[serde(rename = "scheduled")]
    Scheduled,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "canceled", alias = "cancelled")]
    Canceled,
    #[serde(rename = "no-show")]
    NoShow,
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 4] = [
        InterviewStatus::Scheduled,
        InterviewStatus::Completed,
        InterviewStatus::Canceled,
        InterviewStatus::NoShow,
    ];

    pub fn initial() -> Self {
        InterviewStatus::Scheduled
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Canceled => "canceled",
            InterviewStatus::NoShow => "no-show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InterviewStatus::Scheduled)
    }

    pub fn can_transition_to(&self, target: InterviewStatus) -> bool {
        matches!(
            (self, target),
            (
                InterviewStatus::Scheduled,
                InterviewStatus::Completed | InterviewStatus::Canceled | InterviewStatus::NoShow
            )
        )
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(InterviewStatus::Scheduled),
            "completed" => Ok(InterviewStatus::Completed),
            "canceled" | "cancelled" => Ok(InterviewStatus::Canceled),
            "no-show" => Ok(InterviewStatus::NoShow),
            _ => Err(UnknownVariant::new("interview status", s)),
        }
    }
}

crate::text_enum_sqlx!(InterviewStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_scheduled_has_outgoing_transitions() {
        for target in [
            InterviewStatus::Completed,
            InterviewStatus::Canceled,
            InterviewStatus::NoShow,
        ] {
            assert!(InterviewStatus::Scheduled.can_transition_to(target));
        }
        assert!(!InterviewStatus::Scheduled.can_transition_to(InterviewStatus::Scheduled));

        for from in InterviewStatus::ALL.into_iter().filter(InterviewStatus::is_terminal) {
            for to in InterviewStatus::ALL {
                assert!(!from.can_transition_to(to), "{} -> {} must be rejected", from, to);
            }
        }
    }

    #[test]
    fn parses_canonical_names_and_cancelled_spelling() {
        assert_eq!("no-show".parse::<InterviewStatus>().unwrap(), InterviewStatus::NoShow);
        assert_eq!("Cancelled".parse::<InterviewStatus>().unwrap(), InterviewStatus::Canceled);
        assert_eq!(" completed ".parse::<InterviewStatus>().unwrap(), InterviewStatus::Completed);
    }

    #[test]
    fn legacy_labels_are_not_statuses() {
        assert!("pending".parse::<InterviewStatus>().is_err());
        assert!("interview_scheduled".parse::<InterviewStatus>().is_err());
        assert!("rescheduled".parse::<InterviewStatus>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_value(InterviewStatus::NoShow).unwrap(), "no-show");
        let parsed: InterviewStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, InterviewStatus::Canceled);
    }
}
