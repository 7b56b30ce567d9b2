use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lifecycle::status::InterviewStatus;
use crate::models::feedback::Feedback;
use crate::models::interview::Interview;

/// Candidate-level pipeline label. Computed on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedCandidateStatus {
    Applied,
    InterviewScheduled,
    InterviewPending,
    FeedbackPending,
    UnderReview,
    Selected,
    Rejected,
    InterviewCanceled,
}

impl DerivedCandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DerivedCandidateStatus::Applied => "applied",
            DerivedCandidateStatus::InterviewScheduled => "interview_scheduled",
            DerivedCandidateStatus::InterviewPending => "interview_pending",
            DerivedCandidateStatus::FeedbackPending => "feedback_pending",
            DerivedCandidateStatus::UnderReview => "under_review",
            DerivedCandidateStatus::Selected => "selected",
            DerivedCandidateStatus::Rejected => "rejected",
            DerivedCandidateStatus::InterviewCanceled => "interview_canceled",
        }
    }
}

impl fmt::Display for DerivedCandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The candidate's most recent interview: latest scheduled time, ties broken
/// by the higher id.
pub fn latest_interview(interviews: &[Interview]) -> Option<&Interview> {
    interviews
        .iter()
        .max_by_key(|interview| (interview.interview_date, interview.id))
}

/// Derives the pipeline label from one candidate's interviews and feedback.
///
/// Only the most recent interview matters. A completed interview is judged by
/// the feedback recorded against that interview; feedback on older interviews
/// is ignored. No-shows read as a canceled interview.
pub fn derive_candidate_status(
    interviews: &[Interview],
    feedbacks: &[Feedback],
    now: DateTime<Utc>,
) -> DerivedCandidateStatus {
    let Some(latest) = latest_interview(interviews) else {
        return DerivedCandidateStatus::Applied;
    };

    match latest.status {
        InterviewStatus::Scheduled if latest.interview_date > now => {
            DerivedCandidateStatus::InterviewScheduled
        }
        InterviewStatus::Scheduled => DerivedCandidateStatus::InterviewPending,
        InterviewStatus::Completed => {
            let feedback = feedbacks
                .iter()
                .filter(|f| f.interview_id == latest.id)
                .max_by_key(|f| (f.created_at, f.id));
            match feedback.map(|f| f.recommendation) {
                None => DerivedCandidateStatus::FeedbackPending,
                Some(r) if r.is_positive() => DerivedCandidateStatus::Selected,
                Some(r) if r.is_negative() => DerivedCandidateStatus::Rejected,
                Some(_) => DerivedCandidateStatus::UnderReview,
            }
        }
        InterviewStatus::Canceled | InterviewStatus::NoShow => {
            DerivedCandidateStatus::InterviewCanceled
        }
    }
}
