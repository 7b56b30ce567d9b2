use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub use crate::lifecycle::status::InterviewStatus;
use crate::models::feedback::Recommendation;

/// Interview read model: the interview row joined with the candidate,
/// position, assigned interviewers and (when present) its feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: i64,
    pub candidate_id: i64,
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: Option<String>,
    pub position_id: i64,
    pub position_title: String,
    pub company_id: Option<i64>,
    pub interviewer_ids: Vec<i64>,
    pub interviewer_names: Vec<String>,
    pub interview_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: InterviewStatus,
    pub rating: Option<i32>,
    pub recommendation: Option<Recommendation>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Interview {
    pub fn primary_interviewer(&self) -> Option<&str> {
        self.interviewer_names.first().map(String::as_str)
    }

    pub fn has_feedback(&self) -> bool {
        self.recommendation.is_some()
    }
}

/// Natural key used to find or create the interviewed candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateKey {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Natural key used to find or create an interviewer: either a full name or
/// an email address, as typed into the scheduling form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewerKey {
    pub display: String,
    pub first_name: String,
    pub last_name: String,
    pub company_id: Option<i64>,
}

impl InterviewerKey {
    /// Mailbox assigned to interviewers created on the fly.
    pub fn generated_email(&self) -> String {
        let last = if self.last_name.is_empty() {
            "x".to_string()
        } else {
            self.last_name.to_lowercase().replace(' ', ".")
        };
        format!("{}.{}@company.com", self.first_name.to_lowercase(), last)
    }

    pub fn generated_username(&self) -> String {
        format!(
            "{}_{}",
            self.first_name.to_lowercase(),
            self.last_name.to_lowercase().replace(' ', "_")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInterview {
    pub candidate_id: i64,
    pub position_id: i64,
    pub interviewer_ids: Vec<i64>,
    pub company_id: Option<i64>,
    pub interview_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Partial update applied in one write. `expected_status` guards the row:
/// the update only lands when the stored status still matches it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewChanges {
    pub expected_status: Option<InterviewStatus>,
    pub status: Option<InterviewStatus>,
    pub interview_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub candidate_first_name: Option<String>,
    pub candidate_last_name: Option<String>,
    pub candidate_email: Option<String>,
    pub candidate_phone: Option<String>,
}

impl InterviewChanges {
    pub fn touches_candidate(&self) -> bool {
        self.candidate_first_name.is_some()
            || self.candidate_last_name.is_some()
            || self.candidate_email.is_some()
            || self.candidate_phone.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewFilter {
    pub search: Option<String>,
    pub status: Option<InterviewStatus>,
    pub candidate_id: Option<i64>,
}

impl InterviewFilter {
    /// Case-insensitive match on candidate, position and interviewer names.
    pub fn matches(&self, interview: &Interview) -> bool {
        if let Some(status) = self.status {
            if interview.status != status {
                return false;
            }
        }
        if let Some(candidate_id) = self.candidate_id {
            if interview.candidate_id != candidate_id {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                interview.candidate_name.to_lowercase().contains(&term)
                    || interview.position_title.to_lowercase().contains(&term)
                    || interview
                        .interviewer_names
                        .iter()
                        .any(|name| name.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DashboardStats {
    pub total_interviews: i64,
    pub scheduled_count: i64,
    pub completed_count: i64,
    pub this_week_count: i64,
}
