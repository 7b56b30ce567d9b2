use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};
use crate::lifecycle::{InterviewDraft, InterviewStatus, InterviewUpdate};
use crate::models::feedback::Recommendation;
use crate::models::interview::{Interview, InterviewFilter};

/// Scheduling form. Required fields are checked by the lifecycle engine so
/// that a missing field and a blank one get the same message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateInterviewPayload {
    #[validate(length(max = 200))]
    pub candidate_name: String,
    #[validate(length(max = 320))]
    pub candidate_email: String,
    #[validate(length(max = 50))]
    pub candidate_phone: Option<String>,
    #[validate(length(max = 200))]
    pub position: String,
    pub interview_date: String,
    #[validate(length(max = 200))]
    pub interviewer: String,
    pub additional_interviewers: Vec<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

impl From<CreateInterviewPayload> for InterviewDraft {
    fn from(payload: CreateInterviewPayload) -> Self {
        let mut interviewers = vec![payload.interviewer];
        interviewers.extend(payload.additional_interviewers);
        InterviewDraft {
            candidate_name: payload.candidate_name,
            candidate_email: payload.candidate_email,
            candidate_phone: payload.candidate_phone,
            position: payload.position,
            interview_date: payload.interview_date,
            interviewers,
            notes: payload.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateInterviewPayload {
    pub interview_date: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
    #[validate(length(max = 200))]
    pub candidate_name: Option<String>,
    #[validate(length(max = 320))]
    pub candidate_email: Option<String>,
    #[validate(length(max = 50))]
    pub candidate_phone: Option<String>,
    pub status: Option<String>,
}

impl From<UpdateInterviewPayload> for InterviewUpdate {
    fn from(payload: UpdateInterviewPayload) -> Self {
        InterviewUpdate {
            interview_date: payload.interview_date,
            notes: payload.notes,
            candidate_name: payload.candidate_name,
            candidate_email: payload.candidate_email,
            candidate_phone: payload.candidate_phone,
            status: payload.status,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl InterviewListQuery {
    pub fn into_filter(self) -> Result<InterviewFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(
                raw.parse::<InterviewStatus>()
                    .map_err(|_| Error::Validation(format!("Unknown status filter: {}", raw)))?,
            ),
        };
        Ok(InterviewFilter {
            search: self.search,
            status,
            candidate_id: None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResponse {
    pub id: i64,
    pub candidate_id: i64,
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: Option<String>,
    pub position_id: i64,
    pub position: String,
    pub interview_date: DateTime<Utc>,
    pub interviewer: Option<String>,
    pub interviewers: Vec<String>,
    pub notes: Option<String>,
    pub status: InterviewStatus,
    pub rating: Option<i32>,
    pub recommendation: Option<Recommendation>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Interview> for InterviewResponse {
    fn from(interview: Interview) -> Self {
        Self {
            interviewer: interview.primary_interviewer().map(str::to_string),
            id: interview.id,
            candidate_id: interview.candidate_id,
            candidate_name: interview.candidate_name,
            candidate_email: interview.candidate_email,
            candidate_phone: interview.candidate_phone,
            position_id: interview.position_id,
            position: interview.position_title,
            interview_date: interview.interview_date,
            interviewers: interview.interviewer_names,
            notes: interview.notes,
            status: interview.status,
            rating: interview.rating,
            recommendation: interview.recommendation,
            feedback: interview.feedback,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingInterview {
    pub id: i64,
    pub candidate_name: String,
    pub position: String,
    pub interview_date: DateTime<Utc>,
    pub interviewer: Option<String>,
    pub status: InterviewStatus,
}

impl From<Interview> for UpcomingInterview {
    fn from(interview: Interview) -> Self {
        Self {
            interviewer: interview.primary_interviewer().map(str::to_string),
            id: interview.id,
            candidate_name: interview.candidate_name,
            position: interview.position_title,
            interview_date: interview.interview_date,
            status: interview.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_collects_all_interviewers() {
        let payload: CreateInterviewPayload = serde_json::from_value(serde_json::json!({
            "candidateName": "Ada Lovelace",
            "candidateEmail": "ada@example.com",
            "position": "Engineer",
            "interviewDate": "2030-01-01T10:00",
            "interviewer": "Grace Hopper",
            "additionalInterviewers": ["Alan Turing"]
        }))
        .unwrap();
        let draft = InterviewDraft::from(payload);
        assert_eq!(draft.interviewers, vec!["Grace Hopper", "Alan Turing"]);
        assert_eq!(draft.candidate_phone, None);
    }

    #[test]
    fn list_query_status_filter() {
        let all = InterviewListQuery {
            search: None,
            status: Some("all".into()),
        };
        assert_eq!(all.into_filter().unwrap().status, None);

        let canceled = InterviewListQuery {
            search: None,
            status: Some("cancelled".into()),
        };
        assert_eq!(canceled.into_filter().unwrap().status, Some(InterviewStatus::Canceled));

        let bogus = InterviewListQuery {
            search: None,
            status: Some("pending".into()),
        };
        assert!(bogus.into_filter().is_err());
    }
}
