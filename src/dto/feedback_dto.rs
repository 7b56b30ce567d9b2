use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::lifecycle::FeedbackSubmission;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SubmitFeedbackPayload {
    #[validate(range(min = 1))]
    pub interview_id: i64,
    pub technical_rating: Option<i32>,
    pub communication_rating: Option<i32>,
    pub problem_solving_rating: Option<i32>,
    pub cultural_fit_rating: Option<i32>,
    pub leadership_rating: Option<i32>,
    pub overall_rating: i32,
    pub recommendation: String,
    #[validate(length(max = 5000))]
    pub strengths: Option<String>,
    #[validate(length(max = 5000))]
    pub weaknesses: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

impl From<SubmitFeedbackPayload> for FeedbackSubmission {
    fn from(payload: SubmitFeedbackPayload) -> Self {
        FeedbackSubmission {
            interview_id: payload.interview_id,
            technical_rating: payload.technical_rating,
            communication_rating: payload.communication_rating,
            problem_solving_rating: payload.problem_solving_rating,
            cultural_fit_rating: payload.cultural_fit_rating,
            leadership_rating: payload.leadership_rating,
            overall_rating: payload.overall_rating,
            recommendation: payload.recommendation,
            strengths: payload.strengths,
            weaknesses: payload.weaknesses,
            notes: payload.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackCreatedResponse {
    pub message: String,
    pub id: i64,
}
