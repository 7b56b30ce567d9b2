use serde::{Deserialize, Serialize};

use crate::lifecycle::{CandidatePipeline, DerivedCandidateStatus};
use crate::models::candidate::Candidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredResponse {
    pub message: String,
    pub id: i64,
}

/// Candidate row plus its derived pipeline label.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateWithStatus {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub name: String,
    pub status: DerivedCandidateStatus,
    pub interview_count: usize,
    pub feedback_count: usize,
}

impl CandidateWithStatus {
    pub fn new(candidate: Candidate, pipeline: &CandidatePipeline) -> Self {
        Self {
            name: candidate.full_name(),
            candidate,
            status: pipeline.status,
            interview_count: pipeline.interview_count,
            feedback_count: pipeline.feedback_count,
        }
    }
}
