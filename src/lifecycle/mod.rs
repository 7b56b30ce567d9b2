pub mod derive;
pub mod engine;
pub mod status;

pub use derive::{derive_candidate_status, DerivedCandidateStatus};
pub use engine::{
    CandidatePipeline, FeedbackSubmission, InterviewDraft, InterviewLifecycle, InterviewUpdate,
};
pub use status::InterviewStatus;
