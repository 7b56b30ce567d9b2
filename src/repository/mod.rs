pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::feedback::{Feedback, FeedbackFilter, NewFeedback};
use crate::models::interview::{
    CandidateKey, DashboardStats, Interview, InterviewChanges, InterviewFilter, InterviewStatus,
    InterviewerKey, NewInterview,
};

pub use memory::MemoryInterviewRepository;
pub use postgres::PgInterviewRepository;

/// Scope of an interview creation. Every `resolve_or_create_*` call and the
/// final insert become visible together on `commit`; dropping the unit of
/// work without committing discards all of them.
#[async_trait]
pub trait InterviewUnitOfWork: Send {
    async fn resolve_or_create_candidate(&mut self, key: &CandidateKey) -> Result<i64>;

    async fn resolve_or_create_position(&mut self, title: &str) -> Result<i64>;

    async fn resolve_or_create_interviewer(&mut self, key: &InterviewerKey) -> Result<i64>;

    async fn insert_interview(&mut self, interview: &NewInterview) -> Result<i64>;

    async fn commit(&mut self) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InterviewRepository: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn InterviewUnitOfWork>>;

    async fn find_interview(&self, id: i64) -> Result<Option<Interview>>;

    /// Ordered by interview date, earliest first.
    async fn list_interviews(&self, filter: &InterviewFilter) -> Result<Vec<Interview>>;

    /// Writes `to` only while the stored status is still `from`. Returns
    /// `None` when the row is missing or its status moved on.
    async fn update_status(
        &self,
        id: i64,
        from: InterviewStatus,
        to: InterviewStatus,
    ) -> Result<Option<Interview>>;

    async fn update_interview(
        &self,
        id: i64,
        changes: &InterviewChanges,
    ) -> Result<Option<Interview>>;

    async fn delete_interview(&self, id: i64) -> Result<bool>;

    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback>;

    /// Newest first.
    async fn list_feedback(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>>;

    async fn interviews_awaiting_feedback(&self) -> Result<Vec<Interview>>;

    async fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats>;

    async fn upcoming_interviews(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Interview>>;
}

/// Splits a free-text full name into first name and the remainder.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}
