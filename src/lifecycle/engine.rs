use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::lifecycle::derive::{derive_candidate_status, DerivedCandidateStatus};
use crate::lifecycle::status::InterviewStatus;
use crate::models::feedback::{Feedback, FeedbackFilter, NewFeedback, Recommendation};
use crate::models::interview::{
    CandidateKey, DashboardStats, Interview, InterviewChanges, InterviewFilter, InterviewerKey,
    NewInterview,
};
use crate::repository::{split_full_name, InterviewRepository};
use crate::utils::time::parse_interview_date;

pub const MAX_INTERVIEWERS: usize = 3;
pub const UPCOMING_LIMIT: i64 = 5;

/// Scheduling request as typed into the form: free-text names resolved by
/// natural key when the interview is created.
#[derive(Debug, Clone, Default)]
pub struct InterviewDraft {
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: Option<String>,
    pub position: String,
    pub interview_date: String,
    pub interviewers: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InterviewUpdate {
    pub interview_date: Option<String>,
    pub notes: Option<String>,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub candidate_phone: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackSubmission {
    pub interview_id: i64,
    pub technical_rating: Option<i32>,
    pub communication_rating: Option<i32>,
    pub problem_solving_rating: Option<i32>,
    pub cultural_fit_rating: Option<i32>,
    pub leadership_rating: Option<i32>,
    pub overall_rating: i32,
    pub recommendation: String,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidatePipeline {
    pub candidate_id: i64,
    pub status: DerivedCandidateStatus,
    pub interview_count: usize,
    pub feedback_count: usize,
}

/// Orchestrates interview state changes against a repository. Holds no state
/// of its own beyond the repository handle.
#[derive(Clone)]
pub struct InterviewLifecycle {
    repo: Arc<dyn InterviewRepository>,
}

impl InterviewLifecycle {
    pub fn new(repo: Arc<dyn InterviewRepository>) -> Self {
        Self { repo }
    }

    /// Resolves candidate, position and interviewers by natural key, creating
    /// whatever is missing, and inserts the interview in `scheduled`. Nothing
    /// is persisted unless every step succeeds.
    pub async fn create_interview(
        &self,
        draft: InterviewDraft,
        company_id: Option<i64>,
    ) -> Result<Interview> {
        let candidate_name = required(&draft.candidate_name, "Candidate name")?;
        let candidate_email = required(&draft.candidate_email, "Candidate email")?;
        if !is_plausible_email(&candidate_email) {
            return Err(Error::Validation("Candidate email is invalid".to_string()));
        }
        let position = required(&draft.position, "Position")?;
        let interview_date = parse_interview_date(&draft.interview_date)?;
        let interviewers = distinct_interviewers(&draft.interviewers)?;

        let (first_name, last_name) = split_full_name(&candidate_name);
        let candidate = CandidateKey {
            first_name,
            last_name,
            email: candidate_email,
            phone: non_empty(draft.candidate_phone),
        };

        let mut uow = self.repo.begin().await?;
        let candidate_id = uow.resolve_or_create_candidate(&candidate).await?;
        let position_id = uow.resolve_or_create_position(&position).await?;

        let mut interviewer_ids = Vec::with_capacity(interviewers.len());
        for display in interviewers {
            let (first_name, last_name) = split_full_name(&display);
            let key = InterviewerKey {
                display,
                first_name,
                last_name,
                company_id,
            };
            let id = uow.resolve_or_create_interviewer(&key).await?;
            if !interviewer_ids.contains(&id) {
                interviewer_ids.push(id);
            }
        }

        let id = uow
            .insert_interview(&NewInterview {
                candidate_id,
                position_id,
                interviewer_ids,
                company_id,
                interview_date,
                notes: non_empty(draft.notes),
            })
            .await?;
        uow.commit().await?;

        tracing::info!(interview_id = id, candidate_id, position_id, "Interview scheduled");

        self.repo
            .find_interview(id)
            .await?
            .ok_or_else(|| Error::Internal(format!("Interview {} vanished after commit", id)))
    }

    /// Moves an interview out of `scheduled`. The write only lands if the
    /// status is unchanged since it was read, so concurrent transitions on
    /// the same interview have exactly one winner.
    pub async fn transition_status(&self, id: i64, target: &str) -> Result<Interview> {
        let target: InterviewStatus = target
            .parse()
            .map_err(|_| Error::InvalidTransition(format!("Invalid status: {}", target.trim())))?;

        let current = self.get_interview(id).await?;
        ensure_transition(current.status, target)?;

        match self.repo.update_status(id, current.status, target).await? {
            Some(updated) => {
                tracing::info!(
                    interview_id = id,
                    from = %current.status,
                    to = %target,
                    "Interview status changed"
                );
                Ok(updated)
            }
            None => Err(self.lost_race(id, target).await),
        }
    }

    /// Partial update. A status in the update goes through the same rules as
    /// `transition_status`; resending the current status is not a change.
    pub async fn update_interview(&self, id: i64, update: InterviewUpdate) -> Result<Interview> {
        let interview_date = update
            .interview_date
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(parse_interview_date)
            .transpose()?;
        let target = update
            .status
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                raw.parse::<InterviewStatus>()
                    .map_err(|_| Error::InvalidTransition(format!("Invalid status: {}", raw.trim())))
            })
            .transpose()?;

        let mut changes = InterviewChanges {
            interview_date,
            notes: update.notes,
            candidate_phone: non_empty(update.candidate_phone),
            ..InterviewChanges::default()
        };
        if let Some(name) = non_empty(update.candidate_name) {
            let (first, last) = split_full_name(&name);
            changes.candidate_first_name = Some(first);
            changes.candidate_last_name = Some(last);
        }
        if let Some(email) = non_empty(update.candidate_email) {
            if !is_plausible_email(&email) {
                return Err(Error::Validation("Candidate email is invalid".to_string()));
            }
            changes.candidate_email = Some(email);
        }

        let current = self.get_interview(id).await?;
        if let Some(target) = target.filter(|t| *t != current.status) {
            ensure_transition(current.status, target)?;
            changes.expected_status = Some(current.status);
            changes.status = Some(target);
        }

        match self.repo.update_interview(id, &changes).await? {
            Some(updated) => {
                tracing::info!(interview_id = id, "Interview updated");
                Ok(updated)
            }
            None => match changes.status {
                Some(target) => Err(self.lost_race(id, target).await),
                None => Err(not_found()),
            },
        }
    }

    pub async fn delete_interview(&self, id: i64) -> Result<()> {
        if !self.repo.delete_interview(id).await? {
            return Err(not_found());
        }
        tracing::info!(interview_id = id, "Interview deleted");
        Ok(())
    }

    pub async fn get_interview(&self, id: i64) -> Result<Interview> {
        self.repo.find_interview(id).await?.ok_or_else(not_found)
    }

    pub async fn list_interviews(&self, filter: &InterviewFilter) -> Result<Vec<Interview>> {
        self.repo.list_interviews(filter).await
    }

    pub async fn candidate_pipeline(
        &self,
        candidate_id: i64,
        now: DateTime<Utc>,
    ) -> Result<CandidatePipeline> {
        let interviews = self
            .repo
            .list_interviews(&InterviewFilter {
                candidate_id: Some(candidate_id),
                ..InterviewFilter::default()
            })
            .await?;
        let feedbacks = self
            .repo
            .list_feedback(&FeedbackFilter {
                candidate_id: Some(candidate_id),
                ..FeedbackFilter::default()
            })
            .await?;

        Ok(CandidatePipeline {
            candidate_id,
            status: derive_candidate_status(&interviews, &feedbacks, now),
            interview_count: interviews.len(),
            feedback_count: feedbacks.len(),
        })
    }

    /// Pipelines for many candidates from two reads. Output follows the
    /// order of `candidate_ids`.
    pub async fn candidate_pipelines(
        &self,
        candidate_ids: &[i64],
        now: DateTime<Utc>,
    ) -> Result<Vec<CandidatePipeline>> {
        let interviews = self.repo.list_interviews(&InterviewFilter::default()).await?;
        let feedbacks = self.repo.list_feedback(&FeedbackFilter::default()).await?;

        let mut interviews_by_candidate: HashMap<i64, Vec<Interview>> = HashMap::new();
        for interview in interviews {
            interviews_by_candidate
                .entry(interview.candidate_id)
                .or_default()
                .push(interview);
        }
        let mut feedback_by_candidate: HashMap<i64, Vec<Feedback>> = HashMap::new();
        for feedback in feedbacks {
            feedback_by_candidate
                .entry(feedback.candidate_id)
                .or_default()
                .push(feedback);
        }

        Ok(candidate_ids
            .iter()
            .map(|id| {
                let interviews = interviews_by_candidate.get(id).map(Vec::as_slice).unwrap_or(&[]);
                let feedbacks = feedback_by_candidate.get(id).map(Vec::as_slice).unwrap_or(&[]);
                CandidatePipeline {
                    candidate_id: *id,
                    status: derive_candidate_status(interviews, feedbacks, now),
                    interview_count: interviews.len(),
                    feedback_count: feedbacks.len(),
                }
            })
            .collect())
    }

    /// Records the single evaluation of a completed interview.
    pub async fn submit_feedback(
        &self,
        submission: FeedbackSubmission,
        company_id: Option<i64>,
    ) -> Result<Feedback> {
        let recommendation: Recommendation = submission.recommendation.trim().parse().map_err(
            |_| Error::Validation(format!("Invalid recommendation: {}", submission.recommendation)),
        )?;
        check_rating("Overall rating", Some(submission.overall_rating))?;
        check_rating("Technical rating", submission.technical_rating)?;
        check_rating("Communication rating", submission.communication_rating)?;
        check_rating("Problem solving rating", submission.problem_solving_rating)?;
        check_rating("Cultural fit rating", submission.cultural_fit_rating)?;
        check_rating("Leadership rating", submission.leadership_rating)?;

        let interview = self.get_interview(submission.interview_id).await?;
        if interview.status != InterviewStatus::Completed {
            return Err(Error::Validation(
                "Feedback can only be submitted for completed interviews".to_string(),
            ));
        }
        if interview.has_feedback() {
            return Err(Error::Validation(
                "Feedback has already been submitted for this interview".to_string(),
            ));
        }

        let feedback = self
            .repo
            .insert_feedback(&NewFeedback {
                interview_id: interview.id,
                candidate_id: interview.candidate_id,
                company_id: company_id.or(interview.company_id),
                technical_rating: submission.technical_rating,
                communication_rating: submission.communication_rating,
                problem_solving_rating: submission.problem_solving_rating,
                cultural_fit_rating: submission.cultural_fit_rating,
                leadership_rating: submission.leadership_rating,
                overall_rating: submission.overall_rating,
                recommendation,
                strengths: non_empty(submission.strengths),
                weaknesses: non_empty(submission.weaknesses),
                notes: non_empty(submission.notes),
            })
            .await?;

        tracing::info!(
            interview_id = interview.id,
            feedback_id = feedback.id,
            recommendation = %recommendation,
            "Feedback submitted"
        );
        Ok(feedback)
    }

    pub async fn list_feedback(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>> {
        self.repo.list_feedback(filter).await
    }

    pub async fn interviews_awaiting_feedback(&self) -> Result<Vec<Interview>> {
        self.repo.interviews_awaiting_feedback().await
    }

    pub async fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats> {
        self.repo.dashboard_stats(now).await
    }

    pub async fn upcoming_interviews(&self, now: DateTime<Utc>) -> Result<Vec<Interview>> {
        self.repo.upcoming_interviews(now, UPCOMING_LIMIT).await
    }

    /// Explains a guarded write that matched no row.
    async fn lost_race(&self, id: i64, target: InterviewStatus) -> Error {
        match self.repo.find_interview(id).await {
            Ok(Some(now)) => {
                tracing::warn!(
                    interview_id = id,
                    status = %now.status,
                    target = %target,
                    "Concurrent status change detected"
                );
                transition_error(now.status, target)
            }
            Ok(None) => not_found(),
            Err(err) => err,
        }
    }
}

fn ensure_transition(from: InterviewStatus, to: InterviewStatus) -> Result<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(transition_error(from, to))
    }
}

fn transition_error(from: InterviewStatus, to: InterviewStatus) -> Error {
    if from.is_terminal() {
        Error::InvalidTransition(format!("Interview is already {}; its status can no longer change", from))
    } else {
        Error::InvalidTransition(format!("Cannot change interview status from {} to {}", from, to))
    }
}

fn not_found() -> Error {
    Error::NotFound("Interview not found".to_string())
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !email.contains(' ')
        }
        None => false,
    }
}

/// Trims, drops blanks and case-insensitive duplicates, and caps the list.
fn distinct_interviewers(raw: &[String]) -> Result<Vec<String>> {
    let mut seen: Vec<String> = Vec::new();
    let mut result = Vec::new();
    for name in raw.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let folded = name.to_lowercase();
        if !seen.contains(&folded) {
            seen.push(folded);
            result.push(name.to_string());
        }
    }
    if result.is_empty() {
        return Err(Error::Validation("At least one interviewer is required".to_string()));
    }
    if result.len() > MAX_INTERVIEWERS {
        return Err(Error::Validation(format!(
            "At most {} interviewers can be assigned",
            MAX_INTERVIEWERS
        )));
    }
    Ok(result)
}

fn check_rating(field: &str, rating: Option<i32>) -> Result<()> {
    match rating {
        Some(value) if !(1..=5).contains(&value) => Err(Error::Validation(format!(
            "{} must be between 1 and 5",
            field
        ))),
        _ => Ok(()),
    }
}
