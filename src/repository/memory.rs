use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};

use super::{InterviewRepository, InterviewUnitOfWork};
use crate::error::{Error, Result};
use crate::models::feedback::{Feedback, FeedbackFilter, NewFeedback};
use crate::models::interview::{
    CandidateKey, DashboardStats, Interview, InterviewChanges, InterviewFilter, InterviewStatus,
    InterviewerKey, NewInterview,
};
use crate::utils::time::now;

#[derive(Debug, Clone)]
struct StoredCandidate {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
}

impl StoredCandidate {
    fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone)]
struct StoredPosition {
    id: i64,
    title: String,
}

#[derive(Debug, Clone)]
struct StoredEmployee {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
}

impl StoredEmployee {
    fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    fn matches(&self, display: &str) -> bool {
        self.full_name().to_lowercase() == display.to_lowercase()
            || self.email.eq_ignore_ascii_case(display)
    }
}

#[derive(Debug, Clone)]
struct StoredInterview {
    id: i64,
    candidate_id: i64,
    position_id: i64,
    company_id: Option<i64>,
    interviewer_ids: Vec<i64>,
    interview_date: DateTime<Utc>,
    notes: Option<String>,
    status: InterviewStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    departments: Vec<i64>,
    companies: Vec<i64>,
    candidates: Vec<StoredCandidate>,
    positions: Vec<StoredPosition>,
    employees: Vec<StoredEmployee>,
    interviews: Vec<StoredInterview>,
    feedback: Vec<Feedback>,
}

impl MemoryState {
    fn view(&self, stored: &StoredInterview) -> Option<Interview> {
        let candidate = self.candidates.iter().find(|c| c.id == stored.candidate_id)?;
        let position = self.positions.iter().find(|p| p.id == stored.position_id)?;
        let interviewer_names = stored
            .interviewer_ids
            .iter()
            .filter_map(|id| self.employees.iter().find(|e| e.id == *id))
            .map(StoredEmployee::full_name)
            .collect();
        let feedback = self.feedback.iter().find(|f| f.interview_id == stored.id);

        Some(Interview {
            id: stored.id,
            candidate_id: candidate.id,
            candidate_name: candidate.full_name(),
            candidate_email: candidate.email.clone(),
            candidate_phone: candidate.phone.clone(),
            position_id: position.id,
            position_title: position.title.clone(),
            company_id: stored.company_id,
            interviewer_ids: stored.interviewer_ids.clone(),
            interviewer_names,
            interview_date: stored.interview_date,
            notes: stored.notes.clone(),
            status: stored.status,
            rating: feedback.map(|f| f.overall_rating),
            recommendation: feedback.map(|f| f.recommendation),
            feedback: feedback.and_then(|f| f.notes.clone()),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }

    fn views<'a>(&self, interviews: impl Iterator<Item = &'a StoredInterview>) -> Vec<Interview> {
        interviews.filter_map(|stored| self.view(stored)).collect()
    }

    fn candidate_email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.candidates
            .iter()
            .any(|c| Some(c.id) != except && c.email.eq_ignore_ascii_case(email))
    }
}

/// Process-local repository used by tests and demos. Mirrors the Postgres
/// implementation's semantics, including unit-of-work rollback.
#[derive(Clone, Default)]
pub struct MemoryInterviewRepository {
    state: Arc<Mutex<MemoryState>>,
    ids: Arc<AtomicI64>,
}

fn lock(state: &Mutex<MemoryState>) -> Result<MutexGuard<'_, MemoryState>> {
    state
        .lock()
        .map_err(|_| Error::Internal("in-memory repository lock poisoned".to_string()))
}

impl MemoryInterviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.ids.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn seed_department(&self) -> Result<i64> {
        let id = self.next_id();
        lock(&self.state)?.departments.push(id);
        Ok(id)
    }

    pub fn seed_company(&self) -> Result<i64> {
        let id = self.next_id();
        lock(&self.state)?.companies.push(id);
        Ok(id)
    }

    pub fn seed_interviewer(&self, first_name: &str, last_name: &str, email: &str) -> Result<i64> {
        let id = self.next_id();
        lock(&self.state)?.employees.push(StoredEmployee {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        });
        Ok(id)
    }

    pub fn candidate_count(&self) -> Result<usize> {
        Ok(lock(&self.state)?.candidates.len())
    }

    pub fn position_count(&self) -> Result<usize> {
        Ok(lock(&self.state)?.positions.len())
    }

    pub fn interviewer_count(&self) -> Result<usize> {
        Ok(lock(&self.state)?.employees.len())
    }

    pub fn interview_count(&self) -> Result<usize> {
        Ok(lock(&self.state)?.interviews.len())
    }
}

#[derive(Debug, Default)]
struct Staged {
    candidates: Vec<StoredCandidate>,
    positions: Vec<StoredPosition>,
    employees: Vec<StoredEmployee>,
    interviews: Vec<StoredInterview>,
}

struct MemoryUnitOfWork {
    repo: MemoryInterviewRepository,
    staged: Staged,
}

#[async_trait]
impl InterviewUnitOfWork for MemoryUnitOfWork {
    async fn resolve_or_create_candidate(&mut self, key: &CandidateKey) -> Result<i64> {
        {
            let state = lock(&self.repo.state)?;
            let existing = state
                .candidates
                .iter()
                .chain(self.staged.candidates.iter())
                .find(|c| c.email.eq_ignore_ascii_case(&key.email));
            if let Some(candidate) = existing {
                return Ok(candidate.id);
            }
        }

        let id = self.repo.next_id();
        self.staged.candidates.push(StoredCandidate {
            id,
            first_name: key.first_name.clone(),
            last_name: key.last_name.clone(),
            email: key.email.clone(),
            phone: key.phone.clone(),
        });
        Ok(id)
    }

    async fn resolve_or_create_position(&mut self, title: &str) -> Result<i64> {
        {
            let state = lock(&self.repo.state)?;
            let existing = state
                .positions
                .iter()
                .chain(self.staged.positions.iter())
                .find(|p| p.title.to_lowercase() == title.to_lowercase());
            if let Some(position) = existing {
                return Ok(position.id);
            }
            if state.departments.is_empty() {
                return Err(Error::DependencyMissing("No departments found".to_string()));
            }
        }

        let id = self.repo.next_id();
        self.staged.positions.push(StoredPosition {
            id,
            title: title.to_string(),
        });
        Ok(id)
    }

    async fn resolve_or_create_interviewer(&mut self, key: &InterviewerKey) -> Result<i64> {
        {
            let state = lock(&self.repo.state)?;
            let existing = state
                .employees
                .iter()
                .chain(self.staged.employees.iter())
                .find(|e| e.matches(&key.display));
            if let Some(employee) = existing {
                return Ok(employee.id);
            }
            if key.company_id.is_none() && state.companies.is_empty() {
                return Err(Error::DependencyMissing("No companies found".to_string()));
            }
        }

        let id = self.repo.next_id();
        self.staged.employees.push(StoredEmployee {
            id,
            first_name: key.first_name.clone(),
            last_name: key.last_name.clone(),
            email: key.generated_email(),
        });
        Ok(id)
    }

    async fn insert_interview(&mut self, interview: &NewInterview) -> Result<i64> {
        let id = self.repo.next_id();
        let created_at = now();
        self.staged.interviews.push(StoredInterview {
            id,
            candidate_id: interview.candidate_id,
            position_id: interview.position_id,
            company_id: interview.company_id,
            interviewer_ids: interview.interviewer_ids.clone(),
            interview_date: interview.interview_date,
            notes: interview.notes.clone(),
            status: InterviewStatus::initial(),
            created_at,
            updated_at: created_at,
        });
        Ok(id)
    }

    async fn commit(&mut self) -> Result<()> {
        let staged = std::mem::take(&mut self.staged);
        let mut state = lock(&self.repo.state)?;
        if staged
            .candidates
            .iter()
            .any(|c| state.candidate_email_taken(&c.email, None))
        {
            return Err(Error::Conflict(
                "A candidate with this email address already exists".to_string(),
            ));
        }
        state.candidates.extend(staged.candidates);
        state.positions.extend(staged.positions);
        state.employees.extend(staged.employees);
        state.interviews.extend(staged.interviews);
        Ok(())
    }
}

#[async_trait]
impl InterviewRepository for MemoryInterviewRepository {
    async fn begin(&self) -> Result<Box<dyn InterviewUnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            repo: self.clone(),
            staged: Staged::default(),
        }))
    }

    async fn find_interview(&self, id: i64) -> Result<Option<Interview>> {
        let state = lock(&self.state)?;
        Ok(state
            .interviews
            .iter()
            .find(|i| i.id == id)
            .and_then(|stored| state.view(stored)))
    }

    async fn list_interviews(&self, filter: &InterviewFilter) -> Result<Vec<Interview>> {
        let state = lock(&self.state)?;
        let mut items: Vec<Interview> = state
            .views(state.interviews.iter())
            .into_iter()
            .filter(|i| filter.matches(i))
            .collect();
        items.sort_by_key(|i| (i.interview_date, i.id));
        Ok(items)
    }

    async fn update_status(
        &self,
        id: i64,
        from: InterviewStatus,
        to: InterviewStatus,
    ) -> Result<Option<Interview>> {
        let mut state = lock(&self.state)?;
        let Some(stored) = state.interviews.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if stored.status != from {
            return Ok(None);
        }
        stored.status = to;
        stored.updated_at = now();
        let stored = stored.clone();
        Ok(state.view(&stored))
    }

    async fn update_interview(
        &self,
        id: i64,
        changes: &InterviewChanges,
    ) -> Result<Option<Interview>> {
        let mut state = lock(&self.state)?;
        let Some(position) = state.interviews.iter().position(|i| i.id == id) else {
            return Ok(None);
        };
        let current = state.interviews[position].clone();
        if let Some(expected) = changes.expected_status {
            if current.status != expected {
                return Ok(None);
            }
        }

        if let Some(email) = changes.candidate_email.as_deref() {
            if state.candidate_email_taken(email, Some(current.candidate_id)) {
                return Err(Error::Conflict(
                    "A candidate with this email address already exists".to_string(),
                ));
            }
        }
        if let Some(candidate) = state
            .candidates
            .iter_mut()
            .find(|c| c.id == current.candidate_id)
        {
            if let Some(first) = &changes.candidate_first_name {
                candidate.first_name = first.clone();
            }
            if let Some(last) = &changes.candidate_last_name {
                candidate.last_name = last.clone();
            }
            if let Some(email) = &changes.candidate_email {
                candidate.email = email.clone();
            }
            if let Some(phone) = &changes.candidate_phone {
                candidate.phone = Some(phone.clone());
            }
        }

        let stored = &mut state.interviews[position];
        if let Some(date) = changes.interview_date {
            stored.interview_date = date;
        }
        if let Some(notes) = &changes.notes {
            stored.notes = Some(notes.clone());
        }
        if let Some(status) = changes.status {
            stored.status = status;
        }
        stored.updated_at = now();
        let stored = stored.clone();
        Ok(state.view(&stored))
    }

    async fn delete_interview(&self, id: i64) -> Result<bool> {
        let mut state = lock(&self.state)?;
        let before = state.interviews.len();
        state.interviews.retain(|i| i.id != id);
        let removed = state.interviews.len() != before;
        if removed {
            state.feedback.retain(|f| f.interview_id != id);
        }
        Ok(removed)
    }

    async fn insert_feedback(&self, feedback: &NewFeedback) -> Result<Feedback> {
        let mut state = lock(&self.state)?;
        if !state.interviews.iter().any(|i| i.id == feedback.interview_id) {
            return Err(Error::NotFound("Interview not found".to_string()));
        }
        if state
            .feedback
            .iter()
            .any(|f| f.interview_id == feedback.interview_id)
        {
            return Err(Error::Conflict(
                "Feedback has already been submitted for this interview".to_string(),
            ));
        }
        let stored = Feedback {
            id: self.next_id(),
            interview_id: feedback.interview_id,
            candidate_id: feedback.candidate_id,
            company_id: feedback.company_id,
            technical_rating: feedback.technical_rating,
            communication_rating: feedback.communication_rating,
            problem_solving_rating: feedback.problem_solving_rating,
            cultural_fit_rating: feedback.cultural_fit_rating,
            leadership_rating: feedback.leadership_rating,
            overall_rating: feedback.overall_rating,
            recommendation: feedback.recommendation,
            strengths: feedback.strengths.clone(),
            weaknesses: feedback.weaknesses.clone(),
            notes: feedback.notes.clone(),
            created_at: now(),
        };
        state.feedback.push(stored.clone());
        Ok(stored)
    }

    async fn list_feedback(&self, filter: &FeedbackFilter) -> Result<Vec<Feedback>> {
        let state = lock(&self.state)?;
        let mut items: Vec<Feedback> = state
            .feedback
            .iter()
            .filter(|f| filter.matches(f))
            .cloned()
            .collect();
        items.sort_by_key(|f| std::cmp::Reverse((f.created_at, f.id)));
        Ok(items)
    }

    async fn interviews_awaiting_feedback(&self) -> Result<Vec<Interview>> {
        let state = lock(&self.state)?;
        let mut items: Vec<Interview> = state
            .views(state.interviews.iter())
            .into_iter()
            .filter(|i| i.status == InterviewStatus::Completed && !i.has_feedback())
            .collect();
        items.sort_by_key(|i| std::cmp::Reverse((i.interview_date, i.id)));
        Ok(items)
    }

    async fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats> {
        let state = lock(&self.state)?;
        let week = now.iso_week();
        let count = |pred: &dyn Fn(&StoredInterview) -> bool| {
            state.interviews.iter().filter(|i| pred(i)).count() as i64
        };
        Ok(DashboardStats {
            total_interviews: state.interviews.len() as i64,
            scheduled_count: count(&|i| i.status == InterviewStatus::Scheduled),
            completed_count: count(&|i| i.status == InterviewStatus::Completed),
            this_week_count: count(&|i| i.interview_date.iso_week() == week),
        })
    }

    async fn upcoming_interviews(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Interview>> {
        let state = lock(&self.state)?;
        let mut items: Vec<Interview> = state
            .views(state.interviews.iter())
            .into_iter()
            .filter(|i| i.status == InterviewStatus::Scheduled && i.interview_date >= now)
            .collect();
        items.sort_by_key(|i| (i.interview_date, i.id));
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn candidate_key(email: &str) -> CandidateKey {
        CandidateKey {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: email.into(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn dropped_unit_of_work_leaves_nothing_behind() {
        let repo = MemoryInterviewRepository::new();
        repo.seed_department().unwrap();

        {
            let mut uow = repo.begin().await.unwrap();
            uow.resolve_or_create_candidate(&candidate_key("ada@example.com"))
                .await
                .unwrap();
            uow.resolve_or_create_position("Engineer").await.unwrap();
        }

        assert_eq!(repo.candidate_count().unwrap(), 0);
        assert_eq!(repo.position_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn staged_records_are_reused_within_one_unit_of_work() {
        let repo = MemoryInterviewRepository::new();
        let mut uow = repo.begin().await.unwrap();
        let first = uow
            .resolve_or_create_candidate(&candidate_key("ada@example.com"))
            .await
            .unwrap();
        let second = uow
            .resolve_or_create_candidate(&candidate_key("ADA@example.com"))
            .await
            .unwrap();
        assert_eq!(first, second);
        uow.commit().await.unwrap();
        assert_eq!(repo.candidate_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn guarded_status_write_skips_moved_rows() {
        let repo = MemoryInterviewRepository::new();
        repo.seed_department().unwrap();
        let interviewer = repo.seed_interviewer("Grace", "Hopper", "grace@example.com").unwrap();

        let mut uow = repo.begin().await.unwrap();
        let candidate_id = uow
            .resolve_or_create_candidate(&candidate_key("ada@example.com"))
            .await
            .unwrap();
        let position_id = uow.resolve_or_create_position("Engineer").await.unwrap();
        let id = uow
            .insert_interview(&NewInterview {
                candidate_id,
                position_id,
                interviewer_ids: vec![interviewer],
                company_id: None,
                interview_date: now() + Duration::days(1),
                notes: None,
            })
            .await
            .unwrap();
        uow.commit().await.unwrap();

        let done = repo
            .update_status(id, InterviewStatus::Scheduled, InterviewStatus::Completed)
            .await
            .unwrap();
        assert_eq!(done.map(|i| i.status), Some(InterviewStatus::Completed));

        let raced = repo
            .update_status(id, InterviewStatus::Scheduled, InterviewStatus::Canceled)
            .await
            .unwrap();
        assert!(raced.is_none());
        let stored = repo.find_interview(id).await.unwrap().unwrap();
        assert_eq!(stored.status, InterviewStatus::Completed);
    }
}
