use std::sync::Arc;

use chrono::{Duration, Utc};
use interview_manager::{
    error::Error,
    lifecycle::{
        DerivedCandidateStatus, FeedbackSubmission, InterviewDraft, InterviewLifecycle,
        InterviewStatus,
    },
    repository::MemoryInterviewRepository,
};

fn seeded() -> (InterviewLifecycle, MemoryInterviewRepository) {
    let repo = MemoryInterviewRepository::new();
    repo.seed_department().unwrap();
    repo.seed_company().unwrap();
    (InterviewLifecycle::new(Arc::new(repo.clone())), repo)
}

fn draft(email: &str, date: &str) -> InterviewDraft {
    InterviewDraft {
        candidate_name: "Ada Lovelace".into(),
        candidate_email: email.into(),
        candidate_phone: None,
        position: "Backend Engineer".into(),
        interview_date: date.into(),
        interviewers: vec!["Grace Hopper".into()],
        notes: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transitions_have_one_winner() {
    let (engine, _repo) = seeded();
    let interview = engine
        .create_interview(draft("ada@example.com", "2030-01-01T09:00"), None)
        .await
        .unwrap();

    let targets = ["completed", "canceled", "no-show", "completed", "canceled", "no-show"];
    let handles: Vec<_> = targets
        .iter()
        .map(|target| {
            let engine = engine.clone();
            let target = target.to_string();
            tokio::spawn(async move { engine.transition_status(interview.id, &target).await })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(updated) => winners.push(updated.status),
            Err(Error::InvalidTransition(_)) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(winners.len(), 1);
    let stored = engine.get_interview(interview.id).await.unwrap();
    assert_eq!(stored.status, winners[0]);
}

#[tokio::test]
async fn missing_department_discards_the_staged_candidate() {
    let repo = MemoryInterviewRepository::new();
    repo.seed_company().unwrap();
    let engine = InterviewLifecycle::new(Arc::new(repo.clone()));

    let err = engine
        .create_interview(draft("ada@example.com", "2030-01-01T09:00"), None)
        .await;
    assert!(matches!(err, Err(Error::DependencyMissing(_))));
    assert_eq!(repo.candidate_count().unwrap(), 0);
    assert_eq!(repo.interview_count().unwrap(), 0);
}

#[tokio::test]
async fn missing_company_discards_the_staged_position() {
    let repo = MemoryInterviewRepository::new();
    repo.seed_department().unwrap();
    let engine = InterviewLifecycle::new(Arc::new(repo.clone()));

    let err = engine
        .create_interview(draft("ada@example.com", "2030-01-01T09:00"), None)
        .await;
    assert!(matches!(err, Err(Error::DependencyMissing(_))));
    assert_eq!(repo.candidate_count().unwrap(), 0);
    assert_eq!(repo.position_count().unwrap(), 0);
    assert_eq!(repo.interviewer_count().unwrap(), 0);
}

#[tokio::test]
async fn existing_interviewer_is_matched_by_email() {
    let (engine, repo) = seeded();
    repo.seed_interviewer("Grace", "Hopper", "grace@example.com").unwrap();

    let mut by_email = draft("ada@example.com", "2030-01-01T09:00");
    by_email.interviewers = vec!["GRACE@example.com".into(), "Grace Hopper".into()];
    let interview = engine.create_interview(by_email, None).await.unwrap();

    assert_eq!(interview.interviewer_ids.len(), 1);
    assert_eq!(repo.interviewer_count().unwrap(), 1);
}

#[tokio::test]
async fn positions_and_interviewers_match_regardless_of_case() {
    let (engine, repo) = seeded();
    let first = engine
        .create_interview(draft("ada@example.com", "2030-01-01T09:00"), None)
        .await
        .unwrap();

    let mut lower = draft("ada@example.com", "2030-01-08T09:00");
    lower.position = "backend engineer".into();
    lower.interviewers = vec!["grace hopper".into()];
    let second = engine.create_interview(lower, None).await.unwrap();

    assert_eq!(second.position_id, first.position_id);
    assert_eq!(second.interviewer_ids, first.interviewer_ids);
    assert_eq!(repo.position_count().unwrap(), 1);
    assert_eq!(repo.interviewer_count().unwrap(), 1);
}

#[tokio::test]
async fn pipeline_follows_the_latest_interview() {
    let (engine, _repo) = seeded();
    let now = Utc::now();

    let old = engine
        .create_interview(draft("ada@example.com", "2020-01-01T09:00"), None)
        .await
        .unwrap();
    engine.transition_status(old.id, "completed").await.unwrap();
    engine
        .submit_feedback(
            FeedbackSubmission {
                interview_id: old.id,
                overall_rating: 2,
                recommendation: "not_recommend".into(),
                ..FeedbackSubmission::default()
            },
            None,
        )
        .await
        .unwrap();

    let pipeline = engine.candidate_pipeline(old.candidate_id, now).await.unwrap();
    assert_eq!(pipeline.status, DerivedCandidateStatus::Rejected);

    let future = (now + Duration::days(3)).to_rfc3339();
    let next = engine
        .create_interview(draft("ada@example.com", &future), None)
        .await
        .unwrap();
    assert_eq!(next.candidate_id, old.candidate_id);

    let pipeline = engine.candidate_pipeline(old.candidate_id, now).await.unwrap();
    assert_eq!(pipeline.status, DerivedCandidateStatus::InterviewScheduled);
    assert_eq!(pipeline.interview_count, 2);
    assert_eq!(pipeline.feedback_count, 1);

    engine.transition_status(next.id, "no-show").await.unwrap();
    let pipeline = engine.candidate_pipeline(old.candidate_id, now).await.unwrap();
    assert_eq!(pipeline.status, DerivedCandidateStatus::InterviewCanceled);
}

#[tokio::test]
async fn deleting_an_interview_removes_its_feedback() {
    let (engine, _repo) = seeded();
    let interview = engine
        .create_interview(draft("ada@example.com", "2020-01-01T09:00"), None)
        .await
        .unwrap();
    engine
        .transition_status(interview.id, "completed")
        .await
        .unwrap();
    engine
        .submit_feedback(
            FeedbackSubmission {
                interview_id: interview.id,
                overall_rating: 3,
                recommendation: "neutral".into(),
                ..FeedbackSubmission::default()
            },
            None,
        )
        .await
        .unwrap();

    engine.delete_interview(interview.id).await.unwrap();

    let feedback = engine
        .list_feedback(&Default::default())
        .await
        .unwrap();
    assert!(feedback.is_empty());
    assert!(matches!(
        engine.get_interview(interview.id).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        engine.delete_interview(interview.id).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn status_is_reported_with_its_wire_name() {
    let (engine, _repo) = seeded();
    let interview = engine
        .create_interview(draft("ada@example.com", "2030-01-01T09:00"), None)
        .await
        .unwrap();
    let updated = engine
        .transition_status(interview.id, "cancelled")
        .await
        .unwrap();
    assert_eq!(updated.status, InterviewStatus::Canceled);
    assert_eq!(updated.status.to_string(), "canceled");
}
