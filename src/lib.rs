pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::lifecycle::InterviewLifecycle;
use crate::repository::{InterviewRepository, PgInterviewRepository};
use crate::services::{
    account_service::AccountService, candidate_service::CandidateService,
    company_service::CompanyService, directory_service::DirectoryService,
    note_service::NoteService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: PgPool,
    pub lifecycle: InterviewLifecycle,
    pub account_service: AccountService,
    pub candidate_service: CandidateService,
    pub company_service: CompanyService,
    pub directory_service: DirectoryService,
    pub note_service: NoteService,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        let repository = Arc::new(PgInterviewRepository::new(pool.clone()));
        Self::with_repository(config, pool, repository)
    }

    /// Same wiring with a caller-supplied interview repository.
    pub fn with_repository(
        config: Config,
        pool: PgPool,
        repository: Arc<dyn InterviewRepository>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            lifecycle: InterviewLifecycle::new(repository),
            account_service: AccountService::new(pool.clone()),
            candidate_service: CandidateService::new(pool.clone()),
            company_service: CompanyService::new(pool.clone()),
            directory_service: DirectoryService::new(pool.clone()),
            note_service: NoteService::new(pool.clone()),
            pool,
        }
    }
}
