pub mod account_service;
pub mod candidate_service;
pub mod company_service;
pub mod directory_service;
pub mod note_service;
