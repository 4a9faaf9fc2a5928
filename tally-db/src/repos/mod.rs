//! Repository modules for database operations

pub mod issues;
pub mod projects;
pub mod users;

pub use issues::IssueRepository;
pub use projects::ProjectRepository;
pub use users::UserRepository;
