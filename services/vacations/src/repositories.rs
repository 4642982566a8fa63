//! Repositories for database operations

pub mod report;
pub mod user;
pub mod vacation;

pub use report::ReportRepository;
pub use user::UserRepository;
pub use vacation::VacationRepository;

#[cfg(test)]
mod tests;
