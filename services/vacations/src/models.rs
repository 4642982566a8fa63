//! Domain models and request/response payloads

pub mod report;
pub mod user;
pub mod vacation;
