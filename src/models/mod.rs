pub mod auth;
pub mod organize;
pub mod position;
pub mod report;
pub mod user;
