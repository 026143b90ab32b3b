//! HTTP handlers, one module per resource.

pub mod admin_users;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod learning;
pub mod media;
pub mod notifications;
pub mod profile;
pub mod quizzes;
pub mod settings;
pub mod steps;
