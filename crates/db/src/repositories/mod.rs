//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-row writes that must
//! land together (quiz grading, question replacement, target replacement)
//! open their own transaction internally.

pub mod analytics_repo;
pub mod attempt_repo;
pub mod course_repo;
pub mod enrollment_repo;
pub mod lesson_repo;
pub mod module_repo;
pub mod notification_repo;
pub mod profile_repo;
pub mod progress_repo;
pub mod quiz_repo;
pub mod role_repo;
pub mod session_repo;
pub mod site_setting_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepo;
pub use attempt_repo::AttemptRepo;
pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use lesson_repo::LessonRepo;
pub use module_repo::ModuleRepo;
pub use notification_repo::NotificationRepo;
pub use profile_repo::ProfileRepo;
pub use progress_repo::ProgressRepo;
pub use quiz_repo::QuizRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use site_setting_repo::SiteSettingRepo;
pub use user_repo::UserRepo;
