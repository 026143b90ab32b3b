//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod attempt;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod module;
pub mod notification;
pub mod profile;
pub mod progress;
pub mod question;
pub mod quiz;
pub mod role;
pub mod session;
pub mod site_setting;
pub mod stats;
pub mod user;
