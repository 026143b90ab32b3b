//! Site-level key/value settings.
//!
//! Settings are persisted as one JSONB value per key and edited as a typed
//! struct. Missing rows fall back to defaults; unknown keys in the store
//! are left untouched by a save. None of these affect the progression
//! workflow.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::roles::ROLE_STUDENT;

/// Setting keys, as stored in `site_settings.key`.
pub const KEY_SITE_NAME: &str = "site_name";
pub const KEY_SITE_DESCRIPTION: &str = "site_description";
pub const KEY_CONTACT_EMAIL: &str = "contact_email";
pub const KEY_SUPPORT_EMAIL: &str = "support_email";
pub const KEY_MAINTENANCE_MODE: &str = "maintenance_mode";
pub const KEY_REGISTRATION_ENABLED: &str = "registration_enabled";
pub const KEY_DEFAULT_USER_ROLE: &str = "default_user_role";
pub const KEY_EMAIL_NOTIFICATIONS: &str = "email_notifications";
pub const KEY_MAX_FILE_UPLOAD_SIZE: &str = "max_file_upload_size";
pub const KEY_SESSION_TIMEOUT: &str = "session_timeout";
pub const KEY_ALLOW_PUBLIC_COURSES: &str = "allow_public_courses";
pub const KEY_REQUIRE_EMAIL_VERIFICATION: &str = "require_email_verification";

/// Typed view over the `site_settings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    pub support_email: String,
    pub maintenance_mode: bool,
    pub registration_enabled: bool,
    pub default_user_role: String,
    pub email_notifications: bool,
    /// Megabytes.
    pub max_file_upload_size: i64,
    /// Minutes.
    pub session_timeout: i64,
    pub allow_public_courses: bool,
    pub require_email_verification: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Stepwise".to_string(),
            site_description: "Your learning platform".to_string(),
            contact_email: String::new(),
            support_email: String::new(),
            maintenance_mode: false,
            registration_enabled: true,
            default_user_role: ROLE_STUDENT.to_string(),
            email_notifications: true,
            max_file_upload_size: 5,
            session_timeout: 30,
            allow_public_courses: true,
            require_email_verification: false,
        }
    }
}

impl SiteSettings {
    /// Build from `(key, value)` rows, applying defaults for missing keys
    /// and ignoring keys this struct does not know.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = (&'a str, &'a Value)>) -> Self {
        let mut settings = Self::default();

        for (key, value) in rows {
            match key {
                KEY_SITE_NAME => apply_string(value, &mut settings.site_name),
                KEY_SITE_DESCRIPTION => apply_string(value, &mut settings.site_description),
                KEY_CONTACT_EMAIL => apply_string(value, &mut settings.contact_email),
                KEY_SUPPORT_EMAIL => apply_string(value, &mut settings.support_email),
                KEY_MAINTENANCE_MODE => apply_bool(value, &mut settings.maintenance_mode),
                KEY_REGISTRATION_ENABLED => {
                    apply_bool(value, &mut settings.registration_enabled)
                }
                KEY_DEFAULT_USER_ROLE => apply_string(value, &mut settings.default_user_role),
                KEY_EMAIL_NOTIFICATIONS => {
                    apply_bool(value, &mut settings.email_notifications)
                }
                KEY_MAX_FILE_UPLOAD_SIZE => {
                    apply_integer(value, &mut settings.max_file_upload_size)
                }
                KEY_SESSION_TIMEOUT => apply_integer(value, &mut settings.session_timeout),
                KEY_ALLOW_PUBLIC_COURSES => {
                    apply_bool(value, &mut settings.allow_public_courses)
                }
                KEY_REQUIRE_EMAIL_VERIFICATION => {
                    apply_bool(value, &mut settings.require_email_verification)
                }
                _ => {}
            }
        }

        settings
    }

    /// Flatten into `(key, value)` rows for persistence.
    pub fn to_rows(&self) -> Vec<(&'static str, Value)> {
        vec![
            (KEY_SITE_NAME, Value::from(self.site_name.clone())),
            (
                KEY_SITE_DESCRIPTION,
                Value::from(self.site_description.clone()),
            ),
            (KEY_CONTACT_EMAIL, Value::from(self.contact_email.clone())),
            (KEY_SUPPORT_EMAIL, Value::from(self.support_email.clone())),
            (KEY_MAINTENANCE_MODE, Value::from(self.maintenance_mode)),
            (
                KEY_REGISTRATION_ENABLED,
                Value::from(self.registration_enabled),
            ),
            (
                KEY_DEFAULT_USER_ROLE,
                Value::from(self.default_user_role.clone()),
            ),
            (
                KEY_EMAIL_NOTIFICATIONS,
                Value::from(self.email_notifications),
            ),
            (
                KEY_MAX_FILE_UPLOAD_SIZE,
                Value::from(self.max_file_upload_size),
            ),
            (KEY_SESSION_TIMEOUT, Value::from(self.session_timeout)),
            (
                KEY_ALLOW_PUBLIC_COURSES,
                Value::from(self.allow_public_courses),
            ),
            (
                KEY_REQUIRE_EMAIL_VERIFICATION,
                Value::from(self.require_email_verification),
            ),
        ]
    }
}

fn apply_string(value: &Value, target: &mut String) {
    if let Some(s) = value.as_str() {
        *target = s.to_string();
    }
}

fn apply_bool(value: &Value, target: &mut bool) {
    match value {
        Value::Bool(b) => *target = *b,
        // Legacy rows stored booleans as strings.
        Value::String(s) => *target = s == "true",
        _ => {}
    }
}

fn apply_integer(value: &Value, target: &mut i64) {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                *target = i;
            }
        }
        Value::String(s) => {
            if let Ok(i) = s.parse() {
                *target = i;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings = SiteSettings::from_rows([]);
        assert_eq!(settings, SiteSettings::default());
        assert_eq!(settings.default_user_role, "student");
    }

    #[test]
    fn test_round_trip() {
        let mut settings = SiteSettings::default();
        settings.site_name = "Night School".to_string();
        settings.maintenance_mode = true;
        settings.max_file_upload_size = 25;

        let rows = settings.to_rows();
        let reloaded =
            SiteSettings::from_rows(rows.iter().map(|(k, v)| (*k, v)));
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn test_legacy_string_encoded_values() {
        let mode = json!("true");
        let size = json!("10");
        let rows = [
            (KEY_MAINTENANCE_MODE, &mode),
            (KEY_MAX_FILE_UPLOAD_SIZE, &size),
        ];
        let settings = SiteSettings::from_rows(rows);
        assert!(settings.maintenance_mode);
        assert_eq!(settings.max_file_upload_size, 10);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let v = json!("x");
        let settings = SiteSettings::from_rows([("theme_color", &v)]);
        assert_eq!(settings, SiteSettings::default());
    }
}
