//! Targeted-visibility matching.
//!
//! A targeted course selects its audience by year, section, and department.
//! Within a category the selected values are OR'd; across categories the
//! matches are AND'd; an empty category matches every student.

use serde::{Deserialize, Serialize};

/// Targeting criteria configured on a course save.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetCriteria {
    #[serde(default)]
    pub years: Vec<String>,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub departments: Vec<String>,
}

impl TargetCriteria {
    /// A targeted course must select at least one criterion.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.sections.is_empty() && self.departments.is_empty()
    }
}

/// The profile attributes targeting matches against.
#[derive(Debug, Clone, Default)]
pub struct StudentAttributes {
    pub year: Option<String>,
    pub section: Option<String>,
    pub department: Option<String>,
}

/// Whether a student matches the criteria.
pub fn matches(criteria: &TargetCriteria, student: &StudentAttributes) -> bool {
    let in_category = |selected: &[String], value: &Option<String>| {
        selected.is_empty()
            || value
                .as_deref()
                .map(|v| selected.iter().any(|s| s == v))
                .unwrap_or(false)
    };

    in_category(&criteria.years, &student.year)
        && in_category(&criteria.sections, &student.section)
        && in_category(&criteria.departments, &student.department)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(year: &str, section: &str, dept: &str) -> StudentAttributes {
        StudentAttributes {
            year: Some(year.to_string()),
            section: Some(section.to_string()),
            department: Some(dept.to_string()),
        }
    }

    #[test]
    fn test_empty_category_matches_all() {
        let criteria = TargetCriteria {
            years: vec!["2nd Year".into()],
            ..Default::default()
        };
        assert!(matches(&criteria, &student("2nd Year", "B", "ECE")));
        assert!(!matches(&criteria, &student("3rd Year", "B", "ECE")));
    }

    #[test]
    fn test_or_within_category() {
        let criteria = TargetCriteria {
            sections: vec!["A".into(), "C".into()],
            ..Default::default()
        };
        assert!(matches(&criteria, &student("1st Year", "A", "CSE")));
        assert!(matches(&criteria, &student("1st Year", "C", "CSE")));
        assert!(!matches(&criteria, &student("1st Year", "B", "CSE")));
    }

    #[test]
    fn test_and_across_categories() {
        let criteria = TargetCriteria {
            years: vec!["4th Year".into()],
            departments: vec!["ME".into()],
            ..Default::default()
        };
        assert!(matches(&criteria, &student("4th Year", "A", "ME")));
        assert!(!matches(&criteria, &student("4th Year", "A", "CE")));
        assert!(!matches(&criteria, &student("3rd Year", "A", "ME")));
    }

    #[test]
    fn test_missing_attribute_fails_selected_category() {
        let criteria = TargetCriteria {
            years: vec!["1st Year".into()],
            ..Default::default()
        };
        let no_year = StudentAttributes::default();
        assert!(!matches(&criteria, &no_year));
    }
}
