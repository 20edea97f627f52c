//! Parser for the catalog data files.
//!
//! Each file holds a single JSON array:
//! - users.json: profiles
//! - activities.json: activities of every category and status
//! - participations.json: one record per application

use crate::error::{CatalogError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a whole file, mapping a missing file to `FileNotFound`
fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CatalogError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => CatalogError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse a JSON array of records.
///
/// `file` is only used to label errors.
pub fn parse_records<T: DeserializeOwned>(content: &str, file: &str) -> Result<Vec<T>> {
    serde_json::from_str::<Vec<T>>(content).map_err(|e| CatalogError::ParseError {
        file: file.to_string(),
        line: e.line(),
        reason: e.to_string(),
    })
}

/// Parse the users.json file
pub fn parse_users(path: &Path) -> Result<Vec<Profile>> {
    let content = read_file(path)?;
    parse_records(&content, &file_label(path))
}

/// Parse the activities.json file
pub fn parse_activities(path: &Path) -> Result<Vec<Activity>> {
    let content = read_file(path)?;
    parse_records(&content, &file_label(path))
}

/// Parse the participations.json file
pub fn parse_participations(path: &Path) -> Result<Vec<Participation>> {
    let content = read_file(path)?;
    parse_records(&content, &file_label(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users_with_onboarding_fields() {
        let content = r#"[
            {
                "id": 1,
                "email": "ana@example.com",
                "fullName": "Ana Torres",
                "office": "Lima",
                "gallupStrengths": {"Achiever": 9, "Learner": 7},
                "personalityType": "Extrovert",
                "interests": ["Educación", "Medio ambiente"],
                "availability": {"weekdays": false, "weekends": true, "timeSlots": ["morning"]}
            },
            {"id": 2, "email": "luis@example.com", "fullName": "Luis Paz"}
        ]"#;

        let users: Vec<Profile> = parse_records(content, "users.json").unwrap();
        assert_eq!(users.len(), 2);

        let ana = &users[0];
        assert_eq!(ana.office.as_deref(), Some("Lima"));
        let strengths = ana.strengths.as_ref().unwrap();
        assert_eq!(strengths.keys().collect::<Vec<_>>(), vec!["Achiever", "Learner"]);
        let availability = ana.availability.as_ref().unwrap();
        assert!(!availability.weekdays);
        assert!(availability.weekends);
        assert_eq!(availability.time_slots, vec!["morning".to_string()]);

        let luis = &users[1];
        assert!(luis.interests.is_none());
        assert!(luis.availability.is_none());
    }

    #[test]
    fn test_partial_availability_uses_defaults() {
        let content = r#"[{"id": 3, "email": "x@example.com", "fullName": "X",
            "availability": {"weekends": true}}]"#;
        let users: Vec<Profile> = parse_records(content, "users.json").unwrap();
        let availability = users[0].availability.as_ref().unwrap();
        assert!(availability.weekdays);
        assert!(availability.weekends);
        assert!(availability.time_slots.is_empty());
    }

    #[test]
    fn test_parse_activities() {
        let content = r#"[
            {
                "id": 10,
                "title": "Tutoría escolar",
                "description": "Apoyo en educación primaria",
                "type": "ong_volunteering",
                "status": "published",
                "sdgGoals": [4],
                "location": "Lima",
                "isVirtual": false,
                "duration": 2
            },
            {"id": 11, "title": "Lab", "description": "Design lab", "type": "lab"}
        ]"#;

        let activities: Vec<Activity> = parse_records(content, "activities.json").unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].category, ActivityCategory::OngVolunteering);
        assert_eq!(activities[0].duration_hours, Some(2));
        assert!(activities[0].has_sdg_goals());
        assert_eq!(activities[1].status, ActivityStatus::Draft);
        assert!(!activities[1].is_virtual);
    }

    #[test]
    fn test_parse_error_reports_file_and_line() {
        let content = "[\n{\"id\": 1,\n\"userId\": }\n]";
        let err = parse_records::<Participation>(content, "participations.json").unwrap_err();
        match err {
            CatalogError::ParseError { file, line, .. } => {
                assert_eq!(file, "participations.json");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = parse_users(Path::new("/nonexistent/users.json")).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound { .. }));
    }
}
