//! Student model.

use serde::{Deserialize, Serialize};

/// Gender as recorded on the student profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Any other or unrecorded value.
    #[serde(other)]
    Other,
}

/// A student sitting an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier of the student.
    pub id: u64,
    /// Full name.
    pub name: String,
    /// School admission number.
    #[serde(default)]
    pub admission_number: Option<String>,
    /// Gender, used for gender-level summaries.
    pub gender: Gender,
    /// The class (form/grade) the student belongs to.
    pub class_id: u64,
    /// The stream within the class.
    pub stream_id: u64,
    /// Names of custom groups the student is a member of.
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Student {
    /// Returns true if the student belongs to the named custom group.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_gender_maps_to_other() {
        let json = r#"{"id": 1, "name": "Sam", "gender": "unspecified", "class_id": 1, "stream_id": 2}"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.gender, Gender::Other);
        assert!(student.groups.is_empty());
    }

    #[test]
    fn test_in_group() {
        let json = r#"{"id": 1, "name": "Amina", "gender": "female", "class_id": 1, "stream_id": 2, "groups": ["sciences"]}"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert!(student.in_group("sciences"));
        assert!(!student.in_group("humanities"));
    }
}
