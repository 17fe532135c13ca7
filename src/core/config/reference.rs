//! Groups, their seed rosters and the subject list.
//!
//! Loaded once at startup, either from the JSON file named by
//! `REFERENCE_DATA_PATH` or from the built-in defaults, and shared read-only
//! through [`crate::core::state::AppState`].

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::ConfigError;

const DEFAULT_SUBJECTS: &[&str] =
    &["Філософія", "Математичний аналіз", "Програмування", "Фізика", "Алгебра і теорія чисел"];

const DEFAULT_GROUPS: &[(&str, &[&str])] = &[
    ("1СОМ", &["Алексєєнко Анна Олександрівна"]),
    ("1СОІ", &["Лисенко Тимофій Сергійович"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct GroupRoster {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) students: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ReferenceData {
    pub(crate) subjects: Vec<String>,
    pub(crate) groups: Vec<GroupRoster>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            subjects: DEFAULT_SUBJECTS.iter().map(|item| item.to_string()).collect(),
            groups: DEFAULT_GROUPS
                .iter()
                .map(|(name, students)| GroupRoster {
                    name: name.to_string(),
                    students: students.iter().map(|item| item.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl ReferenceData {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|err| ConfigError::ReferenceData {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Self::from_json(&raw).map_err(|reason| ConfigError::ReferenceData {
            path: path.display().to_string(),
            reason,
        })
    }

    pub(crate) fn from_json(raw: &str) -> Result<Self, String> {
        let mut data: Self = serde_json::from_str(raw).map_err(|err| err.to_string())?;
        data.normalize();
        data.validate()?;
        Ok(data)
    }

    pub(crate) fn has_subject(&self, subject: &str) -> bool {
        self.subjects.iter().any(|item| item == subject)
    }

    pub(crate) fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|item| item.name == group)
    }

    pub(crate) fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|group| group.name.clone()).collect()
    }

    pub(crate) fn seed_roster(&self, group: &str) -> &[String] {
        self.groups
            .iter()
            .find(|item| item.name == group)
            .map(|item| item.students.as_slice())
            .unwrap_or(&[])
    }

    fn normalize(&mut self) {
        for subject in &mut self.subjects {
            *subject = subject.trim().to_string();
        }
        for group in &mut self.groups {
            group.name = group.name.trim().to_string();
            for student in &mut group.students {
                *student = student.trim().to_string();
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.subjects.is_empty() {
            return Err("at least one subject is required".to_string());
        }
        if self.groups.is_empty() {
            return Err("at least one group is required".to_string());
        }

        let mut seen = HashSet::new();
        for subject in &self.subjects {
            if subject.is_empty() {
                return Err("subject names must not be blank".to_string());
            }
            if !seen.insert(subject.as_str()) {
                return Err(format!("duplicate subject: {subject}"));
            }
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.name.is_empty() {
                return Err("group names must not be blank".to_string());
            }
            if !seen.insert(group.name.as_str()) {
                return Err(format!("duplicate group: {}", group.name));
            }
            if group.students.iter().any(|student| student.is_empty()) {
                return Err(format!("group {} lists a blank student name", group.name));
            }
        }

        Ok(())
    }
}
