use serde::Serialize;

use crate::core::config::ReferenceData;

#[derive(Debug, Serialize)]
pub(crate) struct GroupsResponse {
    pub(crate) groups: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectsResponse {
    pub(crate) subjects: Vec<String>,
}

impl GroupsResponse {
    pub(crate) fn from_reference(reference: &ReferenceData) -> Self {
        Self { groups: reference.group_names() }
    }
}

impl SubjectsResponse {
    pub(crate) fn from_reference(reference: &ReferenceData) -> Self {
        Self { subjects: reference.subjects.clone() }
    }
}
