pub(crate) mod exam_sheets;
pub(crate) mod grades;
pub(crate) mod health;
pub(crate) mod retakes;
pub(crate) mod sessions;
pub(crate) mod students;
pub(crate) mod users;
