pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod exam_sheets;
pub(crate) mod grades;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod reference;
pub(crate) mod reports;
pub(crate) mod retakes;
pub(crate) mod router;
pub(crate) mod students;
pub(crate) mod users;
pub(crate) mod validation;
