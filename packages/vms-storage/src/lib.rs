pub mod cadences;
pub mod db;
pub mod leads;
pub mod models;
pub mod outreach;
pub mod profiles;
pub mod schema;
pub mod steps;
pub mod templates;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

const UNIQUE_VIOLATION: &str = "23505";

/// Whether a database error is a unique-constraint violation, optionally on a named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: Option<&str>) -> bool {
	let Some(db_err) = err.as_database_error() else {
		return false;
	};

	if db_err.code().as_deref() != Some(UNIQUE_VIOLATION) {
		return false;
	}

	match constraint {
		Some(name) => db_err.constraint() == Some(name),
		None => true,
	}
}
