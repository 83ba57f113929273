use vms_domain::{ParseKindError, transition::TransitionError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Not entitled: {message}")]
	NotEntitled { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Invalid state: {message}")]
	InvalidState { message: String },
	#[error("Provider {provider} is not configured.")]
	ProviderNotConfigured { provider: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		if vms_storage::is_unique_violation(&err, Some(vms_storage::cadences::ONE_ACTIVE_PER_LEAD)) {
			return Self::Conflict { message: "Lead already has an active cadence.".to_string() };
		}

		Self::Storage { message: err.to_string() }
	}
}

impl From<vms_storage::Error> for Error {
	fn from(err: vms_storage::Error) -> Self {
		match err {
			vms_storage::Error::Sqlx(inner) => Self::from(inner),
		}
	}
}

impl From<vms_providers::Error> for Error {
	fn from(err: vms_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<TransitionError> for Error {
	fn from(err: TransitionError) -> Self {
		Self::InvalidState { message: err.to_string() }
	}
}

impl From<ParseKindError> for Error {
	fn from(err: ParseKindError) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
