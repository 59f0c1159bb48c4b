//! Error types for the admin tree

use http::StatusCode;
use thiserror::Error;

/// Contract violations detected while assembling the admin
///
/// These are programming errors: they surface during application assembly
/// (or the first request that exercises a misconfigured module) and are never
/// converted into a user-facing response.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
	/// Parent path given at registration is not registered
	#[error("Parent node '{0}' is not registered")]
	UnknownParent(String),

	/// A node with the same path already exists
	#[error("A node is already registered at '{0}'")]
	DuplicatePath(String),

	/// Endpoint is empty or contains the path separator
	#[error("Invalid endpoint '{0}': endpoints must be non-empty and must not contain '.'")]
	InvalidEndpoint(String),

	/// Module kind supplied no rules
	#[error("Admin module '{0}' must provide at least one rule")]
	NoRules(String),

	/// Primary URL asked before any rule was registered
	#[error("Admin module '{0}' has no registered rule to build a URL from")]
	NoPrimaryUrl(String),

	/// Action name unknown to the module
	#[error("Admin module '{module}' has no action '{action}'")]
	UnknownAction { module: String, action: String },

	/// Route pattern needs a parameter the caller did not provide
	#[error("Route '{endpoint}' requires parameter '{param}'")]
	MissingRouteParam { endpoint: String, param: String },

	/// Object admin declares no list fields
	#[error("Object admin must declare at least one list field")]
	NoListFields,

	/// Searchable field missing from the list fields
	#[error("Searchable field '{0}' must be declared in list_fields")]
	UnknownSearchField(String),

	/// Order field missing from the list fields
	#[error("Order by field '{0}' must be declared in list_fields")]
	UnknownOrderField(String),

	/// Rows per page must be positive
	#[error("per_page must be positive")]
	InvalidPerPage,

	/// Any other invalid configuration value
	#[error("Invalid configuration: {0}")]
	Invalid(String),
}

/// Admin error type
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AdminError {
	/// Contract violation; never caught at request time
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),

	/// Path, route or object not found
	#[error("Not found: {0}")]
	NotFound(String),

	/// A security check failed
	#[error("Access denied with status {0}")]
	Forbidden(StatusCode),

	/// Request is malformed (bad page number, unknown sort column, ...)
	#[error("Bad request: {0}")]
	BadRequest(String),

	/// Backing store failure
	#[error("Backend error: {0}")]
	Backend(String),
}

impl AdminError {
	/// HTTP status this error maps to at the boundary
	///
	/// # Examples
	///
	/// ```
	/// use dashed_core::AdminError;
	/// use http::StatusCode;
	///
	/// let err = AdminError::NotFound("books.42".to_string());
	/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
	/// ```
	pub fn status_code(&self) -> StatusCode {
		match self {
			AdminError::Configuration(_) | AdminError::Backend(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
			AdminError::NotFound(_) => StatusCode::NOT_FOUND,
			AdminError::Forbidden(status) => *status,
			AdminError::BadRequest(_) => StatusCode::BAD_REQUEST,
		}
	}

	/// Whether this error is a contract violation rather than a request outcome
	pub fn is_configuration(&self) -> bool {
		matches!(self, AdminError::Configuration(_))
	}
}

/// Result type for admin operations
pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(AdminError::NotFound("x".into()), StatusCode::NOT_FOUND)]
	#[case(AdminError::Forbidden(StatusCode::UNAUTHORIZED), StatusCode::UNAUTHORIZED)]
	#[case(AdminError::BadRequest("page".into()), StatusCode::BAD_REQUEST)]
	#[case(AdminError::Backend("db down".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	#[case(ConfigurationError::NoListFields.into(), StatusCode::INTERNAL_SERVER_ERROR)]
	fn test_status_code_mapping(#[case] error: AdminError, #[case] expected: StatusCode) {
		// Act
		let status = error.status_code();

		// Assert
		assert_eq!(status, expected);
	}

	#[rstest]
	fn test_configuration_message_is_transparent() {
		// Arrange
		let error: AdminError = ConfigurationError::UnknownParent("missing".into()).into();

		// Act
		let message = error.to_string();

		// Assert
		assert!(error.is_configuration());
		assert_eq!(message, "Parent node 'missing' is not registered");
	}
}
