//! Error type shared by adapters, core infrastructure and handlers.

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Requested resource does not exist
	NotFound,
	/// Authenticated, but not allowed to perform the operation
	PermissionDenied,
	/// Missing or invalid credentials
	Unauthorized,
	/// Malformed or missing input not tied to a single field
	ValidationError(String),
	/// Malformed or missing input for a named field
	FieldError(Box<str>, String),
	DbError,
	Parse,
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	pub fn field(field: impl Into<Box<str>>, message: impl Into<String>) -> Self {
		Error::FieldError(field.into(), message.into())
	}

	fn status(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::ValidationError(_) | Error::FieldError(..) | Error::Parse => {
				StatusCode::BAD_REQUEST
			}
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-NOT-FOUND",
			Error::PermissionDenied => "E-AUTH-NOPERM",
			Error::Unauthorized => "E-AUTH-UNAUTH",
			Error::ValidationError(_) | Error::FieldError(..) | Error::Parse => "E-VALIDATION",
			Error::DbError => "E-DB",
			Error::ConfigError(_) => "E-CONFIG",
			Error::Internal(_) | Error::Io(_) => "E-INTERNAL",
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "Not found"),
			Error::PermissionDenied => {
				write!(f, "You do not have permission to perform this action")
			}
			Error::Unauthorized => {
				write!(f, "Authentication credentials were not provided or are invalid")
			}
			Error::ValidationError(msg) => write!(f, "{}", msg),
			Error::FieldError(field, msg) => write!(f, "{}: {}", field, msg),
			Error::DbError => write!(f, "Database error"),
			Error::Parse => write!(f, "Parse error"),
			Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "Internal error: {}", msg),
			Error::Io(err) => write!(f, "IO error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		let message = match &self {
			// Never leak internal details to the client
			Error::DbError | Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				tracing::error!("Request failed: {}", self);
				"Internal server error".to_string()
			}
			Error::FieldError(_, msg) => msg.clone(),
			_ => self.to_string(),
		};

		let mut error = serde_json::json!({
			"code": self.code(),
			"message": message,
		});
		if let Error::FieldError(field, _) = &self {
			error["details"] = serde_json::json!({ "field": field });
		}

		(status, Json(serde_json::json!({ "error": error }))).into_response()
	}
}


// vim: ts=4
