use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::borrow::Cow;
use tracing::{error, warn};
use trailhub_database::DatabaseError;

/// A specialized [`RegistrationsError`] enum of this crate.
///
/// Store failures are fatal to the request: they are not recovered locally
/// and surface as a 5xx response. Notification failures never appear here;
/// the mailer absorbs them into an outcome.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationsError {
    /// Rejected request payloads: malformed JSON, missing required fields,
    /// or a wrong content type. Always a 400 to the client.
    #[error("Invalid registration payload: {message}")]
    Payload { message: String },

    /// Store access failures (connection, query, parsing).
    #[error("Registration store error: {source}")]
    Store {
        #[from]
        source: DatabaseError,
    },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal registrations error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl From<JsonRejection> for RegistrationsError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Payload { message: rejection.body_text() }
    }
}

impl IntoResponse for RegistrationsError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Payload { .. } => {
                warn!(error = %self, "Registration request rejected");
                StatusCode::BAD_REQUEST
            }
            Self::Store { .. } | Self::Internal { .. } => {
                error!(error = %self, "Registration request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
