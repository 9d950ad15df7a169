use crate::model::ValidationErrors;
use axum::http::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

/// The message returned when the spreadsheet credentials are not set.
pub const NOT_CONFIGURED: &str = "Google Sheets integration not configured. Please add \
    GOOGLE_SHEETS_API_KEY and SPREADSHEET_ID to your environment variables.";

/// The errors that the ledger reports to its callers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credentials for the spreadsheet are absent.
    #[error("{0}")]
    Config(String),

    /// A write payload failed validation. Nothing was sent to the spreadsheet.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// The spreadsheet API answered with a non-success status.
    #[error("Google Sheets API error: {status} {body}")]
    Remote { status: u16, body: String },

    /// The request itself is malformed, e.g. an unknown record type.
    #[error("{0}")]
    Request(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn not_configured() -> Self {
        Error::Config(NOT_CONFIGURED.to_string())
    }

    /// Whether the caller sent something that can never succeed, as opposed to a failure reaching
    /// or talking to the spreadsheet.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::Validation(_) | Error::Request(_)
        )
    }

    /// The HTTP status reported for this error: 400 for client errors, 500 otherwise.
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(Error::not_configured().is_client_error());
        assert!(Error::Validation(ValidationErrors::default()).is_client_error());
        assert!(Error::Request("bad".into()).is_client_error());
        assert!(!Error::Remote {
            status: 403,
            body: "denied".into()
        }
        .is_client_error());
        assert!(!Error::Other(anyhow::anyhow!("boom")).is_client_error());
    }

    #[test]
    fn test_status_code() {
        assert_eq!(Error::not_configured().status_code(), StatusCode::BAD_REQUEST);
        let remote = Error::Remote {
            status: 404,
            body: "Requested entity was not found.".into(),
        };
        assert_eq!(remote.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_display() {
        let e = Error::Remote {
            status: 404,
            body: "Requested entity was not found.".into(),
        };
        assert_eq!(
            e.to_string(),
            "Google Sheets API error: 404 Requested entity was not found."
        );
        assert_eq!(Error::not_configured().to_string(), NOT_CONFIGURED);
    }
}
