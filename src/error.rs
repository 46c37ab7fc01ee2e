// Error types shared by the submitter, the capability providers and the
// output writer. The binary wraps these in `anyhow` for reporting.

use std::fmt;
use std::path::PathBuf;

/// Result alias used across the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Body of a failed upstream response: decoded JSON when the service sent
/// valid JSON, the raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(serde_json::Value),
    Raw(String),
}

impl ErrorBody {
    /// Decode `text` as JSON, keeping the raw text if it is not valid JSON.
    pub fn parse(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Raw(text),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ErrorBody::Json(value) => Some(value),
            ErrorBody::Raw(_) => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Json(value) => write!(f, "{}", value),
            ErrorBody::Raw(text) if text.is_empty() => f.write_str("<empty body>"),
            ErrorBody::Raw(text) => f.write_str(text),
        }
    }
}

/// Everything that can go wrong between resolving inputs and writing the
/// parsed document to disk.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No usable API key from the environment or the prompt.
    #[error("missing API credential: {reason}")]
    MissingCredential { reason: String },

    /// The input path does not name an existing regular file.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The input exists but could not be opened for upload.
    #[error("cannot read {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// DNS, connect, TLS or timeout failure. No status code is available.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: ErrorBody },

    /// The service answered 2xx but the body was not JSON.
    #[error("upstream returned {status} with a non-JSON body: {source}")]
    Decode {
        status: u16,
        body: ErrorBody,
        #[source]
        source: serde_json::Error,
    },

    /// The parsed document could not be persisted.
    #[error("cannot write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn missing_credential(reason: impl Into<String>) -> Self {
        Self::MissingCredential {
            reason: reason.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// HTTP status carried by the failure, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } | Error::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body carried by the failure, if any.
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Error::Upstream { body, .. } | Error::Decode { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_body_decodes_json() {
        let body = ErrorBody::parse(r#"{"error": "invalid token"}"#.to_string());
        assert_eq!(body, ErrorBody::Json(json!({"error": "invalid token"})));
    }

    #[test]
    fn error_body_keeps_raw_text() {
        let body = ErrorBody::parse("<html>Bad Gateway</html>".to_string());
        assert_eq!(body, ErrorBody::Raw("<html>Bad Gateway</html>".into()));
        assert!(body.as_json().is_none());
    }

    #[test]
    fn upstream_error_exposes_status_and_body() {
        let err = Error::Upstream {
            status: 401,
            body: ErrorBody::parse(r#"{"error":"invalid token"}"#.into()),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(
            err.body().and_then(ErrorBody::as_json),
            Some(&json!({"error": "invalid token"}))
        );
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn local_errors_have_no_status() {
        let err = Error::file_not_found("missing.pdf");
        assert_eq!(err.status(), None);
        assert!(err.body().is_none());
        assert_eq!(err.to_string(), "file not found: missing.pdf");
    }

    #[test]
    fn empty_raw_body_displays_placeholder() {
        assert_eq!(ErrorBody::Raw(String::new()).to_string(), "<empty body>");
    }
}
