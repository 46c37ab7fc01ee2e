// API client module: a small blocking HTTP client that uploads one document
// to the digitization endpoint and hands back the parsed JSON. One request
// per call, no retries.

use crate::config::SubmitterConfig;
use crate::error::{Error, ErrorBody, Result};
use reqwest::blocking::{multipart, Client};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::fmt;
use std::fs::File;
use std::path::Path;

/// Opaque bearer token. Surrounding whitespace is trimmed; an empty token is
/// rejected.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl AsRef<str>) -> Result<Self> {
        let token = token.as_ref().trim();
        if token.is_empty() {
            return Err(Error::missing_credential("API key cannot be empty"));
        }
        Ok(Credential(token.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Uploads documents to the configured endpoint.
#[derive(Clone)]
pub struct DocumentSubmitter {
    client: Client,
    config: SubmitterConfig,
}

impl DocumentSubmitter {
    /// Build the underlying HTTP client from `config`.
    pub fn new(config: SubmitterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(DocumentSubmitter { client, config })
    }

    /// Upload `path` and return the decoded JSON document.
    ///
    /// Emits no log events, so callers can keep a progress display on
    /// stderr while the request is in flight.
    ///
    /// Fails with [`Error::FileNotFound`] before touching the network when
    /// `path` is not an existing regular file. A non-2xx answer becomes
    /// [`Error::Upstream`] with the status and the JSON or raw body.
    pub fn submit(&self, credential: &Credential, path: &Path) -> Result<serde_json::Value> {
        if !path.is_file() {
            return Err(Error::file_not_found(path));
        }
        let form = self.build_form(path)?;
        let headers = auth_headers(credential)?;

        // The form owns the open file; it is dropped with the request on
        // every path out of `send`.
        let res = self
            .client
            .post(&self.config.endpoint)
            .headers(headers)
            .multipart(form)
            .send()?;

        let status = res.status();
        let text = res.text()?;

        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
                body: ErrorBody::parse(text),
            });
        }

        serde_json::from_str(&text).map_err(|source| Error::Decode {
            status: status.as_u16(),
            body: ErrorBody::Raw(text),
            source,
        })
    }

    /// File part plus one text field per configured option.
    fn build_form(&self, path: &Path) -> Result<multipart::Form> {
        let unreadable = |source| Error::FileUnreadable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        let len = file.metadata().map_err(unreadable)?.len();
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string();

        let part = multipart::Part::reader_with_length(file, len)
            .file_name(file_name)
            .mime_str(mime_for(path))?;

        let mut form = multipart::Form::new().part(self.config.file_field.clone(), part);
        for (key, value) in &self.config.options {
            form = form.text(key.clone(), value.clone());
        }
        Ok(form)
    }
}

/// Authorization header for the bearer token, marked sensitive so it never
/// shows up in debug output.
fn auth_headers(credential: &Credential) -> Result<HeaderMap> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
        .map_err(|_| Error::missing_credential("API key contains characters not valid in a header"))?;
    value.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// MIME type for the document kinds the service accepts.
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_trims_and_rejects_blank() {
        assert_eq!(Credential::new("  abc123\n").unwrap().expose(), "abc123");
        assert!(matches!(
            Credential::new("   "),
            Err(Error::MissingCredential { .. })
        ));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let cred = Credential::new("secret-token").unwrap();
        assert!(!format!("{:?}", cred).contains("secret-token"));
    }

    #[test]
    fn auth_header_is_bearer_and_sensitive() {
        let headers = auth_headers(&Credential::new("abc123").unwrap()).unwrap();
        let value = &headers[AUTHORIZATION];
        assert_eq!(value.to_str().unwrap(), "Bearer abc123");
        assert!(value.is_sensitive());
    }

    #[test]
    fn auth_header_rejects_control_characters() {
        let cred = Credential::new("abc\u{7}123").unwrap();
        assert!(matches!(
            auth_headers(&cred),
            Err(Error::MissingCredential { .. })
        ));
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for(Path::new("report.PDF")), "application/pdf");
        assert_eq!(mime_for(Path::new("memo.doc")), "application/msword");
        assert_eq!(
            mime_for(Path::new("sheet.xlsx")),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(mime_for(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn missing_file_fails_before_request() {
        let submitter = DocumentSubmitter::new(
            SubmitterConfig::default().with_endpoint("http://127.0.0.1:1/never"),
        )
        .unwrap();
        let cred = Credential::new("abc123").unwrap();
        let err = submitter
            .submit(&cred, Path::new("definitely/not/here.pdf"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
