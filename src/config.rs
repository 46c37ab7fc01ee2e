// Submission configuration: where to send documents and which form fields
// accompany the upload. Built once in `main` and handed to the submitter.

use std::collections::BTreeMap;
use std::time::Duration;

/// Document digitization endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.upstage.ai/v1/document-digitization";

/// Multipart field name the service expects the document under.
pub const DEFAULT_FILE_FIELD: &str = "document";

/// Document parsing can take minutes for long scans.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for [`crate::api::DocumentSubmitter`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitterConfig {
    /// Full URL the document is POSTed to.
    pub endpoint: String,
    /// Multipart field carrying the file bytes.
    pub file_field: String,
    /// Extra text fields sent next to the file (OCR mode, encodings, model).
    pub options: BTreeMap<String, String>,
    /// Whole-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SubmitterConfig {
    /// Forced OCR with base64-encoded tables on the `document-parse` model.
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            file_field: DEFAULT_FILE_FIELD.to_string(),
            options: Self::default_options(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("docparse-cli/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SubmitterConfig {
    fn default_options() -> BTreeMap<String, String> {
        [
            ("ocr", "force"),
            ("base64_encoding", "['table']"),
            ("model", "document-parse"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Add or replace a single option field.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Drop every option field, including the defaults.
    pub fn without_options(mut self) -> Self {
        self.options.clear();
        self
    }
}

/// Parse a `KEY=VALUE` option argument. The value may itself contain `=`.
pub fn parse_option(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{arg}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty option key in `{arg}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
