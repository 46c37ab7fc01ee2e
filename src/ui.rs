// UI layer: everything that talks to the user. Credentials and input files
// are resolved here and passed to the submitter as plain values, so the
// upload path never prompts.

use crate::api::Credential;
use crate::error::{Error, Result};
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "UPSTAGE_API_KEY";

/// Source of the bearer token.
pub trait CredentialProvider {
    fn credential(&self) -> Result<Credential>;

    /// Ask `fallback` when this provider has no credential to give.
    fn or_else<P: CredentialProvider>(self, fallback: P) -> Fallback<Self, P>
    where
        Self: Sized,
    {
        Fallback {
            primary: self,
            fallback,
        }
    }
}

impl CredentialProvider for Credential {
    fn credential(&self) -> Result<Credential> {
        Ok(self.clone())
    }
}

/// Reads the key from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        EnvCredential { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        EnvCredential::new(API_KEY_VAR)
    }
}

impl CredentialProvider for EnvCredential {
    fn credential(&self) -> Result<Credential> {
        match std::env::var(&self.var) {
            Ok(value) => Credential::new(value).map_err(|_| {
                Error::missing_credential(format!("{} is set but empty", self.var))
            }),
            Err(_) => Err(Error::missing_credential(format!(
                "{} environment variable not found",
                self.var
            ))),
        }
    }
}

/// Asks for the key with hidden input on a terminal, or reads one line from
/// standard input when it is piped.
#[derive(Debug, Clone)]
pub struct PromptCredential {
    prompt: String,
}

impl Default for PromptCredential {
    fn default() -> Self {
        PromptCredential {
            prompt: "Please enter your Upstage API Key".to_string(),
        }
    }
}

impl CredentialProvider for PromptCredential {
    fn credential(&self) -> Result<Credential> {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            return read_key_line(stdin.lock());
        }
        let input = Password::new()
            .with_prompt(&self.prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| Error::missing_credential(format!("could not read API key: {e}")))?;
        Credential::new(input)
    }
}

/// First line of `reader` as the API key.
fn read_key_line<R: BufRead>(mut reader: R) -> Result<Credential> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .map_err(|e| Error::missing_credential(format!("could not read API key: {e}")))?;
    if read == 0 {
        return Err(Error::missing_credential("no API key on standard input"));
    }
    Credential::new(line)
}

/// Tries `primary`, then `fallback` if the first had no credential.
#[derive(Debug, Clone)]
pub struct Fallback<A, B> {
    primary: A,
    fallback: B,
}

impl<A: CredentialProvider, B: CredentialProvider> CredentialProvider for Fallback<A, B> {
    fn credential(&self) -> Result<Credential> {
        match self.primary.credential() {
            Err(Error::MissingCredential { reason }) => {
                warn!("{reason}");
                self.fallback.credential()
            }
            other => other,
        }
    }
}

/// Source of the document to upload. `Ok(None)` means the user picked
/// nothing.
pub trait FileResolver {
    fn resolve(&self) -> Result<Option<PathBuf>>;
}

/// A file named on the command line, relative to a base directory.
#[derive(Debug, Clone)]
pub struct RelativeFile {
    base: PathBuf,
    name: PathBuf,
}

impl RelativeFile {
    pub fn new(base: impl Into<PathBuf>, name: impl Into<PathBuf>) -> Self {
        RelativeFile {
            base: base.into(),
            name: name.into(),
        }
    }

    /// Resolve `name` against the directory holding the running executable.
    pub fn from_exe_dir(name: impl Into<PathBuf>) -> Self {
        let base = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        RelativeFile::new(base, name)
    }
}

impl FileResolver for RelativeFile {
    fn resolve(&self) -> Result<Option<PathBuf>> {
        // `join` keeps absolute names untouched.
        let path = self.base.join(&self.name);
        debug!(path = %path.display(), "resolved file from argument");
        Ok(Some(path))
    }
}

/// Native file-selection dialog with document-type filters. Leaving the
/// filter unselected lists every file, including ones without an extension.
#[derive(Debug, Clone)]
pub struct DialogFile {
    title: String,
}

impl Default for DialogFile {
    fn default() -> Self {
        DialogFile {
            title: "Select a document".to_string(),
        }
    }
}

impl FileResolver for DialogFile {
    fn resolve(&self) -> Result<Option<PathBuf>> {
        let picked = rfd::FileDialog::new()
            .set_title(&self.title)
            .add_filter("PDF", &["pdf"])
            .add_filter("Word", &["doc", "docx"])
            .add_filter("Excel", &["xls", "xlsx"])
            .pick_file();
        debug!(picked = ?picked, "file dialog closed");
        Ok(picked)
    }
}

/// Spinner shown while the upload is in flight.
pub fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
