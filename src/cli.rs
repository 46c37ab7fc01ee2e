// Command-line surface and the single end-to-end flow: pick a file, get a
// key, upload, save the JSON.

use crate::api::DocumentSubmitter;
use crate::config::{parse_option, SubmitterConfig, DEFAULT_ENDPOINT};
use crate::error::{Error, Result};
use crate::output::{output_path, write_json};
use crate::ui::{spinner, CredentialProvider, FileResolver};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

/// Parse a document with the Upstage Document Parsing API and save the
/// result as JSON.
#[derive(Debug, Clone, Parser)]
#[command(name = "docparse", version)]
pub struct Cli {
    /// File to parse, relative to the program's directory. Opens a file
    /// dialog when omitted.
    #[arg(short, long, value_name = "NAME")]
    pub filename: Option<PathBuf>,

    /// Directory for the JSON result. Defaults to the input's directory.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Document parsing endpoint.
    #[arg(long, env = "UPSTAGE_API_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Extra form field sent with the document. Repeatable.
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    /// Do not send the default OCR, encoding and model fields.
    #[arg(long)]
    pub no_default_options: bool,
}

impl Cli {
    pub fn submitter_config(&self) -> SubmitterConfig {
        let mut config = SubmitterConfig::default().with_endpoint(self.endpoint.clone());
        if self.no_default_options {
            config = config.without_options();
        }
        for (key, value) in &self.options {
            config = config.with_option(key.clone(), value.clone());
        }
        config
    }
}

/// How a run ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Parsed document written to this path.
    Saved(PathBuf),
    /// The user closed the picker without choosing a file.
    NoFileSelected,
}

/// Resolve inputs, submit once and persist the result. Nothing is written
/// unless the submission succeeds.
pub fn run<F, C>(cli: &Cli, files: &F, credentials: &C) -> Result<Outcome>
where
    F: FileResolver + ?Sized,
    C: CredentialProvider + ?Sized,
{
    let Some(path) = files.resolve()? else {
        return Ok(Outcome::NoFileSelected);
    };
    // Checked here as well so a bad path is reported before prompting.
    if !path.is_file() {
        return Err(Error::file_not_found(path));
    }
    let credential = credentials.credential()?;

    let config = cli.submitter_config();
    info!(
        path = %path.display(),
        endpoint = %config.endpoint,
        options = config.options.len(),
        "submitting document"
    );
    let submitter = DocumentSubmitter::new(config)?;

    // Nothing logs while the spinner owns stderr.
    let progress = spinner("Parsing document...");
    let result = submitter.submit(&credential, &path);
    progress.finish_and_clear();
    if let Some(status) = result.as_ref().err().and_then(|e| e.status()) {
        warn!(status, "upstream rejected document");
    }
    let document = result?;

    let out = output_path(&path, cli.output_dir.as_deref());
    write_json(&out, &document)?;
    info!(path = %out.display(), "saved parsed document");
    Ok(Outcome::Saved(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from(["docparse", "-f", "report.pdf", "-o", "out"]).unwrap();
        assert_eq!(cli.filename, Some(PathBuf::from("report.pdf")));
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        assert!(!cli.no_default_options);
    }

    #[test]
    fn options_layer_over_defaults() {
        let cli = Cli::try_parse_from([
            "docparse",
            "--endpoint",
            "http://localhost:9000/parse",
            "--option",
            "ocr=auto",
            "--option",
            "output_formats=['html']",
        ])
        .unwrap();
        let config = cli.submitter_config();
        assert_eq!(config.endpoint, "http://localhost:9000/parse");
        assert_eq!(config.options["ocr"], "auto");
        assert_eq!(config.options["output_formats"], "['html']");
        assert_eq!(config.options["model"], "document-parse");
    }

    #[test]
    fn no_default_options_sends_only_explicit_fields() {
        let cli = Cli::try_parse_from([
            "docparse",
            "--no-default-options",
            "--option",
            "model=document-parse",
        ])
        .unwrap();
        let config = cli.submitter_config();
        assert_eq!(config.options.len(), 1);
        assert_eq!(config.options["model"], "document-parse");
    }

    #[test]
    fn rejects_malformed_option() {
        assert!(Cli::try_parse_from(["docparse", "--option", "ocr"]).is_err());
    }
}
