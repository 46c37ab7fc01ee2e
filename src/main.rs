// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, pick the real prompts, run once.
// - Maps the outcome to an exit code: 0 on success or when no file was
//   chosen, 1 on any failure.

use anyhow::Context;
use clap::Parser;
use docparse_cli::cli::{run, Cli, Outcome};
use docparse_cli::ui::{CredentialProvider, DialogFile, EnvCredential, FileResolver, PromptCredential, RelativeFile};
use docparse_cli::Error;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            println!("\n--- Document Parsing Failed ---");
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine; the key may come from the shell.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing()?;

    let files: Box<dyn FileResolver> = match &cli.filename {
        Some(name) => Box::new(RelativeFile::from_exe_dir(name)),
        None => Box::new(DialogFile::default()),
    };
    let credentials = EnvCredential::default().or_else(PromptCredential::default());

    match run(&cli, files.as_ref(), &credentials).context("document parsing failed")? {
        Outcome::Saved(path) => {
            println!("\n--- Document Parsing Successful ---");
            println!("JSON result saved to: {}", path.display());
        }
        Outcome::NoFileSelected => println!("No file selected. Exiting."),
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the failure with the status and body when the service sent one, so
/// the request can be retried by hand.
fn report(err: &anyhow::Error) {
    eprintln!("Error: {err:#}");
    let Some(err) = err.downcast_ref::<Error>() else {
        return;
    };
    if let Some(status) = err.status() {
        eprintln!("Status Code: {status}");
    }
    let Some(body) = err.body() else {
        return;
    };
    match body.as_json() {
        Some(value) => {
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            eprintln!("API Error Response: {pretty}");
        }
        None => eprintln!("API Error Response (non-JSON): {body}"),
    }
}

/// Log level comes from `RUST_LOG`, `info` when unset.
fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    Ok(())
}
