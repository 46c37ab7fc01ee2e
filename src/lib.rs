// Library root
// -----------
// The binary (`main.rs`) parses arguments and wires real prompts into
// `cli::run`; everything else lives here so it can be tested without a
// terminal or a live service.
//
// Module responsibilities:
// - `api`: the credential type and the blocking multipart upload.
// - `config`: endpoint, form field and option defaults for the upload.
// - `error`: failure kinds, including the upstream status and body.
// - `output`: where the JSON goes and how it is written.
// - `ui`: credential and file sources (environment, prompt, dialog).
// - `cli`: argument definitions and the end-to-end run.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod ui;

pub use api::{Credential, DocumentSubmitter};
pub use config::SubmitterConfig;
pub use error::{Error, ErrorBody, Result};
