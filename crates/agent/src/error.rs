use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool `{0}`")]
    UnknownTool(String),
    #[error("invalid arguments for `{tool}`: {message}")]
    InvalidInput { tool: &'static str, message: String },
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
    #[error("failed to download PDF from {url}: status code {status}")]
    Download { status: u16, url: String },
    #[error("failed to convert PDF to text: {0}")]
    Conversion(String),
    #[error("PDF text extractor `{0}` was not found on PATH")]
    ExtractorUnavailable(String),
    #[error("could not read agency directory `{path}`: {message}")]
    AgencyDirectory { path: PathBuf, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
