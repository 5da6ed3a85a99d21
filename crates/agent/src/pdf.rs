//! Download a PDF and return its text.
//!
//! The bytes go to a uniquely named temporary file for the external extractor
//! and the file is removed when the call returns, whatever the outcome.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;
use tracing::{error, info};

use crate::error::ToolError;
use crate::tools::{parse_args, schema_of, Tool};

#[async_trait]
pub trait PdfSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ToolError>;
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, pdf: &Path) -> Result<String, ToolError>;
}

/// Plain HTTP download. File URLs are public, so no API key is sent.
#[derive(Clone, Debug, Default)]
pub struct HttpPdfSource {
    client: reqwest::Client,
}

impl HttpPdfSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PdfSource for HttpPdfSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ToolError> {
        let network = |error: reqwest::Error| ToolError::Network {
            url: url.to_string(),
            message: error.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(ToolError::Download { status, url: url.to_string() });
        }

        let bytes = response.bytes().await.map_err(network)?;
        Ok(bytes.to_vec())
    }
}

/// Shells out to poppler's `pdftotext`, reading the text from its stdout.
#[derive(Clone, Debug)]
pub struct PdfToTextExtractor {
    program: String,
}

impl PdfToTextExtractor {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn locate(&self) -> Result<PathBuf, ToolError> {
        which::which(&self.program).map_err(|_| ToolError::ExtractorUnavailable(self.program.clone()))
    }

    pub fn is_available(&self) -> bool {
        self.locate().is_ok()
    }
}

impl Default for PdfToTextExtractor {
    fn default() -> Self {
        Self::new("pdftotext")
    }
}

#[async_trait]
impl TextExtractor for PdfToTextExtractor {
    async fn extract(&self, pdf: &Path) -> Result<String, ToolError> {
        let program = self.locate()?;

        let output = Command::new(&program)
            .arg("-enc")
            .arg("UTF-8")
            .arg(pdf)
            .arg("-")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(event_name = "agent.pdf.extract_failed", stderr = %stderr, "pdftotext failed");
            return Err(ToolError::Conversion(stderr.trim().to_string()));
        }

        String::from_utf8(output.stdout).map_err(|error| ToolError::Conversion(error.to_string()))
    }
}

pub struct PdfTextFetcher {
    source: Arc<dyn PdfSource>,
    extractor: Arc<dyn TextExtractor>,
    scratch_dir: Option<PathBuf>,
}

impl PdfTextFetcher {
    pub fn new(source: Arc<dyn PdfSource>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { source, extractor, scratch_dir: None }
    }

    /// Temporary files go here instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.scratch_dir = dir;
        self
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String, ToolError> {
        let bytes = self.source.fetch(url).await?;

        let scratch = {
            let mut builder = tempfile::Builder::new();
            builder.prefix("regulus-").suffix(".pdf");
            match &self.scratch_dir {
                Some(dir) => builder.tempfile_in(dir)?,
                None => builder.tempfile()?,
            }
        };

        tokio::fs::write(scratch.path(), &bytes).await?;
        let text = self.extractor.extract(scratch.path()).await?;

        info!(
            event_name = "agent.pdf.extracted",
            url = %url,
            pdf_bytes = bytes.len(),
            text_chars = text.chars().count(),
            "PDF converted to text"
        );

        Ok(text)
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfContentArgs {
    /// Download URL of the PDF, usually a `fileUrl` from a document's `fileFormats`.
    pub pdf_url: String,
}

pub struct PdfContentTool {
    fetcher: PdfTextFetcher,
}

impl PdfContentTool {
    pub fn new(fetcher: PdfTextFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Tool for PdfContentTool {
    fn name(&self) -> &'static str {
        "get_pdf_content"
    }

    fn description(&self) -> &'static str {
        "Downloads a PDF from the given URL and returns its text content."
    }

    fn parameters(&self) -> Value {
        schema_of::<PdfContentArgs>()
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let args: PdfContentArgs = parse_args(self.name(), input)?;
        let url = args.pdf_url.trim();
        if url.is_empty() {
            return Err(ToolError::InvalidInput {
                tool: "get_pdf_content",
                message: "`pdfUrl` is required and cannot be empty".to_string(),
            }
            .into());
        }

        Ok(Value::String(self.fetcher.fetch_text(url).await?))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{
        HttpPdfSource, PdfContentTool, PdfSource, PdfTextFetcher, PdfToTextExtractor,
        TextExtractor,
    };
    use crate::error::ToolError;
    use crate::tools::Tool;

    struct StaticPdf(&'static [u8]);

    #[async_trait]
    impl PdfSource for StaticPdf {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, ToolError> {
            Ok(self.0.to_vec())
        }
    }

    /// Reads the scratch file back and remembers where it was.
    #[derive(Default)]
    struct EchoExtractor {
        seen: Mutex<Option<std::path::PathBuf>>,
    }

    #[async_trait]
    impl TextExtractor for EchoExtractor {
        async fn extract(&self, pdf: &Path) -> Result<String, ToolError> {
            if let Ok(mut seen) = self.seen.lock() {
                *seen = Some(pdf.to_path_buf());
            }
            Ok(fs::read_to_string(pdf)?)
        }
    }

    /// Serves the URL itself as the PDF body.
    struct UrlEchoPdf;

    #[async_trait]
    impl PdfSource for UrlEchoPdf {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, ToolError> {
            Ok(url.as_bytes().to_vec())
        }
    }

    /// Records every scratch path and holds it open long enough for calls to overlap.
    #[derive(Default)]
    struct SlowRecordingExtractor {
        seen: Mutex<Vec<std::path::PathBuf>>,
    }

    #[async_trait]
    impl TextExtractor for SlowRecordingExtractor {
        async fn extract(&self, pdf: &Path) -> Result<String, ToolError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(pdf.to_path_buf());
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(fs::read_to_string(pdf)?)
        }
    }

    struct FailingExtractor;

    #[async_trait]
    impl TextExtractor for FailingExtractor {
        async fn extract(&self, _pdf: &Path) -> Result<String, ToolError> {
            Err(ToolError::Conversion("syntax error: couldn't find trailer dictionary".to_string()))
        }
    }

    fn entries(dir: &TempDir) -> usize {
        fs::read_dir(dir.path()).map(|entries| entries.count()).unwrap_or(usize::MAX)
    }

    #[tokio::test]
    async fn failed_download_reports_status_and_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let scratch = TempDir::new().expect("scratch dir");
        let fetcher = PdfTextFetcher::new(Arc::new(HttpPdfSource::new()), Arc::new(EchoExtractor::default()))
            .with_scratch_dir(Some(scratch.path().to_path_buf()));

        let url = format!("{}/missing.pdf", server.uri());
        let error = fetcher.fetch_text(&url).await.expect_err("404 download");

        assert!(matches!(error, ToolError::Download { status: 404, .. }));
        assert!(error.to_string().contains("404"));
        assert_eq!(entries(&scratch), 0);
    }

    #[tokio::test]
    async fn successful_conversion_removes_scratch_file() {
        let scratch = TempDir::new().expect("scratch dir");
        let extractor = Arc::new(EchoExtractor::default());
        let fetcher = PdfTextFetcher::new(Arc::new(StaticPdf(b"extracted body")), extractor.clone())
            .with_scratch_dir(Some(scratch.path().to_path_buf()));

        let text = fetcher.fetch_text("https://downloads.example.test/a.pdf").await.expect("text");
        assert_eq!(text, "extracted body");

        let seen = extractor.seen.lock().expect("lock").clone().expect("extractor ran");
        assert!(seen.starts_with(scratch.path()));
        assert!(seen.extension().is_some_and(|ext| ext == "pdf"));
        assert!(!seen.exists());
        assert_eq!(entries(&scratch), 0);
    }

    #[tokio::test]
    async fn conversion_failure_still_removes_scratch_file() {
        let scratch = TempDir::new().expect("scratch dir");
        let fetcher = PdfTextFetcher::new(Arc::new(StaticPdf(b"%PDF-1.7")), Arc::new(FailingExtractor))
            .with_scratch_dir(Some(scratch.path().to_path_buf()));

        let error = fetcher.fetch_text("https://downloads.example.test/b.pdf").await.expect_err("bad");
        assert!(matches!(error, ToolError::Conversion(_)));
        assert_eq!(entries(&scratch), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_fetches_use_separate_scratch_files() {
        let scratch = TempDir::new().expect("scratch dir");
        let extractor = Arc::new(SlowRecordingExtractor::default());
        let fetcher = Arc::new(
            PdfTextFetcher::new(Arc::new(UrlEchoPdf), extractor.clone())
                .with_scratch_dir(Some(scratch.path().to_path_buf())),
        );

        let handles: Vec<_> = (0..8)
            .map(|index| {
                let fetcher = Arc::clone(&fetcher);
                tokio::spawn(async move {
                    let url = format!("https://downloads.example.test/{index}.pdf");
                    let text = fetcher.fetch_text(&url).await.expect("text");
                    (url, text)
                })
            })
            .collect();

        for handle in handles {
            let (url, text) = handle.await.expect("task joined");
            assert_eq!(text, url);
        }

        let mut seen = extractor.seen.lock().expect("lock").clone();
        assert_eq!(seen.len(), 8);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 8, "every call needs its own scratch file");
        assert_eq!(entries(&scratch), 0);
    }

    #[tokio::test]
    async fn tool_requires_a_url() {
        let fetcher = PdfTextFetcher::new(Arc::new(StaticPdf(b"")), Arc::new(FailingExtractor));
        let tool = PdfContentTool::new(fetcher);

        let error = tool.execute(json!({ "pdfUrl": " " })).await.expect_err("empty url");
        assert!(error.to_string().contains("pdfUrl"));
    }

    #[tokio::test]
    async fn missing_extractor_binary_is_reported() {
        let extractor = PdfToTextExtractor::new("regulus-no-such-extractor");
        assert!(!extractor.is_available());

        let error = extractor.extract(Path::new("unused.pdf")).await.expect_err("not on PATH");
        assert!(matches!(error, ToolError::ExtractorUnavailable(ref name) if name == "regulus-no-such-extractor"));
    }
}
