//! Text extractor implementations.
//!
//! * [`StaticText`] returns fixed text.
//! * [`TesseractCli`] runs the `tesseract` executable on the canonical PNG.
//!
//! Closures with the signature `Fn(&ImageArtifact) -> VerifyResult<String>`
//! are extractors as well.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::core::traits::TextExtractor;
use crate::core::{VerifyError, VerifyResult};
use crate::domain::ImageArtifact;

/// Returns the same text for every image.
#[derive(Debug, Clone, Default)]
pub struct StaticText {
    text: String,
}

impl StaticText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Reads the text from a file.
    pub fn from_file(path: impl Into<PathBuf>) -> VerifyResult<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => VerifyError::NotFound { path: path.clone() },
            _ => VerifyError::Io(e),
        })?;
        Ok(Self { text })
    }
}

impl TextExtractor for StaticText {
    fn extract_text(&self, _image: &ImageArtifact) -> VerifyResult<String> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Pipes the image into `tesseract stdin stdout` and returns its output.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
    language: Option<String>,
}

impl TesseractCli {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            language: None,
        }
    }

    /// Uses a specific executable instead of `tesseract` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Passes `-l <language>`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("stdin").arg("stdout");
        if let Some(language) = &self.language {
            cmd.arg("-l").arg(language);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for TesseractCli {
    fn extract_text(&self, image: &ImageArtifact) -> VerifyResult<String> {
        let png = image.encode_png()?;
        debug!(
            "Running {} on {} byte PNG",
            self.program.display(),
            png.len()
        );

        let mut child = self.command().spawn().map_err(|e| {
            VerifyError::ocr_failure(format!("failed to start {}", self.program.display()), e)
        })?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| VerifyError::ocr_error("tesseract stdin unavailable"))?;

        // Feed stdin from a separate thread so a full stdout pipe cannot
        // block the write.
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(&png));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = match output {
            (_, Err(e)) => return Err(VerifyError::ocr_failure("tesseract did not finish", e)),
            (Err(e), Ok(_)) => {
                return Err(VerifyError::ocr_failure("failed to write image to tesseract", e));
            }
            (Ok(()), Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VerifyError::ocr_error(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
