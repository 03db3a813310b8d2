//! OCR collaborator boundary.
//!
//! The recognition engine is a black box to the capture core: PNG bytes
//! and an optional language hint go in, text plus confidence come out.
//! The bundled implementation shells out to the `tesseract` binary; any
//! other engine just implements `OcrEngine`.

use std::path::PathBuf;
use std::process::Command;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("no OCR engine available: {0}")]
    EngineUnavailable(String),
    #[error("recognition failed: {0}")]
    Failed(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Recognition result handed back to the pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrOutput {
    pub text: String,
    /// Mean word confidence, 0.0..=1.0.
    pub confidence: f64,
    pub char_count: usize,
    pub latency_ms: f64,
}

pub trait OcrEngine: Send + Sync {
    fn recognize(&self, png_bytes: &[u8], language_hint: Option<&str>)
        -> Result<OcrOutput, OcrError>;
}

/// Tesseract via its CLI, located on PATH at startup.
pub struct TesseractCli {
    binary: PathBuf,
}

impl TesseractCli {
    pub fn discover() -> Result<Self, OcrError> {
        let binary = which::which("tesseract")
            .map_err(|e| OcrError::EngineUnavailable(format!("tesseract not found: {e}")))?;
        log::info!("[OCR] using {}", binary.display());
        Ok(Self { binary })
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(
        &self,
        png_bytes: &[u8],
        language_hint: Option<&str>,
    ) -> Result<OcrOutput, OcrError> {
        let start = std::time::Instant::now();

        // Tesseract wants a file path; the crop is small so a temp file
        // is cheap. Unique per process to tolerate parallel test runs.
        let input = std::env::temp_dir().join(format!("textgrab-ocr-{}.png", std::process::id()));
        std::fs::write(&input, png_bytes)?;

        let mut command = Command::new(&self.binary);
        command.arg(&input).arg("stdout");
        if let Some(lang) = language_hint {
            command.args(["-l", lang]);
        }
        command.args(["--psm", "3", "tsv"]);

        let output = command.output();
        let _ = std::fs::remove_file(&input);
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Failed(stderr.trim().to_string()));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let (text, confidence) = parse_tsv(&tsv);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        log::info!(
            "[OCR] {} chars in {:.0}ms, confidence={:.2}",
            text.chars().count(),
            latency_ms,
            confidence
        );

        Ok(OcrOutput {
            char_count: text.chars().count(),
            text,
            confidence,
            latency_ms,
        })
    }
}

/// Rebuild line-structured text from tesseract's TSV output and average
/// the per-word confidences.
///
/// TSV columns: level, page, block, par, line, word, left, top, width,
/// height, conf, text. Word rows are level 5; non-word rows carry -1
/// confidence and no text.
fn parse_tsv(tsv: &str) -> (String, f64) {
    let mut text = String::new();
    let mut current_line: Option<(String, String, String)> = None;
    let mut conf_sum = 0.0;
    let mut conf_count = 0usize;

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let word = cols[11].trim();
        if word.is_empty() {
            continue;
        }

        let line_key = (
            cols[2].to_string(),
            cols[3].to_string(),
            cols[4].to_string(),
        );
        match &current_line {
            Some(previous) if *previous == line_key => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        current_line = Some(line_key);
        text.push_str(word);

        if let Ok(conf) = cols[10].parse::<f64>() {
            if conf >= 0.0 {
                conf_sum += conf;
                conf_count += 1;
            }
        }
    }

    let confidence = if conf_count > 0 {
        conf_sum / conf_count as f64 / 100.0
    } else {
        0.0
    };
    (text, confidence)
}
