use crate::core::layout::ExtractedText;
use crate::core::page::ExtractOptions;
use crate::core::parser::UniversalExtractor;
use crate::diagnostics::Diagnostic;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// How extracted documents are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Flattened text, `<stem>.txt`
    #[default]
    Text,
    /// `ExtractedText` as pretty JSON, `<stem>.json`
    Segments,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Segments => "json",
        }
    }

    /// Render `text` in this format
    pub fn render(self, text: &ExtractedText) -> Result<String> {
        match self {
            Self::Text => Ok(text.text()),
            Self::Segments => {
                serde_json::to_string_pretty(text).context("Failed to serialize segments")
            }
        }
    }
}

/// Result of extracting one input file
#[derive(Debug)]
pub struct ProcessedDocument {
    pub path: PathBuf,
    pub result: crate::error::Result<ExtractedText>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Counts from a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub written: usize,
    pub failed: usize,
    /// Reading-order diagnostics reported across all files
    pub diagnostics: usize,
}

/// Extracts text from many files in parallel. Every file is an independent extraction; a failing
/// file is logged and does not stop the others.
pub struct DocumentProcessor {
    extractor: UniversalExtractor,
}

impl DocumentProcessor {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            extractor: UniversalExtractor::new(options),
        }
    }

    /// Extract every file in `paths`, results in input order
    pub fn extract_all(&self, paths: &[PathBuf]) -> Vec<ProcessedDocument> {
        info!("Extracting {} documents", paths.len());
        paths
            .par_iter()
            .map(|path| {
                let mut diagnostics: Vec<Diagnostic> = Vec::new();
                let result = self.extractor.extract(path, &mut diagnostics);
                for diagnostic in &diagnostics {
                    warn!("{}: {}", path.display(), diagnostic);
                }
                ProcessedDocument {
                    path: path.clone(),
                    result,
                    diagnostics,
                }
            })
            .collect()
    }

    /// Extract every file in `paths` and write each result to `output_dir/<stem>.<ext>`
    pub fn process_documents<P: AsRef<Path>>(
        &self,
        paths: &[PathBuf],
        output_dir: P,
        format: OutputFormat,
    ) -> Result<ProcessSummary> {
        let output_path = output_dir.as_ref();
        fs::create_dir_all(output_path).with_context(|| {
            format!("Failed to create output directory: {}", output_path.display())
        })?;
        debug!("Output directory prepared: {}", output_path.display());

        let mut summary = ProcessSummary::default();
        for document in self.extract_all(paths) {
            summary.diagnostics += document.diagnostics.len();
            match self.write_document(&document, output_path, format) {
                Ok(out_file) => {
                    info!("Wrote {}", out_file.display());
                    summary.written += 1;
                }
                Err(e) => {
                    error!("Failed to process {}: {:#}", document.path.display(), e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Completed: {} written, {} failed, {} diagnostics",
            summary.written, summary.failed, summary.diagnostics
        );
        Ok(summary)
    }

    fn write_document(
        &self,
        document: &ProcessedDocument,
        output_dir: &Path,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let text = match &document.result {
            Ok(text) => text,
            Err(e) => anyhow::bail!("{}", e),
        };
        let stem = document
            .path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy();
        let out_file = output_dir.join(format!("{}.{}", stem, format.extension()));
        let rendered = format.render(text)?;
        fs::write(&out_file, rendered)
            .with_context(|| format!("Failed to write {}", out_file.display()))?;
        Ok(out_file)
    }
}
