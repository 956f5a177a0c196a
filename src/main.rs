// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use std::io::Write;
use std::path::PathBuf;

use ocr_text::utils::document_processor::{DocumentProcessor, OutputFormat};
use ocr_text::{ExtractOptions, Level};

#[derive(Parser, Debug)]
#[command(
    name = "ocr-text",
    version,
    about = "Extract text from PAGE XML, ALTO XML or plain-text files"
)]
struct Cli {
    /// Input files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// PAGE granularity to read text at
    #[arg(long, value_enum, default_value_t = Level::Region)]
    level: Level,

    /// PAGE TextEquiv index to read
    #[arg(long, default_value = "0")]
    index: String,

    /// Print segments with their element ids as JSON instead of plain text
    #[arg(long, default_value_t = false)]
    segments: bool,

    /// Write one output file per input into this directory instead of printing
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Worker threads for batch extraction (defaults to the number of CPUs)
    #[arg(long)]
    jobs: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let format = if cli.segments {
        OutputFormat::Segments
    } else {
        OutputFormat::Text
    };
    let processor = DocumentProcessor::new(ExtractOptions::new(cli.level, cli.index));

    if let Some(output_dir) = cli.output_dir {
        let summary = processor.process_documents(&cli.files, &output_dir, format)?;
        if summary.failed > 0 {
            anyhow::bail!("{} of {} files failed", summary.failed, cli.files.len());
        }
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0;
    for document in processor.extract_all(&cli.files) {
        match document.result {
            Ok(text) => {
                let rendered = format.render(&text)?;
                writeln!(out, "{}", rendered).context("Failed to write to stdout")?;
            }
            Err(e) => {
                error!("{}: {}", document.path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files failed", failed, cli.files.len());
    }
    Ok(())
}
