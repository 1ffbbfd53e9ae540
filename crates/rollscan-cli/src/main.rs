use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rollscan::{CardParser, ListParser, RasterPage, RecordSet, Recognizer, RollPipeline, RollscanConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollscan", version, about = "Extract structured records from voter-roll scans")]
struct Cli {
    /// Config file (TOML, YAML or JSON); defaults to a discovered rollscan.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Segment and OCR list pages, one image per page
    List {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// OCR a voter-ID card; all images are pages of one card
    Card {
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Date ages are computed against (YYYY-MM-DD, default today)
        #[arg(long)]
        reference_date: Option<NaiveDate>,
    },
    /// Parse already recognized text without OCR
    Parse {
        #[arg(long, value_enum)]
        mode: Mode,

        /// Date ages are computed against (YYYY-MM-DD, default today)
        #[arg(long)]
        reference_date: Option<NaiveDate>,

        /// Text file; in list mode the whole file is one cell
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    List,
    Card,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    let records = match cli.command {
        Command::List { images } => {
            let pipeline = RollPipeline::new(config.clone(), recognizer(&config)?)?;
            pipeline.process_list_document(open_pages(&images)?).await?
        }
        Command::Card { images, reference_date } => {
            let pipeline = RollPipeline::new(config.clone(), recognizer(&config)?)?;
            pipeline
                .process_card_document(open_pages(&images)?, reference_date.unwrap_or_else(today))
                .await?
        }
        Command::Parse {
            mode,
            reference_date,
            file,
        } => {
            let text = std::fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            match mode {
                Mode::List => {
                    let parser = ListParser::new(&config.vocabulary)?;
                    RecordSet::List(vec![parser.parse(&text, &text, 1, 1)])
                }
                Mode::Card => {
                    let parser = CardParser::new(&config.vocabulary)?;
                    RecordSet::Card(parser.parse(&text, reference_date.unwrap_or_else(today)))
                }
            }
        }
    };

    tracing::info!(records = records.len(), "Extraction finished");
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RollscanConfig> {
    match path {
        Some(path) => RollscanConfig::from_file(path).with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(RollscanConfig::discover()?.unwrap_or_default()),
    }
}

fn open_pages(images: &[PathBuf]) -> Result<Vec<RasterPage>> {
    images
        .iter()
        .enumerate()
        .map(|(index, path)| {
            RasterPage::open(index, path).with_context(|| format!("Failed to open image {}", path.display()))
        })
        .collect()
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(feature = "tesseract")]
fn recognizer(config: &RollscanConfig) -> Result<Arc<dyn Recognizer>> {
    let recognizer = rollscan::ocr::TesseractRecognizer::new(config.ocr.tessdata_path.as_deref())?;
    Ok(Arc::new(recognizer))
}

#[cfg(not(feature = "tesseract"))]
fn recognizer(_config: &RollscanConfig) -> Result<Arc<dyn Recognizer>> {
    Err(rollscan::RollscanError::MissingDependency(
        "OCR subcommands need the `tesseract` feature (rebuild with --features tesseract)".to_string(),
    )
    .into())
}
