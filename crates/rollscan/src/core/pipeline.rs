//! List and card document pipelines.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use image::DynamicImage;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};

use crate::core::config::RollscanConfig;
use crate::ocr::{CropKind, EngineConfig, Recognizer, prepare_card_page};
use crate::records::{CardParser, ListParser};
use crate::segment::Segmenter;
use crate::types::{CellSplit, ListRecord, RasterPage, RecordSet};
use crate::{Result, RollscanError};

/// Where a crop came from, for log context.
#[derive(Debug, Clone, Copy)]
struct CropSite {
    page: usize,
    cell: Option<usize>,
    kind: CropKind,
}

/// Drives segmentation, recognition and record assembly.
///
/// Parsers are compiled once from the configured vocabulary and shared by
/// every cell task.
pub struct RollPipeline {
    config: Arc<RollscanConfig>,
    segmenter: Segmenter,
    list_parser: Arc<ListParser>,
    card_parser: Arc<CardParser>,
    recognizer: Arc<dyn Recognizer>,
}

impl RollPipeline {
    pub fn new(config: RollscanConfig, recognizer: Arc<dyn Recognizer>) -> Result<Self> {
        config.validate()?;
        let segmenter = Segmenter::new(config.segmentation.clone())?;
        let list_parser = Arc::new(ListParser::new(&config.vocabulary)?);
        let card_parser = Arc::new(CardParser::new(&config.vocabulary)?);

        Ok(Self {
            config: Arc::new(config),
            segmenter,
            list_parser,
            card_parser,
            recognizer,
        })
    }

    pub fn config(&self) -> &RollscanConfig {
        &self.config
    }

    fn cell_timeout(&self) -> Option<Duration> {
        self.config.ocr.cell_timeout_ms.map(Duration::from_millis)
    }

    /// Records of one list page in `(y, x)` cell order. Serials start at
    /// `first_serial`.
    pub async fn process_list_page(&self, page: RasterPage, first_serial: usize) -> Result<Vec<ListRecord>> {
        let segmenter = self.segmenter.clone();
        let (page, cells) = tokio::task::spawn_blocking(move || {
            let cells = segmenter.segment(&page);
            (page, cells)
        })
        .await
        .map_err(|e| RollscanError::Other(format!("Segmentation task panicked: {}", e)))?;

        self.recognize_cells(&page, &cells, first_serial).await
    }

    /// Records of every page, page by page. Serials run across the document.
    pub async fn process_list_document(&self, pages: Vec<RasterPage>) -> Result<RecordSet> {
        if pages.is_empty() {
            return Ok(RecordSet::List(Vec::new()));
        }

        let segmenter = self.segmenter.clone();
        let (pages, page_cells) = tokio::task::spawn_blocking(move || {
            let page_cells = segmenter.segment_pages(&pages);
            (pages, page_cells)
        })
        .await
        .map_err(|e| RollscanError::Other(format!("Segmentation task panicked: {}", e)))?;

        let mut records = Vec::new();
        for (page, cells) in pages.iter().zip(page_cells.iter()) {
            let page_records = self.recognize_cells(page, cells, records.len() + 1).await?;
            records.extend(page_records);
        }

        tracing::debug!(pages = pages.len(), records = records.len(), "List document processed");
        Ok(RecordSet::List(records))
    }

    async fn recognize_cells(
        &self,
        page: &RasterPage,
        cells: &[CellSplit],
        first_serial: usize,
    ) -> Result<Vec<ListRecord>> {
        if cells.is_empty() {
            return Ok(Vec::new());
        }

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency()));
        let timeout = self.cell_timeout();
        let page_number = page.page_number();
        let mut tasks = JoinSet::new();
        let mut ranks: HashMap<Id, usize> = HashMap::with_capacity(cells.len());

        for (rank, cell) in cells.iter().enumerate() {
            let text_crop = page.crop(&cell.text);
            let identifier_crop = page.crop(&cell.identifier);
            let recognizer = Arc::clone(&self.recognizer);
            let parser = Arc::clone(&self.list_parser);
            let config = Arc::clone(&self.config);
            let semaphore = Arc::clone(&semaphore);

            let handle = tasks.spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => return (rank, Err(RollscanError::Other(format!("Cell pool closed: {}", e)))),
                };

                let language = config.ocr.language.as_str();
                let text = recognize_or_empty(
                    recognizer.as_ref(),
                    &text_crop,
                    language,
                    config.ocr.engine(CropKind::Prose),
                    timeout,
                    CropSite {
                        page: page_number,
                        cell: Some(rank),
                        kind: CropKind::Prose,
                    },
                )
                .await;
                let identifier = recognize_or_empty(
                    recognizer.as_ref(),
                    &identifier_crop,
                    language,
                    config.ocr.engine(CropKind::Identifier),
                    timeout,
                    CropSite {
                        page: page_number,
                        cell: Some(rank),
                        kind: CropKind::Identifier,
                    },
                )
                .await;

                let record = parser.parse(&text, &identifier, page_number, first_serial + rank);
                (rank, Ok(record))
            });
            ranks.insert(handle.id(), rank);
        }

        let mut results: Vec<Option<ListRecord>> = vec![None; cells.len()];

        while let Some(task_result) = tasks.join_next_with_id().await {
            match task_result {
                Ok((_, (rank, Ok(record)))) => results[rank] = Some(record),
                Ok((_, (_, Err(e)))) => return Err(e),
                Err(join_err) => {
                    let Some(&rank) = ranks.get(&join_err.id()) else {
                        return Err(RollscanError::Other(format!("Cell task panicked: {}", join_err)));
                    };
                    tracing::warn!(
                        page = page_number,
                        cell = rank,
                        error = %join_err,
                        "Cell task panicked; using an empty record"
                    );
                    results[rank] = Some(self.list_parser.parse("", "", page_number, first_serial + rank));
                }
            }
        }

        tracing::debug!(page = page_number, cells = cells.len(), "List page recognized");

        results
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| RollscanError::Other(format!("Page {} finished with missing cell results", page_number)))
    }

    /// The single card record for a document of one or more page images.
    ///
    /// Pages are preprocessed and recognized in order; their texts are joined
    /// with newlines and parsed as one card.
    pub async fn process_card_document(&self, pages: Vec<RasterPage>, reference_date: NaiveDate) -> Result<RecordSet> {
        let timeout = self.cell_timeout();
        let mut texts = Vec::with_capacity(pages.len());

        for page in pages {
            let page_number = page.page_number();
            let preprocessing = self.config.card_preprocessing.clone();
            let prepared = tokio::task::spawn_blocking(move || prepare_card_page(page.image(), &preprocessing))
                .await
                .map_err(|e| RollscanError::Other(format!("Card preprocessing task panicked: {}", e)))?;

            let text = recognize_or_empty(
                self.recognizer.as_ref(),
                &prepared,
                &self.config.ocr.card_language,
                self.config.ocr.engine(CropKind::Sparse),
                timeout,
                CropSite {
                    page: page_number,
                    cell: None,
                    kind: CropKind::Sparse,
                },
            )
            .await;
            texts.push(text);
        }

        let raw = texts.join("\n");
        tracing::debug!(pages = texts.len(), chars = raw.len(), "Card document recognized");
        Ok(RecordSet::Card(self.card_parser.parse(&raw, reference_date)))
    }
}

/// Recognize a crop, degrading a failure or timeout to empty text.
async fn recognize_or_empty(
    recognizer: &dyn Recognizer,
    crop: &DynamicImage,
    language: &str,
    engine: &EngineConfig,
    timeout: Option<Duration>,
    site: CropSite,
) -> String {
    let recognition = recognizer.recognize(crop, language, engine);
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, recognition).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    recognizer = recognizer.name(),
                    page = site.page,
                    cell = ?site.cell,
                    kind = ?site.kind,
                    timeout_ms = limit.as_millis() as u64,
                    "OCR timed out; using empty text"
                );
                return String::new();
            }
        },
        None => recognition.await,
    };

    match outcome {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                recognizer = recognizer.name(),
                page = site.page,
                cell = ?site.cell,
                kind = ?site.kind,
                error = %e,
                "OCR failed; using empty text"
            );
            String::new()
        }
    }
}
