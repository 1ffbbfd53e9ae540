//! List pipeline integration tests.
//!
//! Pages are drawn synthetically and recognized by scripted recognizers that
//! answer by crop kind (page segmentation mode) and crop width, so each cell
//! gets its own text without a real OCR engine.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::{DynamicImage, GrayImage, Luma};
use rollscan::ocr::{EngineConfig, PSMMode, Recognizer};
use rollscan::types::{CellBox, NOT_STATED, RasterPage, RecordSet};
use rollscan::{RollPipeline, RollscanConfig, RollscanError};

fn draw_box(gray: &mut GrayImage, cell: CellBox) {
    for y in cell.y..cell.bottom() {
        for x in cell.x..cell.right() {
            let on_edge = x < cell.x + 3 || x >= cell.right() - 3 || y < cell.y + 3 || y >= cell.bottom() - 3;
            if on_edge {
                gray.put_pixel(x, y, Luma([0]));
            }
        }
    }
}

fn page(index: usize, width: u32, height: u32, cells: &[CellBox]) -> RasterPage {
    let mut gray = GrayImage::from_pixel(width, height, Luma([255]));
    for cell in cells {
        draw_box(&mut gray, *cell);
    }
    RasterPage::new(index, DynamicImage::ImageLuma8(gray))
}

/// Three cells of distinct widths: two on the top row, one below.
fn first_page() -> RasterPage {
    page(
        0,
        1000,
        620,
        &[
            CellBox::new(500, 40, 450, 250),
            CellBox::new(20, 320, 500, 250),
            CellBox::new(20, 40, 400, 250),
        ],
    )
}

fn second_page() -> RasterPage {
    page(1, 700, 320, &[CellBox::new(30, 30, 380, 220)])
}

/// Answers from a `(psm, crop width)` table and records every call.
struct ScriptedRecognizer {
    answers: HashMap<(u8, u32), String>,
    calls: Mutex<Vec<(u8, String)>>,
}

impl ScriptedRecognizer {
    fn new(answers: &[((u8, u32), &str)]) -> Self {
        Self {
            answers: answers.iter().map(|(key, text)| (*key, text.to_string())).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recognize(&self, crop: &DynamicImage, language: &str, engine: &EngineConfig) -> rollscan::Result<String> {
        self.calls.lock().unwrap().push((engine.psm, language.to_string()));
        Ok(self.answers.get(&(engine.psm, crop.width())).cloned().unwrap_or_default())
    }
}

const PROSE: u8 = 6;
const IDENTIFIER: u8 = 7;

fn scripted() -> ScriptedRecognizer {
    // Text crops are 72% of the cell width, identifier crops the rest.
    ScriptedRecognizer::new(&[
        (
            (PROSE, 288),
            "Name : Ram Kumar Fathers Name: Shyam Lal House No : 12 B Age : 34 Gender : MALE",
        ),
        ((IDENTIFIER, 112), "XYZ1234567"),
        (
            (PROSE, 324),
            "Name : Sita Devi Husbands Name: Mohan Das House No : 4/1 Age : 29 Gender : FEMALE",
        ),
        ((IDENTIFIER, 126), "EPIC NO: ABC 765 4321"),
        ((PROSE, 360), "Name : Asha Mothers Name: Kamala House No : 7 Age : 61 Gender : FEMALE"),
        ((IDENTIFIER, 140), "KLM1112223"),
        ((PROSE, 273), "Name : Gopal Rao Fathers Name: Venkat Rao Age : 52 Gender : MALE"),
        ((IDENTIFIER, 107), "PQR9988776"),
    ])
}

fn pipeline(recognizer: Arc<dyn Recognizer>) -> RollPipeline {
    let config = RollscanConfig {
        max_concurrent_cells: Some(2),
        ..RollscanConfig::default()
    };
    RollPipeline::new(config, recognizer).unwrap()
}

#[tokio::test]
async fn test_single_page_records_follow_row_order() {
    let recognizer = Arc::new(scripted());
    let pipeline = pipeline(recognizer.clone());

    let records = pipeline.process_list_page(first_page(), 1).await.unwrap();

    assert_eq!(records.len(), 3);
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["RAM KUMAR", "SITA DEVI", "ASHA"]);
    let serials: Vec<usize> = records.iter().map(|r| r.serial).collect();
    assert_eq!(serials, vec![1, 2, 3]);

    assert_eq!(records[0].guardian_type, "FATHER");
    assert_eq!(records[0].house_no, "12 B");
    assert_eq!(records[0].identifier_code, "XYZ1234567");
    assert_eq!(records[1].guardian, "MOHAN DAS");
    assert_eq!(records[1].guardian_type, "HUSBAND");
    assert_eq!(records[1].identifier_code, "ABC7654321");
    assert_eq!(records[2].guardian_type, "MOTHER");
    assert_eq!(records[2].age, "61");
    assert!(records.iter().all(|r| r.page_number == 1));

    let calls = recognizer.calls.lock().unwrap();
    assert_eq!(calls.len(), 6, "Each cell gets one prose and one identifier pass");
    assert_eq!(calls.iter().filter(|(psm, _)| *psm == PROSE).count(), 3);
    assert_eq!(calls.iter().filter(|(psm, _)| *psm == IDENTIFIER).count(), 3);
    assert!(calls.iter().all(|(_, language)| language == "eng"));
}

#[tokio::test]
async fn test_serials_continue_across_pages() {
    let pipeline = pipeline(Arc::new(scripted()));

    let result = pipeline
        .process_list_document(vec![first_page(), second_page()])
        .await
        .unwrap();

    let RecordSet::List(records) = result else {
        panic!("List document should produce list records");
    };
    assert_eq!(records.len(), 4);
    assert_eq!(records[3].serial, 4);
    assert_eq!(records[3].page_number, 2);
    assert_eq!(records[3].name, "GOPAL RAO");
    assert_eq!(records[3].house_no, NOT_STATED);
    assert_eq!(records[3].identifier_code, "PQR9988776");
}

#[tokio::test]
async fn test_blank_pages_produce_no_records() {
    let pipeline = pipeline(Arc::new(scripted()));

    let blank = page(0, 800, 600, &[]);
    let result = pipeline.process_list_document(vec![blank]).await.unwrap();
    assert!(result.is_empty());

    let result = pipeline.process_list_document(Vec::new()).await.unwrap();
    assert_eq!(result, RecordSet::List(Vec::new()));
}

struct FailingRecognizer {
    calls: AtomicUsize,
}

#[async_trait]
impl Recognizer for FailingRecognizer {
    fn name(&self) -> &str {
        "failing"
    }

    async fn recognize(&self, _crop: &DynamicImage, _language: &str, _engine: &EngineConfig) -> rollscan::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RollscanError::ocr("engine crashed"))
    }
}

#[tokio::test]
async fn test_failed_recognition_degrades_to_sentinels() {
    let recognizer = Arc::new(FailingRecognizer {
        calls: AtomicUsize::new(0),
    });
    let pipeline = pipeline(recognizer.clone());

    let records = pipeline.process_list_page(first_page(), 10).await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(recognizer.calls.load(Ordering::SeqCst), 6);
    for (offset, record) in records.iter().enumerate() {
        assert_eq!(record.serial, 10 + offset);
        assert_eq!(record.name, NOT_STATED);
        assert_eq!(record.guardian_type, NOT_STATED);
        assert_eq!(record.identifier_code, NOT_STATED);
    }
}

struct SlowRecognizer;

#[async_trait]
impl Recognizer for SlowRecognizer {
    fn name(&self) -> &str {
        "slow"
    }

    async fn recognize(&self, _crop: &DynamicImage, _language: &str, engine: &EngineConfig) -> rollscan::Result<String> {
        if engine.psm == PSMMode::SingleLine.as_u8() {
            return Ok("XYZ1234567".to_string());
        }
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("Name : Never Seen Age : 40".to_string())
    }
}

#[tokio::test]
async fn test_timed_out_cell_keeps_other_fields() {
    let mut config = RollscanConfig::default();
    config.ocr.cell_timeout_ms = Some(50);
    let pipeline = RollPipeline::new(config, Arc::new(SlowRecognizer)).unwrap();

    let records = pipeline.process_list_page(second_page(), 1).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, NOT_STATED);
    assert_eq!(records[0].age, NOT_STATED);
    assert_eq!(records[0].identifier_code, "XYZ1234567");
}

/// Crashes on the bottom cell's text crop, answers normally elsewhere.
struct CrashingRecognizer {
    inner: ScriptedRecognizer,
}

#[async_trait]
impl Recognizer for CrashingRecognizer {
    fn name(&self) -> &str {
        "crashing"
    }

    async fn recognize(&self, crop: &DynamicImage, language: &str, engine: &EngineConfig) -> rollscan::Result<String> {
        if engine.psm == PROSE && crop.width() == 360 {
            panic!("engine aborted on one crop");
        }
        self.inner.recognize(crop, language, engine).await
    }
}

#[tokio::test]
async fn test_panicked_cell_keeps_siblings() {
    let pipeline = pipeline(Arc::new(CrashingRecognizer { inner: scripted() }));

    let records = pipeline.process_list_page(first_page(), 1).await.unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].name, "RAM KUMAR");
    assert_eq!(records[1].name, "SITA DEVI");
    assert_eq!(records[2].serial, 3);
    assert_eq!(records[2].page_number, 1);
    assert_eq!(records[2].name, NOT_STATED);
    assert_eq!(records[2].age, NOT_STATED);
    assert_eq!(records[2].identifier_code, NOT_STATED);
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let config = RollscanConfig {
        max_concurrent_cells: Some(0),
        ..RollscanConfig::default()
    };
    assert!(RollPipeline::new(config, Arc::new(SlowRecognizer)).is_err());
}
