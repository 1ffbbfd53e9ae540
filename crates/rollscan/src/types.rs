//! Core data model: raster pages, cell geometry and the assembled records.

use std::cmp::Ordering;
use std::path::Path;

use image::DynamicImage;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sentinel used for every field that could not be recovered.
pub const NOT_STATED: &str = "Not Stated";

/// Sentinel for a card address that is missing or too short to be meaningful.
pub const ADDRESS_NOT_AVAILABLE: &str = "Not Available on Voter ID";

/// One decoded page image.
///
/// Produced by whatever rasterized the source document and owned only for the
/// duration of that page's processing.
#[derive(Debug, Clone)]
pub struct RasterPage {
    page_index: usize,
    image: DynamicImage,
}

impl RasterPage {
    /// Wrap an already decoded image. `page_index` is zero based.
    pub fn new(page_index: usize, image: DynamicImage) -> Self {
        Self { page_index, image }
    }

    /// Decode an image file from disk.
    pub fn open(page_index: usize, path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref())?;
        Ok(Self::new(page_index, image))
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// One based page number, as printed in the output rows.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Copy out a region of the page. The region is clamped to the page bounds.
    pub fn crop(&self, region: &CellBox) -> DynamicImage {
        let x = region.x.min(self.width());
        let y = region.y.min(self.height());
        let width = region.width.min(self.width() - x);
        let height = region.height.min(self.height() - y);
        self.image.crop_imm(x, y, width, height)
    }
}

/// Axis aligned rectangle in page pixel coordinates.
///
/// Boxes order by `(y, x)`: top to bottom, then left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Split into the text crop (left `ratio` of the width) and the identifier crop.
    pub fn split(&self, ratio: f64) -> CellSplit {
        let text_width = ((self.width as f64) * ratio).floor() as u32;
        let text_width = text_width.min(self.width);
        CellSplit {
            cell: *self,
            text: CellBox::new(self.x, self.y, text_width, self.height),
            identifier: CellBox::new(self.x + text_width, self.y, self.width - text_width, self.height),
        }
    }
}

impl Ord for CellBox {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x, self.width, self.height).cmp(&(other.y, other.x, other.width, other.height))
    }
}

impl PartialOrd for CellBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A kept cell with its two OCR sub-regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSplit {
    pub cell: CellBox,
    pub text: CellBox,
    pub identifier: CellBox,
}

/// Guardian relation categories, in scan priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardianKind {
    Father,
    Husband,
    Mother,
    Other,
}

impl GuardianKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardianKind::Father => "FATHER",
            GuardianKind::Husband => "HUSBAND",
            GuardianKind::Mother => "MOTHER",
            GuardianKind::Other => "OTHER",
        }
    }
}

/// One voter row recovered from a segmented list cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecord {
    #[serde(rename = "Page No")]
    pub page_number: usize,
    #[serde(rename = "Serial")]
    pub serial: usize,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Father/Husband")]
    pub guardian: String,
    #[serde(rename = "Guardian Type")]
    pub guardian_type: String,
    #[serde(rename = "House No")]
    pub house_no: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "EPIC No")]
    pub identifier_code: String,
}

impl ListRecord {
    /// Ordered column view using the output captions.
    pub fn to_row(&self) -> IndexMap<&'static str, String> {
        let mut row = IndexMap::with_capacity(9);
        row.insert("Serial", self.serial.to_string());
        row.insert("Name", self.name.clone());
        row.insert("Father/Husband", self.guardian.clone());
        row.insert("Guardian Type", self.guardian_type.clone());
        row.insert("House No", self.house_no.clone());
        row.insert("Age", self.age.clone());
        row.insert("Gender", self.gender.clone());
        row.insert("EPIC No", self.identifier_code.clone());
        row.insert("Page No", self.page_number.to_string());
        row
    }
}

/// The single record recovered from a whole voter-ID card scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Father Name")]
    pub father_name: String,
    #[serde(rename = "DOB")]
    pub dob: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "EPIC NUMBER")]
    pub identifier_code: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Pincode")]
    pub postal_code: String,
    #[serde(rename = "State")]
    pub region: String,
}

impl CardRecord {
    pub fn to_row(&self) -> IndexMap<&'static str, String> {
        let mut row = IndexMap::with_capacity(9);
        row.insert("Name", self.name.clone());
        row.insert("Father Name", self.father_name.clone());
        row.insert("DOB", self.dob.clone());
        row.insert("Age", self.age.clone());
        row.insert("EPIC NUMBER", self.identifier_code.clone());
        row.insert("Gender", self.gender.clone());
        row.insert("Address", self.address.clone());
        row.insert("Pincode", self.postal_code.clone());
        row.insert("State", self.region.clone());
        row
    }
}

/// Records produced for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordSet {
    /// One record per segmented cell, in page then `(y, x)` order.
    List(Vec<ListRecord>),
    /// Exactly one record for the whole card.
    Card(CardRecord),
}

impl RecordSet {
    pub fn len(&self) -> usize {
        match self {
            RecordSet::List(records) => records.len(),
            RecordSet::Card(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rows(&self) -> Vec<IndexMap<&'static str, String>> {
        match self {
            RecordSet::List(records) => records.iter().map(ListRecord::to_row).collect(),
            RecordSet::Card(record) => vec![record.to_row()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_cell_box_ordering_is_row_major() {
        let mut boxes = vec![
            CellBox::new(600, 100, 400, 200),
            CellBox::new(10, 400, 400, 200),
            CellBox::new(10, 100, 400, 200),
        ];
        boxes.sort();
        assert_eq!(boxes[0], CellBox::new(10, 100, 400, 200));
        assert_eq!(boxes[1], CellBox::new(600, 100, 400, 200));
        assert_eq!(boxes[2], CellBox::new(10, 400, 400, 200));
    }

    #[test]
    fn test_split_uses_fixed_ratio() {
        let split = CellBox::new(100, 50, 500, 200).split(0.72);
        assert_eq!(split.text, CellBox::new(100, 50, 360, 200));
        assert_eq!(split.identifier, CellBox::new(460, 50, 140, 200));
        assert_eq!(split.text.width + split.identifier.width, 500);
    }

    #[test]
    fn test_split_truncates_fractional_width() {
        let split = CellBox::new(0, 0, 401, 190).split(0.72);
        assert_eq!(split.text.width, 288);
        assert_eq!(split.identifier.x, 288);
        assert_eq!(split.identifier.width, 113);
    }

    #[test]
    fn test_crop_is_clamped_to_page() {
        let page = RasterPage::new(0, DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 80, Rgb([255, 255, 255]))));
        let crop = page.crop(&CellBox::new(90, 70, 50, 50));
        assert_eq!((crop.width(), crop.height()), (10, 10));
        assert_eq!(page.page_number(), 1);
    }

    #[test]
    fn test_record_rows_keep_caption_order() {
        let record = CardRecord {
            name: "Asha Rani".to_string(),
            father_name: NOT_STATED.to_string(),
            dob: NOT_STATED.to_string(),
            age: NOT_STATED.to_string(),
            identifier_code: "ABC1234567".to_string(),
            gender: "Female".to_string(),
            address: ADDRESS_NOT_AVAILABLE.to_string(),
            postal_code: NOT_STATED.to_string(),
            region: NOT_STATED.to_string(),
        };
        let row = record.to_row();
        let keys: Vec<_> = row.keys().copied().collect();
        assert_eq!(
            keys,
            vec!["Name", "Father Name", "DOB", "Age", "EPIC NUMBER", "Gender", "Address", "Pincode", "State"]
        );
        assert_eq!(RecordSet::Card(record).len(), 1);
    }

    #[test]
    fn test_list_record_serializes_with_captions() {
        let record = ListRecord {
            page_number: 2,
            serial: 7,
            name: "RAM".to_string(),
            guardian: "SHYAM".to_string(),
            guardian_type: "FATHER".to_string(),
            house_no: "12".to_string(),
            age: "40".to_string(),
            gender: "Male".to_string(),
            identifier_code: NOT_STATED.to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Father/Husband"], "SHYAM");
        assert_eq!(json["Page No"], 2);
        assert_eq!(json["EPIC No"], NOT_STATED);
    }
}
