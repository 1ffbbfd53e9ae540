//! Configuration loading integration tests.
//!
//! Covers the path from a config file on disk to compiled parsers:
//! - vocabulary overrides reaching the field rules
//! - validation that only happens when parsers or the pipeline are built
//! - extension-based format selection

use std::fs;

use rollscan::records::{CardParser, ListParser};
use rollscan::{RollscanConfig, RollscanError};
use tempfile::TempDir;

#[test]
fn test_toml_vocabulary_reaches_list_parser() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rollscan.toml");
    fs::write(
        &config_path,
        r#"
[vocabulary]
age_labels = ["AGE", "VAYASU"]
house_labels = ['GHAR\s*NO\.?']
house_bleed_labels = ["VAYASU", "GENDER"]
"#,
    )
    .unwrap();

    let config = RollscanConfig::from_file(&config_path).unwrap();
    let parser = ListParser::new(&config.vocabulary).unwrap();

    let record = parser.parse("NAME: RAVI TEJA GHAR NO: 14 VAYASU: 45 GENDER: MALE", "", 1, 1);
    assert_eq!(record.age, "45");
    assert_eq!(record.house_no, "14");
    assert_eq!(record.gender, "Male");
}

#[test]
fn test_yml_extension_is_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("settings.yml");
    fs::write(
        &config_path,
        "vocabulary:\n  regions: [\"GOA\"]\n  postal_prefix:\n    first: 4\n    last: 4\n",
    )
    .unwrap();

    let config = RollscanConfig::from_file(&config_path).unwrap();
    let parser = CardParser::new(&config.vocabulary).unwrap();
    let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let record = parser.parse("Address : House 4, Church Street,\nPanaji, Goa 403001", date);
    assert_eq!(record.region, "Goa");
    assert_eq!(record.postal_code, "403001");
}

#[test]
fn test_bad_vocabulary_pattern_fails_at_parser_build() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rollscan.json");
    fs::write(&config_path, r#"{"vocabulary": {"age_labels": ["AGE("]}}"#).unwrap();

    let config = RollscanConfig::from_file(&config_path).unwrap();
    let err = ListParser::new(&config.vocabulary).unwrap_err();
    assert!(matches!(err, RollscanError::Validation { .. }));
}

#[test]
fn test_out_of_range_values_load_but_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rollscan.toml");
    fs::write(&config_path, "[segmentation]\nthreshold_block_size = 10\n").unwrap();

    let config = RollscanConfig::from_file(&config_path).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("threshold_block_size"));
}

#[test]
fn test_unknown_format_falls_back_to_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rollscan.conf");
    fs::write(&config_path, "max_concurrent_cells = 5\n").unwrap();

    let config = RollscanConfig::from_file(&config_path).unwrap();
    assert_eq!(config.concurrency(), 5);
}

#[test]
fn test_discover_without_file_is_none() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("scans").join("2024");
    fs::create_dir_all(&nested).unwrap();

    // A rollscan.toml above the temp root would be found too, so only assert
    // that discovery from an empty tree does not error.
    assert!(RollscanConfig::discover_from(&nested).is_ok());
}
