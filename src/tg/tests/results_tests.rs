//! Tests for TG results block reconstruction

use super::{result_line, results_export_with, sample_results_export};
use crate::error::IngestError;
use crate::models::Scalar;
use crate::tg::parse_results;

#[test]
fn test_results_keys_are_renamed_by_position() {
    let results = parse_results(&sample_results_export()).unwrap();

    assert_eq!(
        results.keys().collect::<Vec<_>>(),
        vec![
            "Peak_DSC",
            "Mass_H2O",
            "Onset_1",
            "Mass_Change_2",
            "Onset_2",
            "Residual_Mass",
            "Peak_DTG"
        ]
    );
}

#[test]
fn test_bookkeeping_rows_are_dropped() {
    let results = parse_results(&sample_results_export()).unwrap();

    for key in results.keys() {
        let entry = results.get(key).unwrap();
        let labels: Vec<&str> = entry.values.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Result", "Y_value"], "rows of {}", key);
    }
}

#[test]
fn test_decimal_commas_are_converted() {
    let results = parse_results(&sample_results_export()).unwrap();

    assert_eq!(results.number("Mass_H2O", "Result").unwrap(), -2.34);
    assert_eq!(results.number("Mass_H2O", "Y_value").unwrap(), 97.66);
    assert_eq!(results.number("Residual_Mass", "Y_value").unwrap(), -4.90);
    assert_eq!(results.number("Peak_DSC", "Y_value").unwrap(), 0.25);
}

#[test]
fn test_non_numeric_cells_become_null() {
    let results = parse_results(&sample_results_export()).unwrap();
    let entry = results.get("Peak_DTG").unwrap();
    assert_eq!(entry.value("Result"), Some(&Scalar::Number(660.3)));
    assert_eq!(entry.value("Y_value"), Some(&Scalar::Null));
}

#[test]
fn test_key_count_matches_result_lines() {
    let lines: Vec<String> = (1..=9)
        .map(|i| result_line(&format!("Step_{}", i), &format!("{},5", i)))
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

    let results = parse_results(&results_export_with(&refs)).unwrap();
    assert_eq!(results.len(), 9);
    assert_eq!(results.number("Step_3", "Result").unwrap(), 3.5);
}

#[test]
fn test_too_few_result_lines_fails() {
    let lines = [result_line("A", "1,0"), result_line("B", "2,0"), result_line("C", "3,0")];
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

    let error = parse_results(&results_export_with(&refs)).unwrap_err();
    assert!(matches!(error, IngestError::Format { .. }));
}

#[test]
fn test_missing_bookkeeping_row_fails() {
    let content = "#A:;1\n\n##Result;File;Segment;Unit;Result;Y_value\n##X;1;1;mg;1,0;2,0\n#END\n";
    let error = parse_results(content).unwrap_err();
    match error {
        IngestError::Format { message, .. } => assert!(message.contains("Range_Xmin")),
        other => panic!("Expected Format error, got {:?}", other),
    }
}

#[test]
fn test_value_count_mismatch_fails() {
    let lines = [
        result_line("A", "1,0"),
        "##B;1;1;mg;30,0".to_string(),
        result_line("C", "3,0"),
        result_line("D", "4,0"),
    ];
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

    let error = parse_results(&results_export_with(&refs)).unwrap_err();
    assert!(error.is_format_error());
}

#[test]
fn test_duplicate_keys_fail() {
    let lines = [
        result_line("A", "1,0"),
        result_line("B", "2,0"),
        result_line("Peak_DSC", "3,0"),
        result_line("D", "4,0"),
        result_line("E", "5,0"),
    ];
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();

    let error = parse_results(&results_export_with(&refs)).unwrap_err();
    assert!(error.is_format_error());
}

#[test]
fn test_results_without_blank_line_fail() {
    let error = parse_results("##Result;File\n##A;1\n").unwrap_err();
    assert!(error.is_format_error());
}
