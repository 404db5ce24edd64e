//! Integration tests for the reconciliation flow: capture file in, reference
//! file in, comparison result out.

use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

use concord::{
    CaptureExtractor, CompareStrategy, ConcordError, Discrepancy, ExtractorConfig, Provenance,
    ReconConfig, Reconciler, ReportTable, TableExtractor, ValidationResponse,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// A portal capture covering two breeds, 12-column layout.
fn create_capture_file() -> NamedTempFile {
    let content = "Case ID\tStudy Code\tStudy Type\tBreed\tDiagnosis\tStage of Disease\tAge\tSex\tNeutered Status\tWeight (kg)\tResponse to Treatment\tCohort\n\
                   C1\tStudyA\tType1\tBoxer\tLymphoma\tII\t7\tM\tYes\t30\tComplete\tA\n\
                   C2\tStudyA\tType1\tBoxer\tMelanoma\tIII\t9\tF\tNo\t28\tPartial\tA\n\
                   C3\tStudyB\tType2\tBeagle\tOsteosarcoma\tI\t4\tM\tYes\t12\tComplete\tB\n";
    create_test_file(content)
}

/// Reference TSV matching the capture's Boxer rows exactly.
fn create_matching_reference() -> NamedTempFile {
    let content = "Case ID\tStudy Code\tStudy Type\tBreed\tDiagnosis\tStage of Disease\tAge\tSex\tNeutered Status\tWeight (kg)\tResponse to Treatment\tCohort\n\
                   C1\tStudyA\tType1\tBoxer\tLymphoma\tII\t7\tM\tYes\t30\tComplete\tA\n\
                   C2\tStudyA\tType1\tBoxer\tMelanoma\tIII\t9\tF\tNo\t28\tPartial\tA\n";
    create_test_file(content)
}

/// An extractor whose rendering surface never produced the results table.
struct StalledExtractor {
    config: ExtractorConfig,
}

impl TableExtractor for StalledExtractor {
    fn name(&self) -> &str {
        "stalled"
    }

    fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    fn extract(&self, _filter_value: &str) -> concord::Result<Vec<Vec<String>>> {
        Err(ConcordError::Timeout {
            waiting_for: "results table".to_string(),
            secs: self.config.table_timeout.as_secs(),
        })
    }
}

// =============================================================================
// End-to-end validation
// =============================================================================

#[test]
fn test_matching_capture_and_reference_pass() {
    let capture = create_capture_file();
    let reference = create_matching_reference();

    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::new()
        .validate(&extractor, "Boxer", reference.path())
        .unwrap();

    assert!(result.is_pass());
    assert_eq!(result.filter(), "Boxer");
}

#[test]
fn test_extra_reference_row_fails_with_reference_only() {
    let capture = create_capture_file();
    let reference = create_test_file(
        "Case ID\tStudy Code\tStudy Type\tBreed\tDiagnosis\tStage of Disease\tAge\tSex\tNeutered Status\tWeight (kg)\tResponse to Treatment\tCohort\n\
         C1\tStudyA\tType1\tBoxer\tLymphoma\tII\t7\tM\tYes\t30\tComplete\tA\n\
         C2\tStudyA\tType1\tBoxer\tMelanoma\tIII\t9\tF\tNo\t28\tPartial\tA\n\
         C9\tStudyA\tType1\tBoxer\tMast Cell Tumor\tI\t5\tF\tYes\t25\tUnknown\tA\n",
    );

    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::new()
        .validate(&extractor, "Boxer", reference.path())
        .unwrap();

    assert!(!result.is_pass());
    let tags: Vec<Provenance> = result
        .discrepancies()
        .iter()
        .map(|d| d.provenance())
        .collect();
    assert_eq!(tags, vec![Provenance::ReferenceOnly]);
}

#[test]
fn test_reference_with_column_subset_compares_on_intersection() {
    let capture = create_capture_file();
    // Reference only carries three of the portal's twelve columns.
    let reference = create_test_file(
        "Breed\tDiagnosis\tStage of Disease\n\
         Boxer\tLymphoma\tII\n\
         Boxer\tMelanoma\tIII\n",
    );

    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::new()
        .validate(&extractor, "Boxer", reference.path())
        .unwrap();

    assert!(result.is_pass());
    assert_eq!(
        result.report().columns,
        vec!["breed", "diagnosis", "stage of disease"]
    );
}

#[test]
fn test_filter_reference_restricts_whole_portal_export() {
    let capture = create_capture_file();
    // Reference export covers every breed; only Boxer rows should count.
    let reference = create_test_file(
        "Breed\tDiagnosis\tStage of Disease\n\
         Boxer\tLymphoma\tII\n\
         Boxer\tMelanoma\tIII\n\
         Beagle\tOsteosarcoma\tI\n\
         Poodle\tHemangiosarcoma\tIV\n",
    );

    let config = ReconConfig::default().with_filter_reference(true);
    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::with_config(config)
        .validate(&extractor, "Boxer", reference.path())
        .unwrap();

    assert!(result.is_pass());
}

#[test]
fn test_sorted_strategy_end_to_end() {
    let capture = create_capture_file();
    // Same Boxer rows, one stage differs.
    let reference = create_test_file(
        "Breed\tDiagnosis\tStage of Disease\n\
         Boxer\tLymphoma\tIV\n\
         Boxer\tMelanoma\tIII\n",
    );

    let config = ReconConfig::default().with_strategy(CompareStrategy::SortedPositional);
    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::with_config(config)
        .validate(&extractor, "Boxer", reference.path())
        .unwrap();

    assert!(!result.is_pass());
    assert!(result.discrepancies().iter().any(|d| matches!(
        d,
        Discrepancy::ValueMismatch { column, ui, reference, .. }
            if column == "stage of disease" && ui == "II" && reference == "IV"
    )));
}

// =============================================================================
// Failure paths
// =============================================================================

#[test]
fn test_empty_reference_file_is_an_error_never_a_pass() {
    let capture = create_capture_file();
    let reference = create_test_file("");

    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::new().validate(&extractor, "Boxer", reference.path());

    assert!(matches!(result, Err(ConcordError::EmptyData(_))));
}

#[test]
fn test_missing_reference_file_is_io_error() {
    let capture = create_capture_file();
    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();

    let result = Reconciler::new().validate(&extractor, "Boxer", "/nonexistent/cases.tsv");
    assert!(matches!(result, Err(ConcordError::Io { .. })));
}

#[test]
fn test_extractor_timeout_surfaces_unchanged() {
    let reference = create_matching_reference();
    let extractor = StalledExtractor {
        config: ExtractorConfig::default(),
    };

    let result = Reconciler::new().validate(&extractor, "Boxer", reference.path());
    match result {
        Err(ConcordError::Timeout { waiting_for, secs }) => {
            assert_eq!(waiting_for, "results table");
            assert_eq!(secs, 10);
        }
        other => panic!("expected Timeout, got {:?}", other.map(|r| r.is_pass())),
    }
}

#[test]
fn test_unfiltered_breed_with_no_capture_rows_is_schema_mismatch() {
    // The capture has no Poodle rows, so the UI dataset is empty.
    let capture = create_capture_file();
    let reference = create_matching_reference();

    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::new().validate(&extractor, "Poodle", reference.path());
    assert!(matches!(result, Err(ConcordError::SchemaMismatch { .. })));
}

// =============================================================================
// Report artifact
// =============================================================================

#[test]
fn test_fail_report_written_and_reloaded() {
    let capture = create_capture_file();
    let reference = create_test_file(
        "Breed\tDiagnosis\tStage of Disease\n\
         Boxer\tLymphoma\tII\n",
    );

    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::new()
        .validate(&extractor, "Boxer", reference.path())
        .unwrap();
    assert!(!result.is_pass());

    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("comparison_report.csv");
    result.report().write_file(&report_path, b',').unwrap();

    let reloaded = ReportTable::load_file(&report_path, b',').unwrap();
    assert_eq!(&reloaded, result.report());
}

#[test]
fn test_pass_report_is_header_only() {
    let capture = create_capture_file();
    let reference = create_matching_reference();

    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::new()
        .validate(&extractor, "Boxer", reference.path())
        .unwrap();

    let dir = TempDir::new().unwrap();
    let report_path = dir.path().join("comparison_report.csv");
    result.report().write_file(&report_path, b',').unwrap();

    let text = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(text.lines().count(), 1);
    assert!(text.trim_end().ends_with(",source"));
}

// =============================================================================
// JSON shape
// =============================================================================

#[test]
fn test_pass_json_has_no_mismatches_key() {
    let capture = create_capture_file();
    let reference = create_matching_reference();

    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::new()
        .validate(&extractor, "Boxer", reference.path())
        .unwrap();

    let response = ValidationResponse::from_result(&result, None);
    let json = serde_json::to_value(&response).unwrap();

    assert!(json["result"].as_str().unwrap().starts_with("PASS"));
    assert!(json.get("mismatches").is_none());
    assert!(json.get("report").is_none());
}

#[test]
fn test_fail_json_carries_mismatches_and_report_path() {
    let capture = create_capture_file();
    let reference = create_test_file(
        "Breed\tDiagnosis\tStage of Disease\n\
         Boxer\tLymphoma\tII\n",
    );

    let extractor = CaptureExtractor::from_file(capture.path()).unwrap();
    let result = Reconciler::new()
        .validate(&extractor, "Boxer", reference.path())
        .unwrap();

    let response =
        ValidationResponse::from_result(&result, Some(std::path::Path::new("uploads/report.csv")));
    let json = serde_json::to_value(&response).unwrap();

    assert!(json["result"].as_str().unwrap().starts_with("FAIL"));
    assert_eq!(json["report"], "uploads/report.csv");
    // The capture's Melanoma row has no counterpart in the reference.
    let mismatches = json["mismatches"].as_array().unwrap();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0]["provenance"], "ui_only");
}
