//! Integration tests for the manifest processing pipeline.
//!
//! These tests drive the public API end to end against small manifests.

use calamine::{Reader, Xlsx, open_workbook};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use titanic_processing::{
    Chart, ChartRenderer, PipelineConfig, PipelineStage, ProcessingError, TablePipeline,
    TableStage, configured_exporters, export_all,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn sample_path() -> PathBuf {
    fixtures_path().join("titanic_sample.csv")
}

fn config_in(dir: &TempDir) -> PipelineConfig {
    PipelineConfig::builder()
        .output_dir(dir.path().join("data"))
        .visualizations_dir(dir.path().join("visualizations"))
        .build()
        .unwrap()
}

fn processed_pipeline(config: PipelineConfig) -> TablePipeline {
    let mut pipeline = TablePipeline::builder().config(config).build().unwrap();
    pipeline.load(sample_path()).unwrap();
    pipeline.impute_missing_values().unwrap();
    pipeline.engineer_features().unwrap();
    pipeline.encode_categorical_features().unwrap();
    pipeline
}

fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn i64_values(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

fn str_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn three_passengers() -> DataFrame {
    df![
        "PassengerId" => [1i64, 2, 3],
        "Survived" => [0i64, 1, 1],
        "Pclass" => [3i64, 1, 3],
        "Name" => [
            "Braund, Mr. Owen Harris",
            "Cumings, Mrs. John Bradley (Florence Briggs Thayer)",
            "Heikkinen, Miss. Laina",
        ],
        "Sex" => ["male", "female", "female"],
        "Age" => [Some(22.0), None, Some(40.0)],
        "SibSp" => [1i64, 1, 0],
        "Parch" => [0i64, 0, 0],
        "Fare" => [7.25, 71.2833, 7.925],
        "Cabin" => [None, Some("C85"), None],
        "Embarked" => [Some("S"), None, Some("C")],
    ]
    .unwrap()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_sample_manifest() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    let table = pipeline.load(sample_path()).unwrap();

    assert_eq!(table.shape(), (15, 12));
    assert_eq!(table.column("Age").unwrap().dtype(), &DataType::Float64);
    assert_eq!(table.column("Pclass").unwrap().dtype(), &DataType::Int64);
    assert_eq!(pipeline.stage(), Some(TableStage::Loaded));
    assert_eq!(pipeline.original().unwrap().shape(), (15, 12));
}

#[test]
fn test_load_missing_file() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    let err = pipeline.load(fixtures_path().join("no_such_file.csv")).unwrap_err();

    assert!(matches!(err, ProcessingError::Load(_)));
    assert_eq!(err.error_code(), "LOAD_ERROR");
    assert!(err.to_string().contains("no_such_file.csv"));
    assert!(pipeline.current().is_err());
}

#[test]
fn test_load_missing_required_columns() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    let err = pipeline.load(fixtures_path().join("missing_columns.csv")).unwrap_err();

    match err {
        ProcessingError::Load(message) => {
            assert!(message.contains("SibSp"), "unexpected message: {}", message);
            assert!(message.contains("Embarked"), "unexpected message: {}", message);
        }
        other => panic!("expected a load error, got {:?}", other),
    }
}

// ============================================================================
// Missing Value Analysis
// ============================================================================

#[test]
fn test_missing_value_report_on_sample() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    pipeline.load(sample_path()).unwrap();

    let report = pipeline.analyze_missing_values().unwrap();
    assert_eq!(report.total_rows, 15);
    assert_eq!(report.columns.len(), 12);
    assert_eq!(report.get("Age").unwrap().missing_count, 3);
    assert!((report.get("Age").unwrap().percentage - 20.0).abs() < 1e-9);
    assert_eq!(report.get("Embarked").unwrap().missing_count, 1);
    assert_eq!(report.get("Cabin").unwrap().missing_count, 9);
    assert_eq!(report.get("Fare").unwrap().missing_count, 0);

    let with_missing: Vec<&str> = report
        .columns_with_missing()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(with_missing, vec!["Age", "Cabin", "Embarked"]);
}

#[test]
fn test_analysis_does_not_change_table() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    pipeline.load(sample_path()).unwrap();
    let before = pipeline.current().unwrap().clone();

    pipeline.analyze_missing_values().unwrap();
    assert!(pipeline.current().unwrap().equals_missing(&before));
    assert_eq!(pipeline.stage(), Some(TableStage::Loaded));
}

// ============================================================================
// Processing Stages
// ============================================================================

#[test]
fn test_three_passenger_scenario() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    pipeline.load_dataframe(three_passengers()).unwrap();

    let imputation = pipeline.impute_missing_values().unwrap();
    assert_eq!(imputation.age_median, Some(31.0));
    assert_eq!(imputation.embarked_mode.as_deref(), Some("S"));

    let table = pipeline.current().unwrap();
    assert_eq!(f64_values(table, "Age"), vec![Some(22.0), Some(31.0), Some(40.0)]);
    assert_eq!(
        str_values(table, "Embarked"),
        vec![Some("S".to_string()), Some("S".to_string()), Some("C".to_string())]
    );
    assert_eq!(i64_values(table, "HasCabin"), vec![Some(0), Some(1), Some(0)]);
}

#[test]
fn test_imputation_on_sample() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    pipeline.load(sample_path()).unwrap();

    let summary = pipeline.impute_missing_values().unwrap();
    assert_eq!(summary.age_filled, 3);
    assert_eq!(summary.age_median, Some(31.0));
    assert_eq!(summary.embarked_filled, 1);
    assert_eq!(summary.embarked_mode.as_deref(), Some("S"));
    assert_eq!(summary.cabins_present, 6);

    let table = pipeline.current().unwrap();
    assert_eq!(table.column("Age").unwrap().null_count(), 0);
    assert_eq!(table.column("Embarked").unwrap().null_count(), 0);
    // Cabin is summarised, never filled
    assert_eq!(table.column("Cabin").unwrap().null_count(), 9);
    assert_eq!(pipeline.original().unwrap().column("Age").unwrap().null_count(), 3);
}

#[test]
fn test_processing_leaves_other_null_counts_alone() {
    let pipeline = processed_pipeline(PipelineConfig::default());
    let original = pipeline.original().unwrap();
    let table = pipeline.current().unwrap();

    for name in original.get_column_names() {
        let name = name.as_str();
        if name == "Age" || name == "Embarked" {
            continue;
        }
        assert_eq!(
            table.column(name).unwrap().null_count(),
            original.column(name).unwrap().null_count(),
            "null count of {} changed",
            name
        );
    }
}

#[test]
fn test_imputation_is_idempotent() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    pipeline.load(sample_path()).unwrap();
    pipeline.impute_missing_values().unwrap();
    let once = pipeline.current().unwrap().clone();

    let again = pipeline.impute_missing_values().unwrap();
    assert_eq!(again.age_filled, 0);
    assert_eq!(again.embarked_filled, 0);
    assert!(pipeline.current().unwrap().equals_missing(&once));
}

#[test]
fn test_imputation_fails_when_age_is_empty() {
    let mut df = three_passengers();
    df.replace("Age", Series::new("Age".into(), [None::<f64>, None, None]))
        .unwrap();

    let mut pipeline = TablePipeline::builder().build().unwrap();
    pipeline.load_dataframe(df).unwrap();

    let err = pipeline.impute_missing_values().unwrap_err();
    assert!(matches!(err, ProcessingError::Imputation { .. }));
    // the failed stage left the table as loaded
    assert_eq!(pipeline.stage(), Some(TableStage::Loaded));
    assert_eq!(pipeline.current().unwrap().column("Embarked").unwrap().null_count(), 1);
}

#[test]
fn test_feature_engineering_on_sample() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    pipeline.load(sample_path()).unwrap();
    pipeline.impute_missing_values().unwrap();
    pipeline.engineer_features().unwrap();

    let table = pipeline.current().unwrap();
    let titles = str_values(table, "Title");
    assert_eq!(titles[0].as_deref(), Some("Mr"));
    assert_eq!(titles[1].as_deref(), Some("Mrs"));
    assert_eq!(titles[7].as_deref(), Some("Master"));
    assert_eq!(titles[14].as_deref(), Some("Miss"));

    let family = i64_values(table, "FamilySize");
    let sibsp = i64_values(table, "SibSp");
    let parch = i64_values(table, "Parch");
    for i in 0..table.height() {
        assert_eq!(family[i], Some(sibsp[i].unwrap() + parch[i].unwrap() + 1));
    }

    let groups = str_values(table, "AgeGroup");
    assert_eq!(groups[0].as_deref(), Some("Young Adult")); // 22
    assert_eq!(groups[5].as_deref(), Some("Young Adult")); // imputed 31
    assert_eq!(groups[6].as_deref(), Some("Senior")); // 54
    assert_eq!(groups[7].as_deref(), Some("Child")); // 2
    assert_eq!(groups[9].as_deref(), Some("Teen")); // 14
    assert_eq!(groups[1].as_deref(), Some("Adult")); // 38
}

#[test]
fn test_encoding_on_sample() {
    let pipeline = processed_pipeline(PipelineConfig::default());
    let table = pipeline.current().unwrap();
    assert_eq!(pipeline.stage(), Some(TableStage::Encoded));

    assert_eq!(i64_values(table, "Sex_Encoded")[..3].to_vec(), vec![Some(1), Some(0), Some(0)]);
    // C=0, Q=1, S=2; the last passenger's port was imputed as S
    assert_eq!(i64_values(table, "Embarked_Encoded")[14], Some(2));
    assert_eq!(i64_values(table, "Embarked_Encoded")[5], Some(1));
    // Master=0, Miss=1, Mr=2, Mrs=3
    let titles = i64_values(table, "Title_Encoded");
    assert_eq!(titles[..3].to_vec(), vec![Some(2), Some(3), Some(1)]);
    assert_eq!(titles[7], Some(0));

    // source columns are kept next to their codes
    assert!(table.column("Sex").is_ok());
    assert!(table.column("Title").is_ok());
}

#[test]
fn test_encoding_with_custom_features() {
    let config = PipelineConfig::builder()
        .categorical_features(["Sex", "AgeGroup", "Deck"])
        .build()
        .unwrap();
    let mut pipeline = TablePipeline::builder().config(config).build().unwrap();
    pipeline.load(sample_path()).unwrap();
    pipeline.impute_missing_values().unwrap();
    pipeline.engineer_features().unwrap();

    let summary = pipeline.encode_categorical_features().unwrap();
    assert_eq!(summary.skipped, vec!["Deck".to_string()]);

    let age_groups = summary.get("AgeGroup").unwrap();
    assert_eq!(
        age_groups.classes,
        vec!["Adult", "Child", "Senior", "Teen", "Young Adult"]
    );
    assert!(pipeline.current().unwrap().column("Embarked_Encoded").is_err());
}

#[test]
fn test_encoding_independent_of_row_order() {
    let mut forward = three_passengers();
    forward
        .replace("Age", Series::new("Age".into(), [22.0, 38.0, 40.0]))
        .unwrap();
    forward
        .replace("Embarked", Series::new("Embarked".into(), ["S", "C", "Q"]))
        .unwrap();
    let reversed = forward.reverse();

    let encode = |df: DataFrame| {
        let mut pipeline = TablePipeline::builder().build().unwrap();
        pipeline.load_dataframe(df).unwrap();
        pipeline.impute_missing_values().unwrap();
        pipeline.engineer_features().unwrap();
        let summary = pipeline.encode_categorical_features().unwrap();
        (summary, pipeline.current().unwrap().clone())
    };
    let (forward_summary, forward_table) = encode(forward);
    let (reversed_summary, reversed_table) = encode(reversed);

    assert_eq!(forward_summary.encoded.len(), reversed_summary.encoded.len());
    for (a, b) in forward_summary.encoded.iter().zip(&reversed_summary.encoded) {
        assert_eq!(a.feature, b.feature);
        assert_eq!(a.classes, b.classes);

        let mut codes = i64_values(&reversed_table, &b.encoded_column);
        codes.reverse();
        assert_eq!(i64_values(&forward_table, &a.encoded_column), codes);
    }
}

// ============================================================================
// Stage Ordering
// ============================================================================

#[test]
fn test_operations_before_load() {
    let mut pipeline = TablePipeline::builder().build().unwrap();

    assert!(matches!(
        pipeline.analyze_missing_values(),
        Err(ProcessingError::UninitializedState(_))
    ));
    assert!(matches!(
        pipeline.impute_missing_values(),
        Err(ProcessingError::UninitializedState(_))
    ));
    assert!(matches!(
        pipeline.summary(),
        Err(ProcessingError::UninitializedState(_))
    ));
    assert!(pipeline.processing_steps().is_empty());
}

#[test]
fn test_feature_engineering_requires_imputation() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    pipeline.load(sample_path()).unwrap();

    match pipeline.engineer_features().unwrap_err() {
        ProcessingError::StageOrder {
            operation,
            required,
            current,
        } => {
            assert_eq!(operation, "engineer_features");
            assert_eq!(required, "impute_missing_values");
            assert_eq!(current, "loaded");
        }
        other => panic!("expected a stage order error, got {:?}", other),
    }
    assert!(pipeline.current().unwrap().column("Title").is_err());
}

#[test]
fn test_encoding_requires_feature_engineering() {
    let mut pipeline = TablePipeline::builder().build().unwrap();
    pipeline.load(sample_path()).unwrap();
    pipeline.impute_missing_values().unwrap();

    let err = pipeline.encode_categorical_features().unwrap_err();
    assert!(matches!(err, ProcessingError::StageOrder { .. }));
    assert_eq!(pipeline.stage(), Some(TableStage::Imputed));
}

#[test]
fn test_reload_resets_stage() {
    let mut pipeline = processed_pipeline(PipelineConfig::default());
    pipeline.load(sample_path()).unwrap();

    assert_eq!(pipeline.stage(), Some(TableStage::Loaded));
    assert_eq!(pipeline.current().unwrap().width(), 12);
    assert!(pipeline.processing_steps().is_empty());
}

// ============================================================================
// Summary
// ============================================================================

#[test]
fn test_processing_summary() {
    let pipeline = processed_pipeline(PipelineConfig::default());
    let summary = pipeline.summary().unwrap();

    assert_eq!(summary.stage, TableStage::Encoded);
    assert_eq!(summary.rows, 15);
    assert_eq!(summary.columns_before, 12);
    assert_eq!(summary.columns_after, 19);
    assert_eq!(
        summary.added_columns,
        vec![
            "HasCabin",
            "Title",
            "AgeGroup",
            "FamilySize",
            "Sex_Encoded",
            "Embarked_Encoded",
            "Title_Encoded",
        ]
    );
    assert_eq!(summary.missing_before, 13);
    assert_eq!(summary.missing_after, 9);
    assert_eq!(summary.missing_by_column.get("Age"), Some(&(3, 0)));
    assert_eq!(summary.missing_by_column.get("Cabin"), Some(&(9, 9)));
    assert!(summary.completeness_after > summary.completeness_before);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["stage"], "encoded");
}

#[test]
fn test_processing_steps_recorded() {
    let pipeline = processed_pipeline(PipelineConfig::default());
    let steps = pipeline.processing_steps();

    assert!(steps.iter().any(|s| s.contains("median")));
    assert!(steps.iter().any(|s| s.contains("mode")));
    assert!(steps.iter().any(|s| s.contains("FamilySize")));
    assert!(steps.iter().any(|s| s.contains("Title_Encoded")));
}

// ============================================================================
// Progress Reporting
// ============================================================================

#[test]
fn test_progress_stages_reported() {
    let stages: Arc<Mutex<Vec<PipelineStage>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&stages);

    let mut pipeline = TablePipeline::builder()
        .on_progress(move |update| seen.lock().unwrap().push(update.stage))
        .build()
        .unwrap();
    pipeline.load(sample_path()).unwrap();
    pipeline.analyze_missing_values().unwrap();
    pipeline.impute_missing_values().unwrap();
    pipeline.engineer_features().unwrap();
    pipeline.encode_categorical_features().unwrap();

    let stages = stages.lock().unwrap();
    for stage in [
        PipelineStage::Loading,
        PipelineStage::Analysis,
        PipelineStage::Imputation,
        PipelineStage::FeatureEngineering,
        PipelineStage::Encoding,
    ] {
        assert_eq!(
            stages.iter().filter(|s| **s == stage).count(),
            2,
            "expected a start and an end update for {:?}",
            stage
        );
    }
    assert!(!stages.contains(&PipelineStage::Failed));
}

#[test]
fn test_progress_reports_failure() {
    let stages: Arc<Mutex<Vec<PipelineStage>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&stages);

    let mut pipeline = TablePipeline::builder()
        .on_progress(move |update| seen.lock().unwrap().push(update.stage))
        .build()
        .unwrap();
    pipeline.load(sample_path()).unwrap();
    assert!(pipeline.engineer_features().is_err());

    assert_eq!(stages.lock().unwrap().last(), Some(&PipelineStage::Failed));
}

// ============================================================================
// Charts
// ============================================================================

#[test]
fn test_render_all_charts() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let pipeline = processed_pipeline(config.clone());

    let report = ChartRenderer::from_config(&config)
        .render_all(pipeline.current().unwrap(), &config.visualizations_dir);

    assert!(report.is_success(), "failures: {:?}", report.failures);
    assert_eq!(report.rendered.len(), Chart::ALL.len());
    for chart in Chart::ALL {
        let path = config.visualizations_dir.join(chart.file_name());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"), "{} is not an SVG", path.display());
    }
}

#[test]
fn test_chart_failure_does_not_stop_others() {
    let dir = TempDir::new().unwrap();
    let pipeline = processed_pipeline(config_in(&dir));
    let table = pipeline.current().unwrap().drop("Sex").unwrap();

    let report = ChartRenderer::default().render_all(&table, dir.path());

    assert_eq!(report.rendered.len(), 4);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].chart, Chart::GenderSurvivalRate);
    assert!(
        report.failures[0].causes.iter().any(|c| c.contains("Sex")),
        "causes: {:?}",
        report.failures[0].causes
    );
}

#[test]
fn test_unwritable_chart_directory_still_exports() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("visualizations");
    std::fs::write(&blocker, "not a directory").unwrap();
    let config = config_in(&dir);
    let pipeline = processed_pipeline(config.clone());
    let table = pipeline.current().unwrap();

    let report = ChartRenderer::from_config(&config).render_all(table, &config.visualizations_dir);
    assert!(report.rendered.is_empty());
    assert_eq!(report.failures.len(), Chart::ALL.len());
    assert!(report.failures.iter().all(|f| !f.causes.is_empty()));

    let outcomes = export_all(table, &configured_exporters(&config));
    assert!(outcomes.iter().all(|o| o.result.is_ok()));
    assert!(config.sqlite_path().is_file());
    assert!(config.excel_path().is_file());
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_sqlite_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let pipeline = processed_pipeline(config.clone());
    let table = pipeline.current().unwrap();

    let outcomes = export_all(table, &configured_exporters(&config));
    assert!(outcomes.iter().all(|o| o.result.is_ok()));

    let conn = Connection::open(config.sqlite_path()).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM titanic", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 15);

    let mut stmt = conn.prepare("PRAGMA table_info(titanic)").unwrap();
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let expected: Vec<String> = table
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(columns, expected);

    let median_filled: f64 = conn
        .query_row(
            "SELECT \"Age\" FROM titanic WHERE \"PassengerId\" = 6",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(median_filled, 31.0);
}

#[test]
fn test_sqlite_export_replaces_previous_run() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let pipeline = processed_pipeline(config.clone());
    let exporters = configured_exporters(&config);

    export_all(pipeline.current().unwrap(), &exporters);
    export_all(pipeline.current().unwrap(), &exporters);

    let conn = Connection::open(config.sqlite_path()).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM titanic", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 15);
}

#[test]
fn test_excel_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let pipeline = processed_pipeline(config.clone());
    let table = pipeline.current().unwrap();

    let outcomes = export_all(table, &configured_exporters(&config));
    assert!(outcomes.iter().all(|o| o.result.is_ok()));

    let mut workbook: Xlsx<_> = open_workbook(config.excel_path()).unwrap();
    let range = workbook.worksheet_range_at(0).unwrap().unwrap();

    assert_eq!(range.height(), 16);
    assert_eq!(range.width(), 19);

    let header: Vec<String> = range
        .rows()
        .next()
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    let expected: Vec<String> = table
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(header, expected);
}

#[test]
fn test_optional_csv_copy() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig::builder()
        .output_dir(dir.path())
        .csv_file("titanic_processed.csv")
        .build()
        .unwrap();
    let pipeline = processed_pipeline(config.clone());

    let exporters = configured_exporters(&config);
    assert_eq!(exporters.len(), 3);
    let outcomes = export_all(pipeline.current().unwrap(), &exporters);
    assert_eq!(
        outcomes.iter().map(|o| o.target).collect::<Vec<_>>(),
        vec!["sqlite", "xlsx", "csv"]
    );

    let reloaded = titanic_processing::load_csv(config.csv_path().unwrap()).unwrap();
    assert_eq!(reloaded.shape(), (15, 19));
}

#[test]
fn test_export_failure_does_not_stop_others() {
    let dir = TempDir::new().unwrap();
    // a file where the SQLite path's parent directory should be
    let blocker = dir.path().join("blocked");
    std::fs::write(&blocker, "not a directory").unwrap();

    let config = PipelineConfig::builder()
        .output_dir(&blocker)
        .build()
        .unwrap();
    let pipeline = processed_pipeline(config.clone());

    let mut exporters = configured_exporters(&config);
    exporters.push(Box::new(titanic_processing::CsvExporter::new(
        dir.path().join("copy.csv"),
    )));
    let outcomes = export_all(pipeline.current().unwrap(), &exporters);

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(
        outcomes[0].result,
        Err(ProcessingError::Export { .. })
    ));
    assert!(outcomes[1].result.is_err());
    assert!(outcomes[2].result.is_ok());
}
