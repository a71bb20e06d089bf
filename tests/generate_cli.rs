mod common;

use common::{assert_success, stderr, stdout, Project};
use std::fs;

#[test]
fn init_refuses_to_overwrite_without_force() {
    let project = Project::init();
    let output = project.run(&["init"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--force"), "{}", stderr(&output));

    let output = project.run(&["init", "--force"]);
    assert_success(&output);
    let text = fs::read_to_string(project.config_path()).expect("read config");
    assert!(text.contains("link_table: Dataset"), "{text}");
}

#[test]
fn validate_summarizes_schema_variants() {
    let project = Project::init();
    let output = project.run(&["validate"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("schema: 4 tables (1 views)\n"), "{out}");
    assert!(out.contains("limited: 3 tables\n"), "{out}");
    assert!(out.contains("dimensions-only: 3 tables\n"), "{out}");
    assert!(out.contains("dimensions: 2 (1 joins)\n"), "{out}");
    assert!(out.contains("dependency order: Instrument, Visit\n"), "{out}");
}

#[test]
fn validate_reports_dimension_cycles() {
    let project = Project::init();
    fs::write(
        project.root().join("dimensions.yaml"),
        "dimensions:\n  A:\n    requires: [B]\n  B:\n    requires: [A]\n",
    )
    .expect("rewrite dimensions");
    let output = project.run(&["validate"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("A -> B -> A"), "{}", stderr(&output));
}

#[test]
fn generate_json_lists_published_files() {
    let project = Project::init();
    let output = project.run(&["generate", "--json"]);
    assert_success(&output);
    let report: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("parse report");
    assert_eq!(report["schema_version"], 1);
    assert_eq!(report["tables"], 3);
    assert_eq!(report["dimensions"], 2);
    assert_eq!(report["joins"], 1);

    let files: Vec<&str> = report["files"]
        .as_array()
        .expect("files array")
        .iter()
        .filter_map(|value| value.as_str())
        .collect();
    assert_eq!(
        files,
        [
            "Dataset_columns.tex",
            "Instrument_columns.tex",
            "Instrument_unit.tex",
            "VisitCounts_join.tex",
            "Visit_columns.tex",
            "Visit_unit.tex",
            "relationships-dataUnitsOnly.dot",
            "relationships-limited.dot",
        ]
    );
    for file in files {
        assert!(project.output_dir().join(file).is_file(), "{file}");
    }

    let join = fs::read_to_string(project.output_dir().join("VisitCounts_join.tex"))
        .expect("read join");
    assert!(join.contains("\\textbf{View:} \\hyperref[tbl:VisitCounts]{VisitCounts}"));
}

#[test]
fn generate_honors_out_dir_override() {
    let project = Project::init();
    let out_dir = project.root().join("elsewhere");
    let out_arg = out_dir.display().to_string();
    let output = project.run(&["generate", "--out-dir", &out_arg]);
    assert_success(&output);
    assert!(out_dir.join("Visit_unit.tex").is_file());
    assert!(!project.output_dir().exists());
    assert!(stdout(&output).contains("Visit_unit.tex"));
}

#[test]
fn graph_prints_selected_variant() {
    let project = Project::init();
    let output = project.run(&["graph", "--variant", "full"]);
    assert_success(&output);
    let full = stdout(&output);
    assert!(full.starts_with("digraph"), "{full}");
    assert!(full.contains("VisitCounts"), "{full}");

    let output = project.run(&["graph"]);
    assert_success(&output);
    assert!(!stdout(&output).contains("VisitCounts"));
}

#[test]
fn columns_prints_one_table() {
    let project = Project::init();
    let output = project.run(&["columns", "--table", "Dataset"]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("  dataset\\_id & int & PRIMARY KEY &\n"), "{out}");

    let output = project.run(&["columns", "--table", "Missing"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown table Missing"));
}
