//! Shared test infrastructure for integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const SCHEMA: &str = r#"
schema:
  tables:
    Dataset:
      columns:
        - name: dataset_id
          type: int
          primaryKey: true
        - name: instrument
          type: string
          doc: "Instrument name."
        - name: visit
          type: int
          doc: "Visit number."
      foreignKeys:
        - src: [instrument, visit]
          tgt: [Visit.instrument, Visit.visit]
    Instrument:
      columns:
        - name: instrument
          type: string
          primaryKey: true
    Visit:
      columns:
        - name: instrument
          type: string
          primaryKey: true
        - name: visit
          type: int
          primaryKey: true
      foreignKeys:
        - src: instrument
          tgt: Instrument.instrument
    VisitCounts:
      sql: "SELECT visit, COUNT(*) FROM Dataset GROUP BY visit"
      limited: false
      columns:
        - name: visit
          type: int
"#;

pub const DIMENSIONS: &str = r#"
dimensions:
  Instrument:
    doc: "A camera."
    link: [instrument]
  Visit:
    doc: "An observation by an Instrument."
    requires: [Instrument]
    link: [visit]
joins:
  VisitCounts:
    doc: "Datasets per Visit."
    lhs: [Visit]
    rhs: [Instrument]
"#;

/// Temporary project holding a config stub and the two input documents.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("schema.yaml"), SCHEMA).expect("write schema");
        fs::write(dir.path().join("dimensions.yaml"), DIMENSIONS).expect("write dimensions");
        let project = Self { dir };
        let output = project.run(&["init"]);
        assert_success(&output);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("schemadoc.yaml")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("generated")
    }

    /// Run `schemadoc` with the project root as the working directory.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_schemadoc"))
            .args(args)
            .current_dir(self.root())
            .env_remove("RUST_LOG")
            .output()
            .expect("run schemadoc")
    }
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "schemadoc failed: {}\nstderr:\n{}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
