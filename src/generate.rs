//! Regenerate every documentation artifact from one schema and dimension set.
//!
//! Four schema variants are derived from the same config. Column tables come
//! from the limited schema, dimension and join sections from the default
//! schema, and the two relationship graphs from the limited and
//! dimensions-only schemas.
use crate::config::LoadedConfig;
use crate::dimensions::{DimensionConfig, DimensionRegistry};
use crate::render::{LinkRules, Renderer};
use crate::schema::{Schema, SchemaConfig};
use crate::staging::StagedOutputs;
use crate::util::display_path;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

pub const REPORT_SCHEMA_VERSION: u32 = 1;
pub const LIMITED_GRAPH_REL: &str = "relationships-limited.dot";
pub const DIMENSIONS_GRAPH_REL: &str = "relationships-dataUnitsOnly.dot";

/// Schema variants every artifact is rendered from.
pub struct SchemaVariants {
    /// Views as declared.
    pub default: Schema,
    /// Every view materialized.
    pub materialized: Schema,
    /// Materialized, without tables excluded from the limited schema.
    pub limited: Schema,
    /// Materialized, keeping only the link table and dimension tables,
    /// including explicit `table:` backings.
    pub dimensions_only: Schema,
}

impl SchemaVariants {
    pub fn build(
        config: &SchemaConfig,
        registry: &DimensionRegistry,
        link_table: &str,
    ) -> Result<Self> {
        let default = Schema::build(config, false).context("build default schema")?;
        let materialized_config = config.materialize_all_views();
        let materialized =
            Schema::build(&materialized_config, false).context("build materialized schema")?;
        let limited = Schema::build(&materialized_config, true).context("build limited schema")?;

        let mut keep: Vec<&str> = vec![link_table];
        keep.extend(registry.names());
        keep.extend(
            registry
                .dimensions()
                .filter_map(|dimension| dimension.table.as_deref()),
        );
        let dimensions_only = Schema::build(&materialized_config.keep_only(&keep), false)
            .context("build dimensions-only schema")?;

        tracing::debug!(
            default = default.len(),
            materialized = materialized.len(),
            limited = limited.len(),
            dimensions_only = dimensions_only.len(),
            "built schema variants"
        );
        Ok(Self {
            default,
            materialized,
            limited,
            dimensions_only,
        })
    }
}

/// Everything loaded from a config: the raw schema, the registry, and the
/// derived variants.
pub struct Inputs {
    pub registry: DimensionRegistry,
    pub variants: SchemaVariants,
    pub rules: LinkRules,
}

impl Inputs {
    pub fn load(loaded: &LoadedConfig) -> Result<Self> {
        let schema_config = SchemaConfig::load(&loaded.schema_path())?;
        let dimension_config = DimensionConfig::load(&loaded.dimensions_path())?;
        let registry =
            DimensionRegistry::from_config(&dimension_config).context("resolve dimensions")?;
        let variants =
            SchemaVariants::build(&schema_config, &registry, &loaded.config.link_table)?;
        let rules = LinkRules::new(&variants.default, &registry)?;
        Ok(Self {
            registry,
            variants,
            rules,
        })
    }
}

/// Summary of a `generate` run.
#[derive(Debug, Serialize)]
pub struct GenerateReport {
    pub schema_version: u32,
    pub output_dir: String,
    pub tables: usize,
    pub dimensions: usize,
    pub joins: usize,
    pub files: Vec<String>,
}

/// Render every artifact and publish it into `output_dir`.
pub fn generate(loaded: &LoadedConfig, output_dir: &Path) -> Result<GenerateReport> {
    let inputs = Inputs::load(loaded)?;
    let config = &loaded.config;
    let renderer = Renderer::new(&inputs.rules, config.wrap_width);
    let variants = &inputs.variants;
    let staged = StagedOutputs::begin(output_dir)?;

    let mut tables = 0usize;
    for table in variants.limited.tables() {
        let text = renderer
            .table_columns(table)
            .with_context(|| format!("render columns for {}", table.name))?;
        staged.write_text(&format!("{}_columns.tex", table.name), &text)?;
        tables += 1;
    }

    let mut dimensions = 0usize;
    for dimension in inputs.registry.dimensions() {
        let text = renderer
            .dimension(
                dimension,
                &inputs.registry,
                &variants.default,
                &config.link_table,
            )
            .with_context(|| format!("render dimension {}", dimension.name))?;
        staged.write_text(&format!("{}_unit.tex", dimension.name), &text)?;
        dimensions += 1;
    }

    let mut joins = 0usize;
    for join in inputs.registry.joins() {
        let text = renderer
            .join(join, &inputs.registry, &variants.default)
            .with_context(|| format!("render join {}", join.name))?;
        staged.write_text(&format!("{}_join.tex", join.name), &text)?;
        joins += 1;
    }

    let limited_graph = renderer
        .schema_graph(&variants.limited, &config.edge_colors)
        .context("render limited relationship graph")?;
    staged.write_text(LIMITED_GRAPH_REL, &limited_graph)?;
    let dimensions_graph = renderer
        .schema_graph(&variants.dimensions_only, &config.edge_colors)
        .context("render dimensions-only relationship graph")?;
    staged.write_text(DIMENSIONS_GRAPH_REL, &dimensions_graph)?;

    let published = staged.publish()?;
    let files: Vec<String> = published
        .iter()
        .map(|path| display_path(path, Some(output_dir)))
        .collect();
    tracing::info!(
        output_dir = %output_dir.display(),
        files = files.len(),
        "regenerated schema docs"
    );

    Ok(GenerateReport {
        schema_version: REPORT_SCHEMA_VERSION,
        output_dir: output_dir.display().to_string(),
        tables,
        dimensions,
        joins,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_config, LoadedConfig};
    use std::fs;

    const SCHEMA: &str = r#"
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
      foreignKeys:
        - src: instrument
          tgt: Instrument.instrument
    Instrument:
      columns:
        - name: instrument
          type: string
          primaryKey: true
    Audit:
      limited: false
      columns:
        - name: dataset_id
          type: int
      foreignKeys:
        - src: dataset_id
          tgt: Dataset.dataset_id
"#;

    const DIMENSIONS: &str = r#"
dimensions:
  Instrument:
    doc: "A camera."
    link: [instrument]
joins:
  InstrumentAudit:
    lhs: [Instrument]
    rhs: [Instrument]
"#;

    fn write_inputs(root: &Path) -> LoadedConfig {
        fs::write(root.join("schema.yaml"), SCHEMA).expect("write schema");
        fs::write(root.join("dimensions.yaml"), DIMENSIONS).expect("write dimensions");
        LoadedConfig {
            config: default_config(),
            base_dir: root.to_path_buf(),
        }
    }

    #[test]
    fn writes_every_artifact() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let loaded = write_inputs(dir.path());
        let out = loaded.output_dir();
        let report = generate(&loaded, &out).expect("generate");

        assert_eq!(report.tables, 2, "Audit is not in the limited schema");
        assert_eq!(report.dimensions, 1);
        assert_eq!(report.joins, 1);
        assert_eq!(
            report.files,
            [
                "Dataset_columns.tex",
                "InstrumentAudit_join.tex",
                "Instrument_columns.tex",
                "Instrument_unit.tex",
                "relationships-dataUnitsOnly.dot",
                "relationships-limited.dot",
            ]
        );

        let unit = fs::read_to_string(out.join("Instrument_unit.tex")).expect("read unit");
        assert!(unit.contains("\\textbf{Primary Key:} instrument\n"));
        assert!(unit.contains("      Instrument name.\n"));
    }

    #[test]
    fn graphs_follow_their_schema_variant() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let loaded = write_inputs(dir.path());
        let out = loaded.output_dir();
        generate(&loaded, &out).expect("generate");

        let limited = fs::read_to_string(out.join(LIMITED_GRAPH_REL)).expect("read limited");
        assert!(limited.contains(
            "  Dataset:instrument -> Instrument:instrument [arrowtail=crowtee arrowhead=nonetee color=lawngreen]\n"
        ));
        assert!(!limited.contains("Audit"));

        let dimensions = fs::read_to_string(out.join(DIMENSIONS_GRAPH_REL)).expect("read dims");
        assert!(dimensions.contains("  Dataset\n"));
        assert!(dimensions.contains("  Instrument\n"));
        assert!(!dimensions.contains("Audit"));
    }

    #[test]
    fn failed_render_leaves_output_untouched() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let loaded = write_inputs(dir.path());
        fs::write(
            dir.path().join("dimensions.yaml"),
            "dimensions:\n  Instrument:\n    link: [missing]\n",
        )
        .expect("rewrite dimensions");
        let out = loaded.output_dir();
        let err = generate(&loaded, &out).expect_err("missing link column");
        assert!(format!("{err:#}").contains("Dataset.missing"), "{err:#}");
        let entries = fs::read_dir(&out).map(|entries| entries.count()).unwrap_or(0);
        assert_eq!(entries, 0);
    }

    #[test]
    fn variants_include_views_only_where_declared() {
        let config = SchemaConfig::from_yaml_str(
            "schema:\n  tables:\n    Dataset:\n      columns: []\n    V:\n      sql: SELECT 1\n      columns: []\n",
        )
        .expect("parse");
        let registry = DimensionRegistry::default();
        let variants = SchemaVariants::build(&config, &registry, "Dataset").expect("variants");
        assert!(variants.default.is_view("V"));
        assert!(!variants.materialized.is_view("V"));
        assert!(variants.limited.contains("V"));
        assert_eq!(variants.dimensions_only.len(), 1);
    }

    #[test]
    fn dimensions_only_keeps_explicit_backing_tables() {
        let config = SchemaConfig::from_yaml_str(
            "schema:\n  tables:\n    Dataset:\n      columns: []\n    visit_table:\n      columns: []\n    Other:\n      columns: []\n",
        )
        .expect("parse schema");
        let dimensions =
            DimensionConfig::from_yaml_str("dimensions:\n  Visit:\n    table: visit_table\n")
                .expect("parse dimensions");
        let registry = DimensionRegistry::from_config(&dimensions).expect("registry");
        let variants = SchemaVariants::build(&config, &registry, "Dataset").expect("variants");
        assert!(variants.dimensions_only.contains("visit_table"));
        assert!(!variants.dimensions_only.contains("Other"));
        assert_eq!(variants.dimensions_only.len(), 2);
    }
}
