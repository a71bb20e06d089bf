//! Raw YAML schema tree as written by schema authors.
//!
//! These types mirror the file layout one-to-one; `Schema::build` turns them
//! into the validated graph used by the renderers.
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A string or a list of strings, as accepted by `src`/`tgt` entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value.clone()],
            OneOrMany::Many(values) => values.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyConfig {
    pub src: OneOrMany,
    pub tgt: OneOrMany,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyConfig>,
    /// View definition; a table with `sql` is a view unless materialized.
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub materialize: bool,
    /// Whether the table is part of the limited schema.
    #[serde(default = "default_limited")]
    pub limited: bool,
}

fn default_limited() -> bool {
    true
}

impl TableConfig {
    pub fn is_view(&self) -> bool {
        self.sql.is_some() && !self.materialize
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaSection {
    #[serde(default)]
    pub tables: IndexMap<String, TableConfig>,
}

/// Top-level schema document (`schema: { tables: ... }`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub schema: SchemaSection,
}

impl SchemaConfig {
    /// Load a schema document from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parse schema {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: SchemaConfig = serde_yaml::from_str(text).context("parse schema YAML")?;
        Ok(config)
    }

    pub fn tables(&self) -> &IndexMap<String, TableConfig> {
        &self.schema.tables
    }

    /// Copy of this config with every view turned into a plain table.
    pub fn materialize_all_views(&self) -> Self {
        let mut result = self.clone();
        for table in result.schema.tables.values_mut() {
            if table.sql.is_some() {
                table.materialize = true;
            }
        }
        result
    }

    /// Copy of this config restricted to `to_keep`.
    ///
    /// Foreign keys that point at a dropped table are removed as well.
    /// Malformed targets are kept so `Schema::build` still reports them.
    pub fn keep_only<S: AsRef<str>>(&self, to_keep: &[S]) -> Self {
        let keep = |name: &str| to_keep.iter().any(|k| k.as_ref() == name);
        let mut result = self.clone();
        result.schema.tables.retain(|name, _| keep(name));
        for table in result.schema.tables.values_mut() {
            table.foreign_keys.retain(|fk| {
                match fk.tgt.to_vec().first().and_then(|tgt| tgt.split_once('.')) {
                    Some((target, _)) => keep(target),
                    None => true,
                }
            });
        }
        result
    }
}
