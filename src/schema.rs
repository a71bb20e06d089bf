//! In-memory schema graph built from the YAML schema tree.
//!
//! The graph is validated once at build time so renderers can index tables
//! and columns without re-checking references.
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use std::collections::BTreeSet;

mod config;

use config::{ColumnConfig, ForeignKeyConfig, TableConfig};
pub use config::SchemaConfig;

/// Column types accepted in schema files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    String,
    Float,
    Datetime,
    Bool,
    Blob,
    Hash,
    Region,
}

impl ColumnType {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "string" => Some(Self::String),
            "float" => Some(Self::Float),
            "datetime" => Some(Self::Datetime),
            "bool" => Some(Self::Bool),
            "blob" => Some(Self::Blob),
            "hash" => Some(Self::Hash),
            "region" => Some(Self::Region),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::String => "string",
            Self::Float => "float",
            Self::Datetime => "datetime",
            Self::Bool => "bool",
            Self::Blob => "blob",
            Self::Hash => "hash",
            Self::Region => "region",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub doc: Option<String>,
}

impl Column {
    /// Attribute label used in column listings.
    pub fn attributes(&self) -> &'static str {
        if self.primary_key {
            "PRIMARY KEY"
        } else if !self.nullable {
            "NOT NULL"
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub target_table: String,
    pub target_columns: Vec<String>,
}

impl ForeignKey {
    /// `Table.column` list used as a stable sort key for edges.
    pub fn target_description(&self) -> String {
        self.target_columns
            .iter()
            .map(|column| format!("{}.{}", self.target_table, column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn column_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.target_columns.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
    /// View definition, kept after materialization.
    pub sql: Option<String>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.primary_key)
            .map(|column| column.name.as_str())
            .collect()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }
}

/// Validated schema: ordered tables plus the names of those that are views.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: IndexMap<String, Table>,
    views: BTreeSet<String>,
}

impl Schema {
    /// Build the schema graph from a raw config.
    ///
    /// With `limited` set, tables flagged `limited: false` and unmaterialized
    /// views are left out, along with any foreign keys that point at them.
    pub fn build(config: &SchemaConfig, limited: bool) -> Result<Self> {
        let included = |table: &TableConfig| !limited || (table.limited && !table.is_view());

        let mut schema = Schema::default();
        for (name, table_config) in config.tables() {
            if !included(table_config) {
                tracing::debug!(table = %name, "omitted from limited schema");
                continue;
            }
            let columns = build_columns(name, &table_config.columns)?;
            if table_config.is_view() {
                schema.views.insert(name.clone());
            }
            schema.tables.insert(
                name.clone(),
                Table {
                    name: name.clone(),
                    columns,
                    foreign_keys: Vec::new(),
                    sql: table_config.sql.clone(),
                },
            );
        }

        for (name, table_config) in config.tables() {
            if !schema.tables.contains_key(name) {
                continue;
            }
            let mut foreign_keys = Vec::new();
            for fk_config in &table_config.foreign_keys {
                let fk = build_foreign_key(name, fk_config, config)
                    .with_context(|| format!("foreign key on table {name}"))?;
                if !schema.tables.contains_key(&fk.target_table) {
                    tracing::debug!(
                        table = %name,
                        target = %fk.target_table,
                        "dropping foreign key to omitted table"
                    );
                    continue;
                }
                foreign_keys.push(fk);
            }
            if let Some(table) = schema.tables.get_mut(name) {
                table.foreign_keys = foreign_keys;
            }
        }
        Ok(schema)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn sorted_tables(&self) -> Vec<&Table> {
        let mut tables: Vec<&Table> = self.tables.values().collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        tables
    }

    pub fn is_view(&self, name: &str) -> bool {
        self.views.contains(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

fn build_columns(table: &str, configs: &[ColumnConfig]) -> Result<Vec<Column>> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::with_capacity(configs.len());
    for config in configs {
        if !seen.insert(config.name.as_str()) {
            return Err(anyhow!("duplicate column {table}.{}", config.name));
        }
        let column_type = ColumnType::parse(&config.column_type).ok_or_else(|| {
            anyhow!(
                "unknown type {:?} for column {table}.{}",
                config.column_type,
                config.name
            )
        })?;
        columns.push(Column {
            name: config.name.clone(),
            column_type,
            nullable: !config.primary_key && config.nullable.unwrap_or(true),
            primary_key: config.primary_key,
            doc: config.doc.clone(),
        });
    }
    Ok(columns)
}

fn build_foreign_key(
    table: &str,
    config: &ForeignKeyConfig,
    schema: &SchemaConfig,
) -> Result<ForeignKey> {
    let columns = config.src.to_vec();
    let targets = config.tgt.to_vec();
    if columns.is_empty() {
        return Err(anyhow!("src must name at least one column"));
    }
    if columns.len() != targets.len() {
        return Err(anyhow!(
            "src has {} columns but tgt has {}",
            columns.len(),
            targets.len()
        ));
    }

    let local = schema
        .tables()
        .get(table)
        .ok_or_else(|| anyhow!("unknown table {table}"))?;
    for column in &columns {
        if !local.columns.iter().any(|c| &c.name == column) {
            return Err(anyhow!("unknown local column {table}.{column}"));
        }
    }

    let mut target_table: Option<String> = None;
    let mut target_columns = Vec::with_capacity(targets.len());
    for target in &targets {
        let (target_name, target_column) = target
            .split_once('.')
            .ok_or_else(|| anyhow!("tgt {target:?} must be written as Table.column"))?;
        match &target_table {
            Some(existing) if existing != target_name => {
                return Err(anyhow!(
                    "tgt entries name both {existing} and {target_name}"
                ));
            }
            Some(_) => {}
            None => target_table = Some(target_name.to_string()),
        }
        let remote = schema
            .tables()
            .get(target_name)
            .ok_or_else(|| anyhow!("unknown target table {target_name}"))?;
        if !remote.columns.iter().any(|c| c.name == target_column) {
            return Err(anyhow!("unknown target column {target}"));
        }
        target_columns.push(target_column.to_string());
    }

    Ok(ForeignKey {
        columns,
        target_table: target_table.unwrap_or_default(),
        target_columns,
    })
}
