//! Dimension and join registry.
//!
//! Dimensions are the named groupings that datasets are identified by. Each
//! one declares its own link columns and the dimensions it depends on; the
//! registry resolves the effective link set (primary key) of every dimension
//! once, in dependency order.
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

mod resolve;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DimensionEntry {
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
    #[serde(default)]
    pub link: Vec<String>,
    #[serde(default)]
    pub table: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JoinEntry {
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub lhs: Vec<String>,
    #[serde(default)]
    pub rhs: Vec<String>,
    #[serde(default)]
    pub table: Option<String>,
}

/// Raw `dimensions:`/`joins:` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DimensionConfig {
    #[serde(default)]
    pub dimensions: IndexMap<String, DimensionEntry>,
    #[serde(default)]
    pub joins: IndexMap<String, JoinEntry>,
}

impl DimensionConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read dimensions {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parse dimensions {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: DimensionConfig =
            serde_yaml::from_str(text).context("parse dimensions YAML")?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub name: String,
    pub doc: String,
    pub requires: Vec<String>,
    pub optional: Vec<String>,
    pub link: Vec<String>,
    /// Explicit backing table; `None` means "the table of the same name, if any".
    pub table: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionJoin {
    pub name: String,
    pub doc: String,
    pub lhs: Vec<String>,
    pub rhs: Vec<String>,
    pub table: Option<String>,
}

/// Validated dimensions and joins with resolved primary keys.
#[derive(Debug, Clone, Default)]
pub struct DimensionRegistry {
    dimensions: IndexMap<String, Dimension>,
    joins: IndexMap<String, DimensionJoin>,
    order: Vec<String>,
    primary_keys: HashMap<String, Vec<String>>,
}

impl DimensionRegistry {
    pub fn from_config(config: &DimensionConfig) -> Result<Self> {
        let dimensions: IndexMap<String, Dimension> = config
            .dimensions
            .iter()
            .map(|(name, entry)| {
                (
                    name.clone(),
                    Dimension {
                        name: name.clone(),
                        doc: entry.doc.clone(),
                        requires: entry.requires.clone(),
                        optional: entry.optional.clone(),
                        link: entry.link.clone(),
                        table: entry.table.clone(),
                    },
                )
            })
            .collect();

        for dimension in dimensions.values() {
            for dep in dimension.requires.iter().chain(&dimension.optional) {
                if !dimensions.contains_key(dep) {
                    return Err(anyhow!(
                        "dimension {} depends on unknown dimension {dep}",
                        dimension.name
                    ));
                }
            }
        }

        let mut joins = IndexMap::with_capacity(config.joins.len());
        for (name, entry) in &config.joins {
            if dimensions.contains_key(name) {
                return Err(anyhow!("join {name} has the same name as a dimension"));
            }
            for side in entry.lhs.iter().chain(&entry.rhs) {
                if !dimensions.contains_key(side) {
                    return Err(anyhow!("join {name} relates unknown dimension {side}"));
                }
            }
            joins.insert(
                name.clone(),
                DimensionJoin {
                    name: name.clone(),
                    doc: entry.doc.clone(),
                    lhs: entry.lhs.clone(),
                    rhs: entry.rhs.clone(),
                    table: entry.table.clone(),
                },
            );
        }

        let resolution = resolve::resolve(&dimensions)?;
        Ok(Self {
            dimensions,
            joins,
            order: resolution.order,
            primary_keys: resolution.primary_keys,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dimensions.contains_key(name)
    }

    /// Dimensions in declaration order.
    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.keys().map(String::as_str)
    }

    pub fn joins(&self) -> impl Iterator<Item = &DimensionJoin> {
        self.joins.values()
    }

    /// Dimension names ordered so every dimension follows its dependencies.
    pub fn dependency_order(&self) -> &[String] {
        &self.order
    }

    /// Own links unioned with the links of all required dependencies.
    pub fn primary_key(&self, name: &str) -> Option<&[String]> {
        self.primary_keys.get(name).map(Vec::as_slice)
    }

    pub fn join_primary_key(&self, join: &DimensionJoin) -> Vec<String> {
        let mut primary_key = Vec::new();
        for name in join.lhs.iter().chain(&join.rhs) {
            for link in self.primary_key(name).unwrap_or_default() {
                resolve::push_unique(&mut primary_key, link);
            }
        }
        primary_key
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }
}

#[cfg(test)]
#[path = "dimensions_tests.rs"]
mod tests;
