//! LaTeX and GraphViz emitters over the schema graph.
//!
//! Every artifact renders into an in-memory string; callers decide where it
//! is written.

use crate::dimensions::{Dimension, DimensionJoin, DimensionRegistry};
use crate::schema::{Schema, Table};
use anyhow::Result;

mod compile;
mod graph;
mod latex;
mod printer;
mod text;

pub use compile::LinkRules;
pub use graph::DEFAULT_EDGE_COLORS;
use printer::Printer;

pub const DEFAULT_WRAP_WIDTH: usize = 70;

/// Shared rendering settings: link substitutions and wrap width.
pub struct Renderer<'a> {
    rules: &'a LinkRules,
    wrap_width: usize,
}

impl<'a> Renderer<'a> {
    pub fn new(rules: &'a LinkRules, wrap_width: usize) -> Self {
        Self { rules, wrap_width }
    }

    fn render<F>(&self, body: F) -> Result<String>
    where
        F: FnOnce(&mut Printer<'_>) -> Result<()>,
    {
        let mut out = String::new();
        let mut printer = Printer::new(&mut out, self.rules, self.wrap_width);
        body(&mut printer)?;
        Ok(out)
    }

    /// `tabular` environment listing a table's columns.
    pub fn table_columns(&self, table: &Table) -> Result<String> {
        self.render(|p| latex::write_table_columns(p, table))
    }

    /// Section describing one dimension, with its backing table if any.
    pub fn dimension(
        &self,
        dimension: &Dimension,
        registry: &DimensionRegistry,
        schema: &Schema,
        link_table: &str,
    ) -> Result<String> {
        self.render(|p| latex::write_dimension(p, dimension, registry, schema, link_table))
    }

    /// Section describing one join, with its backing table or view if any.
    pub fn join(
        &self,
        join: &DimensionJoin,
        registry: &DimensionRegistry,
        schema: &Schema,
    ) -> Result<String> {
        self.render(|p| latex::write_join(p, join, registry, schema))
    }

    /// Relationship digraph over every table in `schema`.
    pub fn schema_graph(&self, schema: &Schema, colors: &[String]) -> Result<String> {
        self.render(|p| graph::write_schema_graph(p, schema, colors))
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
