use super::Dimension;
use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Dependency order plus the memoized effective link set for every dimension.
pub(super) struct Resolution {
    pub(super) order: Vec<String>,
    pub(super) primary_keys: HashMap<String, Vec<String>>,
}

/// Resolve every dimension after its required and optional dependencies.
///
/// The walk starts from each dimension in declaration order so the resulting
/// order is stable for a given input.
pub(super) fn resolve(dimensions: &IndexMap<String, Dimension>) -> Result<Resolution> {
    let mut walk = Walk {
        dimensions,
        marks: HashMap::new(),
        stack: Vec::new(),
        resolution: Resolution {
            order: Vec::with_capacity(dimensions.len()),
            primary_keys: HashMap::with_capacity(dimensions.len()),
        },
    };
    for name in dimensions.keys() {
        walk.visit(name)?;
    }
    Ok(walk.resolution)
}

struct Walk<'a> {
    dimensions: &'a IndexMap<String, Dimension>,
    marks: HashMap<&'a str, Mark>,
    stack: Vec<&'a str>,
    resolution: Resolution,
}

impl<'a> Walk<'a> {
    fn visit(&mut self, name: &'a str) -> Result<()> {
        match self.marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => return Err(self.cycle_error(name)),
            None => {}
        }
        let dimensions = self.dimensions;
        let dimension = dimensions
            .get(name)
            .ok_or_else(|| anyhow!("unknown dimension {name}"))?;

        self.marks.insert(name, Mark::Visiting);
        self.stack.push(name);
        for dep in dimension.requires.iter().chain(&dimension.optional) {
            self.visit(dep)?;
        }
        self.stack.pop();

        let mut primary_key: Vec<String> = Vec::new();
        for dep in &dimension.requires {
            if let Some(links) = self.resolution.primary_keys.get(dep.as_str()) {
                for link in links {
                    push_unique(&mut primary_key, link);
                }
            }
        }
        for link in &dimension.link {
            push_unique(&mut primary_key, link);
        }
        tracing::debug!(dimension = %name, primary_key = ?primary_key, "resolved");

        self.marks.insert(name, Mark::Done);
        self.resolution.order.push(name.to_string());
        self.resolution
            .primary_keys
            .insert(name.to_string(), primary_key);
        Ok(())
    }

    fn cycle_error(&self, name: &str) -> anyhow::Error {
        let start = self
            .stack
            .iter()
            .position(|entry| *entry == name)
            .unwrap_or(0);
        let mut path: Vec<&str> = self.stack[start..].to_vec();
        path.push(name);
        anyhow!("dimension dependency cycle: {}", path.join(" -> "))
    }
}

pub(super) fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}
