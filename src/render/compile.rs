use crate::dimensions::DimensionRegistry;
use crate::schema::Schema;
use anyhow::{Context, Result};
use regex::Regex;

/// Ordered regex substitutions that turn known names into cross references.
#[derive(Debug, Clone, Default)]
pub struct LinkRules {
    rules: Vec<LinkRule>,
}

#[derive(Debug, Clone)]
struct LinkRule {
    regex: Regex,
    replacement: String,
}

impl LinkRules {
    /// Dimension names link to their section, other table names link to
    /// their column table, and `"word"` becomes LaTeX-style quotes.
    pub fn new(schema: &Schema, registry: &DimensionRegistry) -> Result<Self> {
        let mut units: Vec<&str> = registry.names().collect();
        units.sort_unstable();
        let mut tables: Vec<&str> = schema
            .table_names()
            .filter(|name| !registry.contains(name))
            .collect();
        tables.sort_unstable();

        let mut rules = Vec::with_capacity(3);
        if let Some(rule) = word_rule(&units, r"\unitref{${1}}")? {
            rules.push(rule);
        }
        if let Some(rule) = word_rule(&tables, r"\tblref{${1}}")? {
            rules.push(rule);
        }
        rules.push(LinkRule {
            regex: Regex::new(r#""(\w+)""#).context("compile quote rule")?,
            replacement: "``${1}''".to_string(),
        });
        Ok(Self { rules })
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for rule in &self.rules {
            out = rule
                .regex
                .replace_all(&out, rule.replacement.as_str())
                .into_owned();
        }
        out
    }
}

fn word_rule(names: &[&str], replacement: &str) -> Result<Option<LinkRule>> {
    if names.is_empty() {
        return Ok(None);
    }
    let alternatives = names
        .iter()
        .map(|name| regex::escape(name))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"\b({alternatives})\b");
    let regex = Regex::new(&pattern).with_context(|| format!("compile link rule {pattern}"))?;
    Ok(Some(LinkRule {
        regex,
        replacement: replacement.to_string(),
    }))
}
