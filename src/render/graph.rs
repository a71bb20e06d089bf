use super::printer::Printer;
use crate::schema::{ForeignKey, Schema, Table};
use anyhow::{anyhow, Result};
use std::collections::BTreeSet;

/// Edge colors (X11 names) cycled across foreign keys.
pub const DEFAULT_EDGE_COLORS: &[&str] = &[
    "lawngreen",
    "indigo",
    "magenta1",
    "orangered",
    "lightskyblue3",
    "lightcoral",
    "mediumpurple",
    "forestgreen",
    "royalblue",
    "firebrick1",
    "yellow4",
    "navyblue",
];

pub(super) fn write_schema_graph(
    p: &mut Printer<'_>,
    schema: &Schema,
    colors: &[String],
) -> Result<()> {
    if colors.is_empty() {
        return Err(anyhow!("at least one edge color is required"));
    }
    p.direct("digraph relationships");
    p.block("{", "}", |p| {
        p.direct("node [shape=plaintext fontname=helvetica fontsize=10]");
        p.direct("edge [dir=both]");
        p.direct("rankdir=LR");
        p.direct("concentrate=false");
        let tables = schema.sorted_tables();
        for table in &tables {
            write_table_node(p, table, None)?;
        }
        let mut n = 0usize;
        for table in &tables {
            let mut foreign_keys: Vec<&ForeignKey> = table.foreign_keys.iter().collect();
            foreign_keys.sort_by_key(|fk| fk.target_description());
            for fk in foreign_keys {
                let remote = schema.table(&fk.target_table).ok_or_else(|| {
                    anyhow!("{} references missing table {}", table.name, fk.target_table)
                })?;
                write_foreign_key_edges(p, table, fk, remote, &colors[n % colors.len()]);
                n += 1;
            }
        }
        Ok(())
    })
}

/// Node for one table; `columns` restricts which columns get a port row.
pub(super) fn write_table_node(
    p: &mut Printer<'_>,
    table: &Table,
    columns: Option<&[String]>,
) -> Result<()> {
    p.direct(&table.name);
    p.block("[label=<", ">];", |p| {
        p.block(
            r#"<table border="0" cellborder="1" cellpadding="3" cellspacing="0">"#,
            "</table>",
            |p| {
                p.direct(&format!("<tr><td><b>{}</b></td></tr>", table.name));
                let mut skipped = Vec::new();
                for name in table.column_names() {
                    if let Some(columns) = columns {
                        if !columns.iter().any(|c| c == name) {
                            skipped.push(name);
                            continue;
                        }
                    }
                    p.direct(&format!(r#"<tr><td port="{name}">{name}</td></tr>"#));
                }
                match skipped.as_slice() {
                    [] => {}
                    [name] => p.direct(&format!("<tr><td>{name}</td></tr>")),
                    _ => p.direct("<tr><td>...</td></tr>"),
                }
                Ok(())
            },
        )
    })
}

/// `nonetee` when the key covers the whole primary key (one-to-one side),
/// otherwise `crowtee` (many side).
fn arrow(primary_key: &[&str], key_columns: &[String]) -> &'static str {
    let key: BTreeSet<&str> = key_columns.iter().map(String::as_str).collect();
    if primary_key.iter().all(|name| key.contains(name)) {
        "nonetee"
    } else {
        "crowtee"
    }
}

fn write_foreign_key_edges(
    p: &mut Printer<'_>,
    table: &Table,
    fk: &ForeignKey,
    remote: &Table,
    color: &str,
) {
    let arrow_local = arrow(&table.primary_key(), &fk.columns);
    let arrow_remote = arrow(&remote.primary_key(), &fk.target_columns);
    for (local, remote_column) in fk.column_pairs() {
        p.direct(&format!(
            "{}:{} -> {}:{} [arrowtail={} arrowhead={} color={}]",
            table.name, local, remote.name, remote_column, arrow_local, arrow_remote, color
        ));
    }
}
