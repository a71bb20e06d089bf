use super::printer::Printer;
use crate::dimensions::{Dimension, DimensionJoin, DimensionRegistry};
use crate::schema::{Schema, Table};
use anyhow::{anyhow, Result};

pub(super) fn write_table_columns(p: &mut Printer<'_>, table: &Table) -> Result<()> {
    p.block(
        r"\begin{tabular}{| l | l | l | p{0.5\textwidth} |}",
        r"\end{tabular}",
        |p| {
            p.direct(r"\hline");
            p.direct(r"\textbf{Name} & \textbf{Type} & \textbf{Attributes} & \textbf{Description} \\");
            p.direct(r"\hline");
            for column in &table.columns {
                let line = format!(
                    "{} & {} & {} &",
                    p.escape(&column.name),
                    p.escape(column.column_type.as_str()),
                    column.attributes()
                );
                p.direct(&line);
                if let Some(doc) = column.doc.as_deref() {
                    let text = p.substitute(&p.escape(doc));
                    p.wrapped(&text, "  ");
                }
                p.direct(r"    \\");
                p.direct(r"\hline");
            }
            Ok(())
        },
    )
}

fn write_table_float(p: &mut Printer<'_>, table: &Table) -> Result<()> {
    p.block(r"\begin{table}[!htb]", r"\end{table}", |p| {
        p.block(r"{\footnotesize", "}", |p| write_table_columns(p, table))?;
        p.direct(&format!(r"\caption{{{} Columns}}", table.name));
        p.direct(&format!(r"\label{{tbl:{}}}", table.name));
        Ok(())
    })
}

fn write_heading(p: &mut Printer<'_>, name: &str, label_prefix: &str, doc: &str) {
    p.direct(&format!(r"\subsubsection{{{name}}}"));
    p.direct(&format!(r"\label{{{label_prefix}:{name}}}"));
    p.blank();
    let text = p.substitute(&p.escape(doc));
    p.wrapped(&text, "");
    p.blank();
}

/// `none`, a single inline name, or an itemized list.
fn write_name_list(p: &mut Printer<'_>, label: &str, names: &[String]) -> Result<()> {
    match names {
        [] => p.direct(&format!(r"\textbf{{{label}:}} none")),
        [name] => {
            let line = format!(r"\textbf{{{label}:}} {}", p.escape(name));
            p.direct(&line);
        }
        _ => {
            p.direct(&format!(r"\textbf{{{label}:}}"));
            p.block(r"\begin{itemize}", r"\end{itemize}", |p| {
                for name in names {
                    let line = format!(r"\item {}", p.escape(name));
                    p.direct(&line);
                }
                Ok(())
            })?;
        }
    }
    Ok(())
}

fn write_primary_key(p: &mut Printer<'_>, primary_key: &[String]) {
    if primary_key.is_empty() {
        p.direct(r"\textbf{Primary Key:} none");
        return;
    }
    let names = primary_key
        .iter()
        .map(|link| p.escape(link))
        .collect::<Vec<_>>()
        .join(", ");
    p.direct(&format!(r"\textbf{{Primary Key:}} {names}"));
}

fn backing_table<'s>(
    schema: &'s Schema,
    explicit: Option<&str>,
    name: &str,
    kind: &str,
) -> Result<Option<&'s Table>> {
    match explicit {
        Some(table) => schema
            .table(table)
            .map(Some)
            .ok_or_else(|| anyhow!("{kind} {name} names unknown table {table}")),
        None => Ok(schema.table(name)),
    }
}

pub(super) fn write_dimension(
    p: &mut Printer<'_>,
    dimension: &Dimension,
    registry: &DimensionRegistry,
    schema: &Schema,
    link_table: &str,
) -> Result<()> {
    write_heading(p, &dimension.name, "unit", &dimension.doc);

    write_name_list(p, "Dependencies", &dimension.requires)?;
    p.blank();
    if !dimension.optional.is_empty() {
        write_name_list(p, "Optional Dependencies", &dimension.optional)?;
        p.blank();
    }

    write_primary_key(p, registry.primary_key(&dimension.name).unwrap_or_default());
    p.blank();

    let table = backing_table(
        schema,
        dimension.table.as_deref(),
        &dimension.name,
        "dimension",
    )?;

    p.direct(r"\textbf{Value Fields:}");
    p.block(r"\begin{itemize}", r"\end{itemize}", |p| {
        for link in &dimension.link {
            let links = schema.table(link_table).ok_or_else(|| {
                anyhow!(
                    "dimension {} links through unknown table {link_table}",
                    dimension.name
                )
            })?;
            let column = links.column(link).ok_or_else(|| {
                anyhow!(
                    "dimension {} links unknown column {link_table}.{link}",
                    dimension.name
                )
            })?;
            let line = format!(
                r"\item \textbf{{{} ({}):}}",
                p.escape(link),
                p.escape(column.column_type.as_str())
            );
            p.direct(&line);
            let doc = column.doc.as_deref().or_else(|| {
                table
                    .and_then(|table| table.column(link))
                    .and_then(|column| column.doc.as_deref())
            });
            if let Some(doc) = doc {
                let text = p.escape(doc);
                p.wrapped(&text, "  ");
            }
        }
        Ok(())
    })?;
    p.blank();

    match table {
        Some(table) => {
            p.direct(&format!(
                r"\textbf{{Table:}} \hyperref[tbl:{0}]{{{0}}}",
                table.name
            ));
            write_table_float(p, table)
        }
        None => {
            p.direct(r"\textbf{Table:} none");
            Ok(())
        }
    }
}

pub(super) fn write_join(
    p: &mut Printer<'_>,
    join: &DimensionJoin,
    registry: &DimensionRegistry,
    schema: &Schema,
) -> Result<()> {
    write_heading(p, &join.name, "join", &join.doc);

    let relates = format!("{} with {}", join.lhs.join(", "), join.rhs.join(", "));
    let line = format!(r"\textbf{{Relates:}} {}", p.substitute(&p.escape(&relates)));
    p.direct(&line);
    p.blank();
    write_primary_key(p, &registry.join_primary_key(join));
    p.blank();

    let Some(table) = backing_table(schema, join.table.as_deref(), &join.name, "join")? else {
        return Ok(());
    };
    match table.sql.as_deref() {
        Some(sql) if schema.is_view(&table.name) => {
            p.direct(&format!(
                r"\textbf{{View:}} \hyperref[tbl:{0}]{{{0}}}, defined as:",
                table.name
            ));
            p.block(r"\begin{verbatim}", r"\end{verbatim}", |p| {
                for line in sql.trim_end().lines() {
                    p.direct(line);
                }
                Ok(())
            })?;
        }
        _ => {
            p.direct(&format!(
                r"\textbf{{Table:}} \hyperref[tbl:{0}]{{{0}}}",
                table.name
            ));
        }
    }
    write_table_float(p, table)
}
