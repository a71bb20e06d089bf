use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod dimensions;
mod generate;
mod render;
mod schema;
mod staging;
mod util;

use cli::{
    ColumnsArgs, Command, GenerateArgs, GraphArgs, GraphVariant, InitArgs, RootArgs, ValidateArgs,
};
use generate::Inputs;
use render::Renderer;
use schema::Schema;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Init(args) => cmd_init(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Generate(args) => cmd_generate(args),
        Command::Graph(args) => cmd_graph(args),
        Command::Columns(args) => cmd_columns(args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_init(args: InitArgs) -> Result<()> {
    config::write_config_stub(&args.config, args.force)?;
    println!("Wrote {}", args.config.display());
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> Result<()> {
    let loaded = config::load_config(&args.config)?;
    let inputs = Inputs::load(&loaded)?;
    let variants = &inputs.variants;
    let link_table = &loaded.config.link_table;
    if !variants.default.contains(link_table) {
        return Err(anyhow!("link table {link_table} is not in the schema"));
    }

    println!(
        "schema: {} tables ({} views)",
        variants.default.len(),
        view_count(&variants.default)
    );
    println!("materialized: {} tables", variants.materialized.len());
    println!("limited: {} tables", variants.limited.len());
    println!("dimensions-only: {} tables", variants.dimensions_only.len());
    println!(
        "dimensions: {} ({} joins)",
        inputs.registry.len(),
        inputs.registry.joins().count()
    );
    println!(
        "dependency order: {}",
        inputs.registry.dependency_order().join(", ")
    );
    Ok(())
}

fn view_count(schema: &Schema) -> usize {
    schema
        .tables()
        .filter(|table| schema.is_view(&table.name))
        .count()
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let loaded = config::load_config(&args.config)?;
    let output_dir = args.out_dir.clone().unwrap_or_else(|| loaded.output_dir());
    let report = generate::generate(&loaded, &output_dir)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for file in &report.files {
            println!("{}", Path::new(&report.output_dir).join(file).display());
        }
    }
    Ok(())
}

fn cmd_graph(args: GraphArgs) -> Result<()> {
    let loaded = config::load_config(&args.config)?;
    let inputs = Inputs::load(&loaded)?;
    let variants = &inputs.variants;
    let schema = match args.variant {
        GraphVariant::Full => &variants.default,
        GraphVariant::Materialized => &variants.materialized,
        GraphVariant::Limited => &variants.limited,
        GraphVariant::DimensionsOnly => &variants.dimensions_only,
    };
    let renderer = Renderer::new(&inputs.rules, loaded.config.wrap_width);
    print!(
        "{}",
        renderer.schema_graph(schema, &loaded.config.edge_colors)?
    );
    Ok(())
}

fn cmd_columns(args: ColumnsArgs) -> Result<()> {
    let loaded = config::load_config(&args.config)?;
    let inputs = Inputs::load(&loaded)?;
    let table = inputs
        .variants
        .default
        .table(&args.table)
        .ok_or_else(|| anyhow!("unknown table {}", args.table))?;
    let renderer = Renderer::new(&inputs.rules, loaded.config.wrap_width);
    print!("{}", renderer.table_columns(table)?);
    Ok(())
}
