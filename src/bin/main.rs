//! Trellis CLI - explore foreign-key topology and resolve join paths
//!
//! Usage:
//!   trellis tables --db <file.db>
//!   trellis path <left> <right> --db <file.db>
//!   trellis connect <table>... --db <file.db>
//!
//! Examples:
//!   trellis path orders products --db shop.db
//!   trellis connect customers products --db shop.db --output json
//!   trellis tables --schema shop --config ./trellis.toml

use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use trellis::config::Settings;
use trellis::graph::JoinStep;
use trellis::metadata::SqliteSchemaProvider;
use trellis::navigator::Navigator;
use trellis::render::render_join_plan;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Trellis - join-path resolution over relational schemas")]
#[command(version)]
struct Cli {
    /// SQLite database file to introspect directly
    #[arg(long, global = true, conflicts_with = "schema")]
    db: Option<PathBuf>,

    /// Named schema from the config file
    #[arg(long, global = true)]
    schema: Option<String>,

    /// Config file path (defaults to ~/.trellis/trellis.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the schemas configured in the config file
    Schemas,

    /// List the tables of the schema
    Tables,

    /// Resolve the shortest join path between two tables
    Path {
        /// Starting table
        left: String,
        /// Target table
        right: String,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// Resolve a minimal join network connecting all given tables
    Connect {
        /// Tables to connect (at least two)
        #[arg(required = true, num_args = 2..)]
        tables: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// FROM/JOIN clauses
    Sql,
    /// Join steps as JSON
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if matches!(cli.command, Commands::Schemas) {
        let settings = load_settings(&cli)?;
        let mut names: Vec<&String> = settings.schemas.keys().collect();
        names.sort();
        for name in names {
            match &settings.schemas[name].description {
                Some(description) => println!("{name}\t{description}"),
                None => println!("{name}"),
            }
        }
        return Ok(());
    }

    let (navigator, schema) = resolve_target(&cli)?;

    match cli.command {
        Commands::Schemas => unreachable!("handled above"),
        Commands::Tables => {
            for table in navigator.tables(&schema).await? {
                println!("{table}");
            }
        }
        Commands::Path {
            left,
            right,
            output,
        } => {
            let steps = navigator.shortest_join_path(&schema, &left, &right).await?;
            print_steps(&steps, output)?;
        }
        Commands::Connect { tables, output } => {
            let names: Vec<&str> = tables.iter().map(String::as_str).collect();
            let steps = navigator.connect_tables(&schema, &names).await?;
            print_steps(&steps, output)?;
        }
    }
    Ok(())
}

/// Build the navigator and pick the schema identity to operate on:
/// either a direct SQLite file (registered under "main", SQLite's own name
/// for its default schema) or a named schema from the config file.
fn resolve_target(cli: &Cli) -> Result<(Navigator, String), Box<dyn Error>> {
    if let Some(db) = &cli.db {
        let navigator = Navigator::new();
        navigator.register("main", Arc::new(SqliteSchemaProvider::open(db)?));
        return Ok((navigator, "main".to_string()));
    }

    let Some(schema) = &cli.schema else {
        return Err("pass --db <file> or --schema <name> (with a config file)".into());
    };

    let settings = load_settings(cli)?;
    settings.schema(schema)?;

    Ok((settings.build_navigator()?, schema.clone()))
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn Error>> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Settings::default_path()?,
    };
    Ok(Settings::load(&config_path)?)
}

fn print_steps(steps: &[JoinStep], output: OutputFormat) -> Result<(), Box<dyn Error>> {
    match output {
        OutputFormat::Sql => match render_join_plan(steps) {
            Some(sql) => println!("{sql}"),
            None => println!("-- same table; nothing to join"),
        },
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(steps)?),
    }
    Ok(())
}
