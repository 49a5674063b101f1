use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dbrepo::release::DatabaseFileType;
use dbrepo::{read_repository, JsonFileStore, ModelStore, ReadOptions};

#[derive(Parser)]
#[command(name = "dbrepo")]
#[command(author, version, about = "Read versioned PostgreSQL release repositories into a schema model")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a repository and store its model
    Read {
        /// Repository root (the folder containing postgres/release)
        #[arg(short, long, default_value = ".")]
        repo: PathBuf,

        /// Application name (defaults to the repository folder name)
        #[arg(short, long)]
        app: Option<String>,

        /// Directory of the JSON store files
        #[arg(short, long, default_value = ".")]
        store: PathBuf,
    },

    /// Print a stored model, one bucket of it, or one object
    Show {
        /// Application name
        #[arg(short, long)]
        app: String,

        /// Directory of the JSON store files
        #[arg(short, long, default_value = ".")]
        store: PathBuf,

        /// Only this bucket (table, function, local-tables, ...)
        #[arg(short, long)]
        kind: Option<String>,

        /// Only this object
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List the placeholders used by a stored model's scripts
    Parameters {
        /// Application name
        #[arg(short, long)]
        app: String,

        /// Directory of the JSON store files
        #[arg(short, long, default_value = ".")]
        store: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Read { repo, app, store } => {
            let options = ReadOptions {
                repo_path: repo,
                app_name: app,
                store_dir: store,
            };
            let scan = read_repository(&options)?;

            let properties = &scan.model.properties;
            println!("Application:  {}", options.app_name());
            println!("Database:     {}", properties.db_name);
            println!("Versions:     {}", scan.model.versions.join(", "));
            println!("Last version: {}", properties.last_version);
            println!("Objects:      {}", scan.model.object_count());
            for (kind, bucket) in &scan.model.buckets {
                if !bucket.is_empty() {
                    println!("  {:<30} {}", kind.as_str(), bucket.len());
                }
            }
            let unknown: usize = scan
                .version_files
                .iter()
                .map(|vf| vf.unknown_files().count())
                .sum();
            if unknown > 0 {
                println!("Unclassified files: {}", unknown);
            }
        }
        Commands::Show {
            app,
            store,
            kind,
            name,
        } => {
            let model = JsonFileStore::new(store).load_model(&app)?;

            let json = match (kind, name) {
                (Some(kind), name) => {
                    let kind: DatabaseFileType = kind.parse().map_err(anyhow::Error::msg)?;
                    let bucket = model
                        .bucket(kind)
                        .with_context(|| format!("No bucket for kind {}", kind))?;
                    match name {
                        Some(name) => {
                            let entry = bucket
                                .get(&name)
                                .with_context(|| format!("No {} named {}", kind, name))?;
                            serde_json::to_string_pretty(entry)?
                        }
                        None => serde_json::to_string_pretty(bucket)?,
                    }
                }
                (None, Some(name)) => match model.find(&name) {
                    Some((_, entry)) => serde_json::to_string_pretty(entry)?,
                    None => bail!("No object named {}", name),
                },
                (None, None) => serde_json::to_string_pretty(&model)?,
            };
            println!("{}", json);
        }
        Commands::Parameters { app, store } => {
            let model = JsonFileStore::new(store).load_model(&app)?;
            if model.parameters.is_empty() {
                println!("No parameters found");
            }
            for (parameter, files) in &model.parameters {
                println!("<{}>", parameter);
                for file in files {
                    println!("    {}", file);
                }
            }
        }
    }

    Ok(())
}
