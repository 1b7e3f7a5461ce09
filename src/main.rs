//! Ingress cache annotation tool.
//!
//! Builds the cache configuration the ingress controller would derive from a
//! resource's annotations.
//!
//! ```text
//! resource file (TOML/JSON)
//!     → PrefixedResolver
//!     → CacheParser (resolve-or-default, ensure cache dir)
//!     → CacheConfig
//!     → render: JSON on stdout
//!     → check:  validation problems
//!     → diff:   equality against a previous render
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ingress_cache::annotations::{load_resource, AnnotationParser, CacheConfig};
use ingress_cache::lifecycle::{build_cache_parser, load_or_default};
use ingress_cache::observability::init_logging;

#[derive(Parser)]
#[command(name = "ingress-cache")]
#[command(about = "Translate ingress cache annotations into cache configuration", long_about = None)]
struct Cli {
    /// Controller configuration file (TOML).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cache configuration for a resource as JSON
    Render {
        /// Resource description (TOML, or JSON with a .json extension)
        resource: PathBuf,

        /// Do not create the cache directory
        #[arg(long)]
        dry_run: bool,
    },
    /// Report values nginx would reject
    Check {
        resource: PathBuf,
    },
    /// Compare against a previously rendered configuration
    Diff {
        /// JSON produced by `render`
        previous: PathBuf,
        resource: PathBuf,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability)?;

    tracing::info!(
        prefix = %config.annotations.prefix,
        cache_root = %config.cache.root,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Render { resource, dry_run } => {
            let resource = load_resource(&resource)?;
            let cache = build_cache_parser(&config, dry_run).parse(&resource);
            println!("{}", serde_json::to_string_pretty(&cache)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { resource } => {
            let resource = load_resource(&resource)?;
            let cache = build_cache_parser(&config, true).parse(&resource);

            match cache.validate() {
                Ok(()) => {
                    println!("{}: ok", resource.key());
                    Ok(ExitCode::SUCCESS)
                }
                Err(issues) => {
                    for issue in &issues {
                        println!("{}: {}", resource.key(), issue);
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Diff { previous, resource } => {
            let previous: CacheConfig = serde_json::from_str(&fs::read_to_string(&previous)?)?;
            let resource = load_resource(&resource)?;
            let cache = build_cache_parser(&config, true).parse(&resource);

            if CacheConfig::equal(Some(&previous), Some(&cache)) {
                println!("unchanged");
                Ok(ExitCode::SUCCESS)
            } else {
                tracing::info!(resource = %resource.key(), "Cache configuration changed");
                println!("changed");
                Ok(ExitCode::from(2))
            }
        }
    }
}
