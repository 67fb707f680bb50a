mod config;
mod generate_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use quill_core::catalog::register_all_services;
use quill_core::llm::{DeepSeekClient, LlmConfig};
use quill_core::registry::ServiceRegistry;

use config::QuillConfig;

#[derive(Parser)]
#[command(name = "quill", about = "Streaming AI copywriting engine")]
struct Cli {
    /// API key (overrides QUILL_API_KEY env var and config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a quill config file
    Init {
        /// API key to store
        #[arg(long)]
        api_key: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// List available generation services
    Services {
        /// Only show services in this category
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check a batch file against the registry without generating
    Validate {
        /// Path to the batch JSON file
        file: PathBuf,
    },
    /// Run a batch file, printing events as JSON lines
    Generate {
        /// Path to the batch JSON file
        file: PathBuf,
        /// Run tasks in bounded-parallel windows instead of sequentially
        #[arg(long)]
        parallel: bool,
        /// Maximum tasks in flight when --parallel is set
        #[arg(long, default_value_t = 3)]
        max_concurrent: usize,
    },
    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

/// Execute the `quill init` command: write config file.
fn cmd_init(api_key: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        api: config::ApiSection {
            key: api_key.to_string(),
            base_url: None,
            model: None,
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!();
    println!("Next: run `quill services` to see what you can generate.");

    Ok(())
}

/// Build the full service registry from resolved (or placeholder) config.
///
/// Listing and validating services does not call the API, so a missing
/// key must not block those commands.
fn build_registry(cli_api_key: Option<&str>, require_key: bool) -> anyhow::Result<Arc<ServiceRegistry>> {
    let llm_config = match QuillConfig::resolve(cli_api_key) {
        Ok(resolved) => resolved.llm,
        Err(err) if !require_key => {
            tracing::debug!(error = %err, "no API key resolved; using placeholder");
            LlmConfig::new("unconfigured")
        }
        Err(err) => return Err(err),
    };
    let client = Arc::new(DeepSeekClient::new(llm_config)?);
    Ok(Arc::new(register_all_services(&client)))
}

fn cmd_services(registry: &ServiceRegistry, category: Option<&str>, json: bool) -> anyhow::Result<()> {
    let services = match category {
        Some(category) => {
            let in_category = registry.by_category(category);
            if in_category.is_empty() {
                anyhow::bail!("no services in category {category:?}");
            }
            in_category
        }
        None => registry.all(),
    };

    if json {
        let entries: Vec<serde_json::Value> = services
            .iter()
            .map(|d| {
                serde_json::json!({
                    "title": d.title,
                    "category": d.category,
                    "description": d.description,
                    "params": d.params,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut current_category: Option<&str> = None;
    for descriptor in &services {
        let category = descriptor.category.as_deref().unwrap_or("(uncategorized)");
        if current_category != Some(category) {
            println!("{category}");
            current_category = Some(category);
        }
        match &descriptor.description {
            Some(description) => println!("  {} - {description}", descriptor.title),
            None => println!("  {}", descriptor.title),
        }
    }
    println!();
    println!("{} services total", services.len());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { api_key, force } => {
            cmd_init(&api_key, force)?;
        }
        Commands::Services { category, json } => {
            let registry = build_registry(cli.api_key.as_deref(), false)?;
            cmd_services(&registry, category.as_deref(), json)?;
        }
        Commands::Validate { file } => {
            let registry = build_registry(cli.api_key.as_deref(), false)?;
            generate_cmd::run_validate(registry, &file)?;
        }
        Commands::Generate {
            file,
            parallel,
            max_concurrent,
        } => {
            let registry = build_registry(cli.api_key.as_deref(), true)?;
            generate_cmd::run_generate(registry, &file, parallel, max_concurrent).await?;
        }
        Commands::Serve { bind, port } => {
            let registry = build_registry(cli.api_key.as_deref(), true)?;
            serve_cmd::run_serve(registry, &bind, port).await?;
        }
    }

    Ok(())
}
