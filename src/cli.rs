use crate::config::GeneratorConfig;
use crate::docs::ui_html;
use crate::generator::generate_openapi_spec;
use crate::route_discovery::RouteRecord;
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// OpenAPI from DTOs - Generate OpenAPI documentation from DTO source files
#[derive(Parser, Debug)]
#[command(name = "openapi-from-dtos")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory of DTO source files, one resource per file
    #[arg(value_name = "DTOS_DIR")]
    pub dtos_dir: Option<PathBuf>,

    /// JSON or YAML list of live routes (`{method, path}` entries)
    #[arg(short = 'r', long = "routes", value_name = "FILE")]
    pub routes_path: Option<PathBuf>,

    /// Generator config file (JSON or YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Also write the HTML API reference page to this file
    #[arg(long = "ui", value_name = "FILE")]
    pub ui_path: Option<PathBuf>,

    /// API title
    #[arg(long)]
    pub title: Option<String>,

    /// API version
    #[arg(long = "api-version")]
    pub api_version: Option<String>,

    /// Server URL advertised in the document
    #[arg(long = "server-url")]
    pub server_url: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if let Some(dir) = &args.dtos_dir {
        if !dir.is_dir() {
            anyhow::bail!("DTOs path is not a directory: {}", dir.display());
        }
        info!("DTOs directory: {}", dir.display());
    }

    if let Some(routes) = &args.routes_path {
        if !routes.is_file() {
            anyhow::bail!("Routes file does not exist: {}", routes.display());
        }
    }

    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Builds the generator config: file values first, then CLI overrides.
pub fn build_config(args: &CliArgs) -> Result<GeneratorConfig> {
    let mut config = match &args.config_path {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(dir) = &args.dtos_dir {
        config.dtos_directory = Some(dir.clone());
    }
    if let Some(title) = &args.title {
        config.title = title.clone();
    }
    if let Some(version) = &args.api_version {
        config.version = version.clone();
    }
    if let Some(url) = &args.server_url {
        config.server_url = url.clone();
    }

    Ok(config)
}

/// Reads a route table, JSON for `.json` and YAML otherwise.
pub fn load_routes(path: &Path) -> Result<Vec<RouteRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read routes file: {}", path.display()))?;

    let routes = if path.extension().and_then(|s| s.to_str()) == Some("json") {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON routes file: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid YAML routes file: {}", path.display()))?
    };

    Ok(routes)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting OpenAPI document generation...");

    let config = build_config(&args)?;
    if config.dtos_directory.is_none() {
        log::warn!("No DTOs directory configured, only live routes will be documented");
    }

    let routes = match &args.routes_path {
        Some(path) => load_routes(path)?,
        None => Vec::new(),
    };
    info!("Loaded {} routes", routes.len());

    let document =
        generate_openapi_spec(&routes, &config).context("Failed to generate OpenAPI document")?;
    info!("OpenAPI document built successfully");

    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Json => serialize_json(&document)?,
        OutputFormat::Yaml => serialize_yaml(&document)?,
    };

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    if let Some(ui_path) = &args.ui_path {
        write_to_file(&ui_html(&config.title), ui_path)?;
        info!("Wrote API reference page to {}", ui_path.display());
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Schemas: {}", document.components.schemas.len());
    info!("  - Paths: {}", document.paths.len());
    info!("  - Routes given: {}", routes.len());

    Ok(())
}
