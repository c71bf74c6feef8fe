//! Command-line tool for generating OpenAPI documentation from DTO sources.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-dtos [OPTIONS] [DTOS_DIR]
//! ```
//!
//! # Examples
//!
//! Document every DTO resource under `./dtos` as JSON:
//! ```bash
//! openapi-from-dtos ./dtos -o openapi.json
//! ```
//!
//! Include live routes and write YAML plus the HTML reference page:
//! ```bash
//! openapi-from-dtos ./dtos -r routes.yaml -f yaml -o openapi.yaml --ui docs/index.html
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_dtos::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("OpenAPI from DTOs starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
