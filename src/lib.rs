//! OpenAPI from DTOs - OpenAPI 3.0 documents generated from DTO declarations.
//!
//! Each source file in a DTO directory describes one REST resource. Its
//! `...DTO` structs are parsed with `syn`, the canonical one becomes a schema
//! component, and the resource gets the standard collection and item
//! endpoints. Live routes that no resource covers are documented from their
//! method and path alone.
//!
//! Hosts that carry typed models instead of DTO files register plugins
//! exposing [`plugin::ApiResource`]s; those take precedence over the
//! directory scan.
//!
//! # Architecture
//!
//! 1. [`dto_scanner`] - Extracts DTO structs and their tagged fields from a source file
//! 2. [`resource_loader`] - Groups the DTOs of a directory into resources
//! 3. [`schema_builder`] - Turns field lists into object schemas
//! 4. [`model`] - Runtime model descriptors for plugin resources
//! 5. [`route_discovery`] - Generic operations for unclaimed routes
//! 6. [`generator`] - Assembles the complete [`document::OpenApiDocument`]
//! 7. [`docs`] - Responses for the reference page and JSON endpoints
//! 8. [`serializer`] - Serializes the document to YAML or JSON
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_dtos::{
//!     config::GeneratorConfig,
//!     generator::generate_openapi_spec,
//!     route_discovery::RouteRecord,
//!     serializer::serialize_yaml,
//! };
//!
//! let config = GeneratorConfig::default().with_dtos_directory("./dtos");
//! let routes = vec![RouteRecord::new("GET", "/health")];
//!
//! let document = generate_openapi_spec(&routes, &config).unwrap();
//! println!("{}", serialize_yaml(&document).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod docs;
pub mod document;
pub mod dto_scanner;
pub mod error;
pub mod generator;
pub mod model;
pub mod naming;
pub mod plugin;
pub mod resource_loader;
pub mod route_discovery;
pub mod schema_builder;
pub mod serializer;
pub mod tags;
pub mod type_mapping;
