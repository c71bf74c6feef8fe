//! Assembles the complete OpenAPI document.
//!
//! Resources come from plugins when any plugin provides them, otherwise from
//! the configured DTO directory. Every live route no resource claims is then
//! documented generically.

use crate::config::GeneratorConfig;
use crate::document::{
    Components, Info, OpenApiDocument, Operation, Parameter, PathItem, Properties, RequestBody,
    Response, Schema, SecurityRequirement, SecurityScheme, Server, OPENAPI_VERSION,
};
use crate::error::Result;
use crate::model::build_schema_from_model;
use crate::naming::schema_name;
use crate::plugin::{load_resources_from_plugins, ApiResource};
use crate::resource_loader::{load_resource_dtos, ResourceDtos};
use crate::route_discovery::{discover_non_resource_routes, RouteRecord};
use crate::schema_builder::build_object_schema;
use crate::type_mapping::SchemaType;
use log::{debug, info, warn};
use serde_json::json;
use std::collections::{BTreeMap, HashSet};

/// Name of the global security scheme
pub const BEARER_SCHEME: &str = "bearerAuth";

/// Schemas and paths contributed by the resources
#[derive(Debug, Default)]
struct ResourceSection {
    schemas: BTreeMap<String, Schema>,
    paths: BTreeMap<String, PathItem>,
    /// Resource paths in route form, excluded from discovery
    claimed: HashSet<String>,
}

impl ResourceSection {
    fn claim(&mut self, base: &str, collection: PathItem, item: PathItem) {
        self.claimed.insert(base.to_string());
        self.claimed.insert(format!("{base}/:id"));
        self.paths.insert(base.to_string(), collection);
        self.paths.insert(format!("{base}/{{id}}"), item);
    }
}

/// Generates the document for the given live routes.
///
/// # Errors
///
/// Fails only when a DTO directory is configured but missing or unreadable.
pub fn generate_openapi_spec(routes: &[RouteRecord], cfg: &GeneratorConfig) -> Result<OpenApiDocument> {
    let plugin_resources = load_resources_from_plugins(cfg.plugin_registry.as_ref());

    let mut section = if !plugin_resources.is_empty() {
        info!("Documenting {} plugin resources", plugin_resources.len());
        plugin_section(&plugin_resources, cfg)
    } else if let Some(dir) = &cfg.dtos_directory {
        let resources = load_resource_dtos(dir)?;
        info!("Documenting {} DTO resources", resources.len());
        dto_section(&resources, cfg)
    } else {
        debug!("No resource source configured");
        ResourceSection::default()
    };

    let discovered = discover_non_resource_routes(routes, &section.claimed);
    debug!("Discovered {} non-resource paths", discovered.len());
    for (path, item) in discovered {
        section.paths.entry(path).or_default().merge_missing(item);
    }

    Ok(OpenApiDocument {
        openapi: OPENAPI_VERSION.to_string(),
        info: Info {
            title: cfg.title.clone(),
            version: cfg.version.clone(),
            description: cfg.description.clone(),
        },
        servers: vec![Server {
            url: cfg.server_url.clone(),
            description: "Development server".to_string(),
        }],
        paths: section.paths,
        components: Components {
            schemas: section.schemas,
            security_schemes: BTreeMap::from([(BEARER_SCHEME.to_string(), bearer_scheme())]),
        },
        security: vec![SecurityRequirement::from([(BEARER_SCHEME.to_string(), Vec::new())])],
    })
}

fn dto_section(resources: &BTreeMap<String, ResourceDtos>, cfg: &GeneratorConfig) -> ResourceSection {
    let mut section = ResourceSection::default();

    for resource in resources.values() {
        let main_dto = match resource.main_dto() {
            Ok(dto) => dto,
            Err(e) => {
                warn!("Skipping resource: {}", e);
                continue;
            }
        };

        let name = schema_name(&resource.name);
        debug!("Resource {} uses {} as schema {}", resource.name, main_dto.name, name);
        section
            .schemas
            .insert(name.clone(), build_object_schema(&main_dto.fields));

        let base = format!("/{}", resource.plural_name);
        section.claim(
            &base,
            build_collection_endpoints(resource, &name, cfg),
            build_item_endpoints(resource, &name),
        );
    }

    section
}

fn plugin_section(resources: &[ApiResource], cfg: &GeneratorConfig) -> ResourceSection {
    let mut section = ResourceSection::default();

    for resource in resources {
        let name = schema_name(&resource.name);

        if let Some(model) = &resource.response_model {
            section
                .schemas
                .insert(name.clone(), build_schema_from_model(Some(model.as_ref())));
        }
        if let Some(model) = &resource.create_model {
            section
                .schemas
                .insert(create_request_name(&name), build_schema_from_model(Some(model.as_ref())));
        }
        if let Some(model) = &resource.update_model {
            section
                .schemas
                .insert(update_request_name(&name), build_schema_from_model(Some(model.as_ref())));
        }

        section.claim(
            &resource.base_path,
            build_collection_endpoints_from_resource(resource, &name, cfg),
            build_item_endpoints_from_resource(resource, &name),
        );
    }

    section
}

fn create_request_name(schema_name: &str) -> String {
    format!("Create{schema_name}Request")
}

fn update_request_name(schema_name: &str) -> String {
    format!("Update{schema_name}Request")
}

/// `GET` list and `POST` create on the collection path of a DTO resource.
pub fn build_collection_endpoints(resource: &ResourceDtos, schema_name: &str, cfg: &GeneratorConfig) -> PathItem {
    let tags = vec![schema_name.to_string()];

    PathItem {
        get: Some(list_operation(
            &resource.plural_name,
            format!("Retrieve a list of {}", resource.plural_name),
            tags.clone(),
            schema_name,
            cfg,
        )),
        post: Some(create_operation(&resource.name, tags, schema_name, schema_name)),
        ..Default::default()
    }
}

/// `GET`, `PUT` and `DELETE` on the item path of a DTO resource.
pub fn build_item_endpoints(resource: &ResourceDtos, schema_name: &str) -> PathItem {
    let tags = vec![schema_name.to_string()];

    PathItem {
        get: Some(get_operation(&resource.name, tags.clone(), schema_name)),
        put: Some(update_operation(&resource.name, tags.clone(), schema_name, schema_name)),
        delete: Some(delete_operation(&resource.name, tags)),
        ..Default::default()
    }
}

/// Collection endpoints of a plugin resource; `POST` only with a create model.
pub fn build_collection_endpoints_from_resource(
    resource: &ApiResource,
    schema_name: &str,
    cfg: &GeneratorConfig,
) -> PathItem {
    let tags = resource_tags(resource, schema_name);
    let description = resource
        .description
        .clone()
        .filter(|description| !description.is_empty())
        .unwrap_or_else(|| format!("Retrieve a list of {}", resource.plural_name));

    PathItem {
        get: Some(list_operation(
            &resource.plural_name,
            description,
            tags.clone(),
            schema_name,
            cfg,
        )),
        post: resource.create_model.as_ref().map(|_| {
            create_operation(&resource.name, tags, &create_request_name(schema_name), schema_name)
        }),
        ..Default::default()
    }
}

/// Item endpoints of a plugin resource; `PUT` only with an update model.
pub fn build_item_endpoints_from_resource(resource: &ApiResource, schema_name: &str) -> PathItem {
    let tags = resource_tags(resource, schema_name);

    PathItem {
        get: Some(get_operation(&resource.name, tags.clone(), schema_name)),
        put: resource.update_model.as_ref().map(|_| {
            update_operation(
                &resource.name,
                tags.clone(),
                &update_request_name(schema_name),
                schema_name,
            )
        }),
        delete: Some(delete_operation(&resource.name, tags)),
        ..Default::default()
    }
}

fn resource_tags(resource: &ApiResource, schema_name: &str) -> Vec<String> {
    if resource.tags.is_empty() {
        vec![schema_name.to_string()]
    } else {
        resource.tags.clone()
    }
}

fn list_operation(
    plural_name: &str,
    description: String,
    tags: Vec<String>,
    schema_name: &str,
    cfg: &GeneratorConfig,
) -> Operation {
    Operation {
        summary: format!("List {plural_name}"),
        description,
        tags,
        parameters: Some(pagination_parameters(cfg)),
        request_body: None,
        responses: BTreeMap::from([(
            "200".to_string(),
            Response::json("Hydra paginated collection", hydra_collection_schema(schema_name)),
        )]),
    }
}

fn create_operation(name: &str, tags: Vec<String>, request_schema: &str, schema_name: &str) -> Operation {
    Operation {
        summary: format!("Create {name}"),
        description: format!("Create a new {name}"),
        tags,
        parameters: None,
        request_body: Some(RequestBody::json(Schema::reference(request_schema))),
        responses: BTreeMap::from([(
            "201".to_string(),
            Response::json("Successfully created", Schema::reference(schema_name)),
        )]),
    }
}

fn get_operation(name: &str, tags: Vec<String>, schema_name: &str) -> Operation {
    Operation {
        summary: format!("Get {name} by ID"),
        description: format!("Retrieve a single {name} by ID"),
        tags,
        parameters: Some(vec![id_parameter()]),
        request_body: None,
        responses: BTreeMap::from([
            (
                "200".to_string(),
                Response::json("Successful response", Schema::reference(schema_name)),
            ),
            ("404".to_string(), Response::empty("Resource not found")),
        ]),
    }
}

fn update_operation(name: &str, tags: Vec<String>, request_schema: &str, schema_name: &str) -> Operation {
    Operation {
        summary: format!("Update {name} by ID"),
        description: format!("Update an existing {name}"),
        tags,
        parameters: Some(vec![id_parameter()]),
        request_body: Some(RequestBody::json(Schema::reference(request_schema))),
        responses: BTreeMap::from([
            (
                "200".to_string(),
                Response::json("Successfully updated", Schema::reference(schema_name)),
            ),
            ("404".to_string(), Response::empty("Resource not found")),
        ]),
    }
}

fn delete_operation(name: &str, tags: Vec<String>) -> Operation {
    Operation {
        summary: format!("Delete {name} by ID"),
        description: format!("Delete an existing {name}"),
        tags,
        parameters: Some(vec![id_parameter()]),
        request_body: None,
        responses: BTreeMap::from([
            ("204".to_string(), Response::empty("Successfully deleted")),
            ("404".to_string(), Response::empty("Resource not found")),
        ]),
    }
}

fn id_parameter() -> Parameter {
    Parameter::path("id", "Resource ID")
}

/// `limit`, `offset`, `count` and `expand` query parameters of a list.
pub fn pagination_parameters(cfg: &GeneratorConfig) -> Vec<Parameter> {
    let limit = Schema {
        default: Some(json!(cfg.pagination_limit)),
        maximum: Some(i64::from(cfg.pagination_max_limit)),
        ..Schema::of_type(SchemaType::Integer)
    };
    let offset = Schema {
        default: Some(json!(0)),
        minimum: Some(0),
        ..Schema::of_type(SchemaType::Integer)
    };
    let count = Schema {
        default: Some(json!(false)),
        ..Schema::of_type(SchemaType::Boolean)
    };

    vec![
        Parameter::query(
            "limit",
            format!(
                "Maximum number of items to return (default: {}, max: {})",
                cfg.pagination_limit, cfg.pagination_max_limit
            ),
            limit,
        ),
        Parameter::query("offset", "Number of items to skip (default: 0)", offset),
        Parameter::query(
            "count",
            "Include total count in response (adds hydra:totalItems field)",
            count,
        ),
        Parameter::query(
            "expand",
            "Comma-separated list of relations to expand",
            Schema::of_type(SchemaType::String),
        ),
    ]
}

/// Hydra collection envelope whose members reference `schema_name`.
pub fn hydra_collection_schema(schema_name: &str) -> Schema {
    let string = || Schema::of_type(SchemaType::String);

    let view: Properties = [
        "@id",
        "@type",
        "hydra:first",
        "hydra:last",
        "hydra:previous",
        "hydra:next",
    ]
    .into_iter()
    .map(|name| (name, string()))
    .collect();

    let properties: Properties = [
        ("@context", string()),
        ("@id", string()),
        (
            "@type",
            Schema {
                example: Some("hydra:Collection".to_string()),
                ..string()
            },
        ),
        (
            "hydra:totalItems",
            Schema {
                description: Some("Total count (only present if count=true)".to_string()),
                ..Schema::of_type(SchemaType::Integer)
            },
        ),
        ("hydra:member", Schema::array(Schema::reference(schema_name))),
        ("hydra:view", Schema::object(view)),
    ]
    .into_iter()
    .collect();

    Schema::object(properties)
}

/// HTTP bearer scheme carrying a JWT
pub fn bearer_scheme() -> SecurityScheme {
    SecurityScheme {
        scheme_type: "http".to_string(),
        scheme: "bearer".to_string(),
        bearer_format: "JWT".to_string(),
        description: "JWT authentication token".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use crate::model::{ApiModel, FieldKind, ModelField};
    use crate::plugin::{OpenApiProvider, Plugin, PluginRegistry};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const USER_DTOS: &str = r#"
        pub struct UserDTO {
            #[serde(rename = "id")]
            pub id: i64,
            #[serde(rename = "name")]
            pub name: String,
        }

        pub struct CreateUserDTO {
            #[serde(rename = "name")]
            pub name: String,
        }
    "#;

    fn dto_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).unwrap();
        }
        temp_dir
    }

    fn to_json(doc: &OpenApiDocument) -> serde_json::Value {
        serde_json::to_value(doc).unwrap()
    }

    struct Title;

    impl ApiModel for Title {
        fn model_fields(&self) -> Vec<ModelField> {
            vec![ModelField::new("Title", FieldKind::String).json("title")]
        }
    }

    struct Blog {
        with_models: bool,
    }

    impl OpenApiProvider for Blog {
        fn openapi_resources(&self) -> Vec<ApiResource> {
            let resource = ApiResource::new("article", "articles", "/api/articles");
            if self.with_models {
                vec![resource
                    .with_description("Published articles")
                    .with_tags(&["Content"])
                    .with_response_model(Title)
                    .with_create_model(Title)
                    .with_update_model(Title)]
            } else {
                vec![resource]
            }
        }
    }

    impl Plugin for Blog {
        fn name(&self) -> &str {
            "blog"
        }

        fn openapi_provider(&self) -> Option<&dyn OpenApiProvider> {
            Some(self)
        }
    }

    fn plugin_config(with_models: bool) -> GeneratorConfig {
        let mut registry = PluginRegistry::new();
        registry.register(Blog { with_models });
        GeneratorConfig::default().with_plugin_registry(registry)
    }

    #[test]
    fn test_empty_config() {
        let doc = generate_openapi_spec(&[], &GeneratorConfig::default()).unwrap();
        let json = to_json(&doc);

        assert_eq!(json["openapi"], "3.0.0");
        assert_eq!(json["info"]["title"], "Generated API");
        assert_eq!(json["info"]["version"], "1.0.0");
        assert_eq!(
            json["servers"],
            json!([{"url": "http://localhost:3000", "description": "Development server"}])
        );
        assert_eq!(json["paths"], json!({}));
        assert_eq!(json["components"]["schemas"], json!({}));
        assert_eq!(
            json["components"]["securitySchemes"]["bearerAuth"],
            json!({
                "type": "http",
                "scheme": "bearer",
                "bearerFormat": "JWT",
                "description": "JWT authentication token"
            })
        );
        assert_eq!(json["security"], json!([{"bearerAuth": []}]));
    }

    #[test]
    fn test_user_resource() {
        let dir = dto_dir(&[("user.rs", USER_DTOS)]);
        let cfg = GeneratorConfig::default().with_dtos_directory(dir.path());

        let doc = generate_openapi_spec(&[], &cfg).unwrap();
        let json = to_json(&doc);

        assert_eq!(
            json["components"]["schemas"]["User"],
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "format": "int64", "nullable": false},
                    "name": {"type": "string", "nullable": false}
                },
                "required": ["name"]
            })
        );
        assert_eq!(
            doc.paths.keys().collect::<Vec<_>>(),
            vec!["/users", "/users/{id}"]
        );

        let users = &json["paths"]["/users"];
        assert_eq!(users["get"]["summary"], "List users");
        assert_eq!(users["get"]["tags"], json!(["User"]));
        assert_eq!(
            users["post"]["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/User"
        );
        assert_eq!(users["post"]["responses"]["201"]["description"], "Successfully created");

        let user = &json["paths"]["/users/{id}"];
        assert_eq!(user["get"]["summary"], "Get user by ID");
        assert_eq!(user["delete"]["responses"]["204"]["description"], "Successfully deleted");
        assert_eq!(user["put"]["responses"]["404"]["description"], "Resource not found");
        assert_eq!(
            user["get"]["parameters"],
            json!([{
                "name": "id",
                "in": "path",
                "required": true,
                "description": "Resource ID",
                "schema": {"type": "string"}
            }])
        );
    }

    #[test]
    fn test_pagination_parameters_follow_config() {
        let cfg = GeneratorConfig {
            pagination_limit: 25,
            pagination_max_limit: 250,
            ..GeneratorConfig::default()
        };

        let params = serde_json::to_value(pagination_parameters(&cfg)).unwrap();

        assert_eq!(
            params,
            json!([
                {
                    "name": "limit",
                    "in": "query",
                    "description": "Maximum number of items to return (default: 25, max: 250)",
                    "schema": {"type": "integer", "default": 25, "maximum": 250}
                },
                {
                    "name": "offset",
                    "in": "query",
                    "description": "Number of items to skip (default: 0)",
                    "schema": {"type": "integer", "default": 0, "minimum": 0}
                },
                {
                    "name": "count",
                    "in": "query",
                    "description": "Include total count in response (adds hydra:totalItems field)",
                    "schema": {"type": "boolean", "default": false}
                },
                {
                    "name": "expand",
                    "in": "query",
                    "description": "Comma-separated list of relations to expand",
                    "schema": {"type": "string"}
                }
            ])
        );
    }

    #[test]
    fn test_hydra_collection_schema() {
        let schema = hydra_collection_schema("Post");
        let json = serde_json::to_value(&schema).unwrap();

        assert_eq!(json["properties"]["@type"]["example"], "hydra:Collection");
        assert_eq!(
            json["properties"]["hydra:member"],
            json!({"type": "array", "items": {"$ref": "#/components/schemas/Post"}})
        );
        assert_eq!(
            schema.properties.as_ref().unwrap().names().collect::<Vec<_>>(),
            vec!["@context", "@id", "@type", "hydra:totalItems", "hydra:member", "hydra:view"]
        );
    }

    #[test]
    fn test_missing_dto_directory_is_an_error() {
        let cfg = GeneratorConfig::default().with_dtos_directory("/nonexistent/dtos");

        let result = generate_openapi_spec(&[], &cfg);
        assert!(matches!(result, Err(GeneratorError::DtoDirectoryNotFound(_))));
    }

    #[test]
    fn test_ambiguous_resource_is_skipped() {
        let dir = dto_dir(&[
            ("user.rs", USER_DTOS),
            (
                "account.rs",
                "pub struct AccountDTO { pub id: i64 }\npub struct AdminDTO { pub id: i64 }",
            ),
        ]);
        let cfg = GeneratorConfig::default().with_dtos_directory(dir.path());

        let doc = generate_openapi_spec(&[RouteRecord::new("GET", "/accounts")], &cfg).unwrap();

        assert!(!doc.components.schemas.contains_key("Account"));
        assert!(doc.components.schemas.contains_key("User"));
        // No longer claimed, so the live route is documented generically
        let accounts = doc.paths["/accounts"].get.as_ref().unwrap();
        assert_eq!(accounts.summary, "Get accounts");
    }

    #[test]
    fn test_discovered_routes_do_not_replace_resource_operations() {
        let dir = dto_dir(&[("user.rs", USER_DTOS)]);
        let cfg = GeneratorConfig::default().with_dtos_directory(dir.path());
        let routes = vec![
            RouteRecord::new("GET", "/users"),
            RouteRecord::new("PATCH", "/users/:id/avatar"),
            RouteRecord::new("GET", "/health"),
            RouteRecord::new("GET", "/openapi"),
        ];

        let doc = generate_openapi_spec(&routes, &cfg).unwrap();

        assert_eq!(
            doc.paths.keys().collect::<Vec<_>>(),
            vec!["/health", "/users", "/users/{id}", "/users/{id}/avatar"]
        );
        assert_eq!(doc.paths["/users"].get.as_ref().unwrap().summary, "List users");
        let avatar = doc.paths["/users/{id}/avatar"].patch.as_ref().unwrap();
        assert_eq!(avatar.tags, vec!["Users".to_string()]);
    }

    #[test]
    fn test_plugin_resources_take_precedence() {
        let dir = dto_dir(&[("user.rs", USER_DTOS)]);
        let cfg = plugin_config(true).with_dtos_directory(dir.path());

        let doc = generate_openapi_spec(&[], &cfg).unwrap();
        let json = to_json(&doc);

        assert_eq!(
            doc.components.schemas.keys().collect::<Vec<_>>(),
            vec!["Article", "CreateArticleRequest", "UpdateArticleRequest"]
        );
        assert_eq!(
            doc.paths.keys().collect::<Vec<_>>(),
            vec!["/api/articles", "/api/articles/{id}"]
        );

        let collection = &json["paths"]["/api/articles"];
        assert_eq!(collection["get"]["description"], "Published articles");
        assert_eq!(collection["get"]["tags"], json!(["Content"]));
        assert_eq!(
            collection["post"]["requestBody"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/CreateArticleRequest"
        );
        assert_eq!(
            json["paths"]["/api/articles/{id}"]["put"]["requestBody"]["content"]["application/json"]
                ["schema"]["$ref"],
            "#/components/schemas/UpdateArticleRequest"
        );
    }

    #[test]
    fn test_plugin_resource_without_models() {
        let doc = generate_openapi_spec(&[], &plugin_config(false)).unwrap();

        assert!(doc.components.schemas.is_empty());

        let collection = &doc.paths["/api/articles"];
        assert_eq!(collection.operation_count(), 1);
        let list = collection.get.as_ref().unwrap();
        assert_eq!(list.description, "Retrieve a list of articles");
        assert_eq!(list.tags, vec!["Article".to_string()]);

        let item = &doc.paths["/api/articles/{id}"];
        assert!(item.get.is_some());
        assert!(item.delete.is_some());
        assert!(item.put.is_none());
    }
}
