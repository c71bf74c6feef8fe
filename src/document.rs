//! Typed OpenAPI 3.0 document tree.
//!
//! Every node serializes with serde. Object properties keep insertion order;
//! paths, component schemas and responses are sorted maps so the output is
//! stable between runs.

use crate::type_mapping::SchemaType;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// OpenAPI version emitted in every document
pub const OPENAPI_VERSION: &str = "3.0.0";

/// Media type used for every request and response body
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub servers: Vec<Server>,
    pub paths: BTreeMap<String, PathItem>,
    pub components: Components,
    pub security: Vec<SecurityRequirement>,
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    pub description: String,
}

/// OpenAPI Server object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    pub url: String,
    pub description: String,
}

/// Maps a security scheme name to its required scopes
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// OpenAPI Components object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Components {
    pub schemas: BTreeMap<String, Schema>,
    #[serde(rename = "securitySchemes")]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
}

/// HTTP security scheme definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    pub scheme: String,
    #[serde(rename = "bearerFormat")]
    pub bearer_format: String,
    pub description: String,
}

/// OpenAPI PathItem object - all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
    /// Operations for methods OpenAPI has no fixed slot for, keyed lowercase
    #[serde(flatten)]
    pub other: BTreeMap<String, Operation>,
}

impl PathItem {
    fn fixed_slot(&mut self, method_key: &str) -> Option<&mut Option<Operation>> {
        match method_key {
            "get" => Some(&mut self.get),
            "post" => Some(&mut self.post),
            "put" => Some(&mut self.put),
            "patch" => Some(&mut self.patch),
            "delete" => Some(&mut self.delete),
            "options" => Some(&mut self.options),
            "head" => Some(&mut self.head),
            "trace" => Some(&mut self.trace),
            _ => None,
        }
    }

    /// Looks up the operation registered for a lowercase method key.
    pub fn operation(&self, method_key: &str) -> Option<&Operation> {
        match method_key {
            "get" => self.get.as_ref(),
            "post" => self.post.as_ref(),
            "put" => self.put.as_ref(),
            "patch" => self.patch.as_ref(),
            "delete" => self.delete.as_ref(),
            "options" => self.options.as_ref(),
            "head" => self.head.as_ref(),
            "trace" => self.trace.as_ref(),
            other => self.other.get(other),
        }
    }

    /// Stores an operation under a lowercase method key, replacing any
    /// previous one.
    pub fn set_operation(&mut self, method_key: &str, operation: Operation) {
        match self.fixed_slot(method_key) {
            Some(slot) => *slot = Some(operation),
            None => {
                self.other.insert(method_key.to_string(), operation);
            }
        }
    }

    /// Copies every operation of `other` that this item does not define yet.
    pub fn merge_missing(&mut self, other: PathItem) {
        for (key, operation) in other.into_operations() {
            if self.operation(&key).is_none() {
                self.set_operation(&key, operation);
            }
        }
    }

    /// Consumes the item and yields `(method key, operation)` pairs.
    pub fn into_operations(self) -> Vec<(String, Operation)> {
        let fixed = [
            ("get", self.get),
            ("post", self.post),
            ("put", self.put),
            ("patch", self.patch),
            ("delete", self.delete),
            ("options", self.options),
            ("head", self.head),
            ("trace", self.trace),
        ];
        fixed
            .into_iter()
            .filter_map(|(key, op)| op.map(|op| (key.to_string(), op)))
            .chain(self.other)
            .collect()
    }

    /// Whether no operation is defined
    pub fn is_empty(&self) -> bool {
        self.operation_count() == 0
    }

    /// Number of operations defined on this path
    pub fn operation_count(&self) -> usize {
        [
            &self.get,
            &self.post,
            &self.put,
            &self.patch,
            &self.delete,
            &self.options,
            &self.head,
            &self.trace,
        ]
        .iter()
        .filter(|op| op.is_some())
        .count()
            + self.other.len()
    }
}

/// OpenAPI Operation object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Operation {
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: BTreeMap<String, Response>,
}

/// Where a parameter is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
}

/// OpenAPI Parameter object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Path parameters are always required; query parameters omit the flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    pub description: String,
    pub schema: Schema,
}

impl Parameter {
    /// A required string path parameter
    pub fn path(name: &str, description: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            location: ParameterLocation::Path,
            required: Some(true),
            description: description.into(),
            schema: Schema::of_type(SchemaType::String),
        }
    }

    /// An optional query parameter
    pub fn query(name: &str, description: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.to_string(),
            location: ParameterLocation::Query,
            required: None,
            description: description.into(),
            schema,
        }
    }
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    pub required: bool,
    pub content: BTreeMap<String, MediaType>,
}

impl RequestBody {
    /// A required JSON body with the given schema
    pub fn json(schema: Schema) -> Self {
        Self {
            required: true,
            content: json_content(schema),
        }
    }
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaType {
    pub schema: Schema,
}

/// OpenAPI Response object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
}

impl Response {
    /// A response without a body
    pub fn empty(description: &str) -> Self {
        Self {
            description: description.to_string(),
            content: None,
        }
    }

    /// A response with a JSON body
    pub fn json(description: &str, schema: Schema) -> Self {
        Self {
            description: description.to_string(),
            content: Some(json_content(schema)),
        }
    }
}

fn json_content(schema: Schema) -> BTreeMap<String, MediaType> {
    BTreeMap::from([(JSON_MEDIA_TYPE.to_string(), MediaType { schema })])
}

/// JSON schema fragment
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl Schema {
    /// A bare `{type: ..}` schema
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    /// A `$ref` to a component schema
    pub fn reference(schema_name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{schema_name}")),
            ..Default::default()
        }
    }

    /// An array of `items`
    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// An object with the given ordered properties
    pub fn object(properties: Properties) -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            properties: Some(properties),
            ..Default::default()
        }
    }
}

/// Ordered `properties` map of an object schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, Schema)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a property, replacing an existing one with the same name in
    /// place.
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = schema,
            None => self.0.push((name, schema)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, schema)| schema)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Schema)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, Schema)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (name, schema) in iter {
            properties.insert(name, schema);
        }
        properties
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in &self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

/// Converts `:param` route markers into OpenAPI `{param}` segments.
pub fn convert_path_format(path: &str) -> String {
    path.split('/')
        .map(|part| match part.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
