//! Documents live routes that no resource accounts for.
//!
//! The host hands over its route table as [`RouteRecord`]s. Every route that
//! is not a resource path, the root, or one of the docs endpoints gets a
//! generic operation inferred from its method and path segments.

use crate::docs::{DOCUMENT_PATH, UI_PATH};
use crate::document::{convert_path_format, Operation, Parameter, PathItem, RequestBody, Response, Schema};
use crate::naming::capitalize;
use crate::type_mapping::SchemaType;
use log::debug;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

/// One registered route of the running service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteRecord {
    /// Route pattern with `:name` parameter markers
    pub path: String,
    /// HTTP method token, any case
    pub method: String,
}

impl RouteRecord {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
        }
    }
}

/// HTTP methods with a dedicated summary and response table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
    Trace,
    /// Any other method, stored uppercase
    Other(String),
}

impl HttpMethod {
    /// Parses a method token case-insensitively.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            "TRACE" => HttpMethod::Trace,
            other => HttpMethod::Other(other.to_string()),
        }
    }

    /// Uppercase method name
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Other(method) => method,
        }
    }

    /// Lowercase key used inside a path item
    pub fn key(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }

    fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// Builds path items for every route not claimed by a resource.
///
/// `claimed` holds resource paths in route form (`/users`, `/users/:id`).
/// Returned keys use the OpenAPI `{name}` form.
pub fn discover_non_resource_routes(
    routes: &[RouteRecord],
    claimed: &HashSet<String>,
) -> BTreeMap<String, PathItem> {
    let mut discovered: BTreeMap<String, PathItem> = BTreeMap::new();

    for route in routes {
        if should_skip_route(&route.path, claimed) {
            continue;
        }

        let method = HttpMethod::from_token(&route.method);
        debug!("Discovered route {} {}", method.as_str(), route.path);
        discovered
            .entry(convert_path_format(&route.path))
            .or_default()
            .set_operation(&method.key(), generate_route_spec(&route.path, &method));
    }

    discovered
}

/// Whether a route is left out of discovery
pub fn should_skip_route(path: &str, claimed: &HashSet<String>) -> bool {
    path == UI_PATH || path == DOCUMENT_PATH || path.is_empty() || path == "/" || claimed.contains(path)
}

/// Builds the generic operation for one route.
pub fn generate_route_spec(path: &str, method: &HttpMethod) -> Operation {
    let parameters = extract_path_parameters(path);

    Operation {
        summary: generate_summary(path, method),
        description: generate_description(path, method),
        tags: vec![determine_tag(path)],
        parameters: (!parameters.is_empty()).then_some(parameters),
        request_body: method.has_body().then(generate_request_body),
        responses: generate_responses(method),
    }
}

/// Tag derived from the first path segment.
pub fn determine_tag(path: &str) -> String {
    match path.trim_matches('/').split('/').next() {
        None | Some("") => "General".to_string(),
        Some("auth") => "Authentication".to_string(),
        Some("health") => "System".to_string(),
        Some(segment) => capitalize(segment),
    }
}

/// Verb phrase followed by the path segments, e.g. `Get users id`.
pub fn generate_summary(path: &str, method: &HttpMethod) -> String {
    let action = match method {
        HttpMethod::Get => "Get",
        HttpMethod::Post => "Create or execute",
        HttpMethod::Put => "Update",
        HttpMethod::Patch => "Partially update",
        HttpMethod::Delete => "Delete",
        other => other.as_str(),
    };
    let path_name = path
        .trim_matches('/')
        .split('/')
        .collect::<Vec<_>>()
        .join(" ")
        .replace(':', "");

    format!("{action} {path_name}")
}

pub fn generate_description(path: &str, method: &HttpMethod) -> String {
    format!("{} {}", method.as_str(), path)
}

/// One required string parameter per `:name` segment.
pub fn extract_path_parameters(path: &str) -> Vec<Parameter> {
    path.split('/')
        .filter_map(|part| part.strip_prefix(':'))
        .map(|name| Parameter::path(name, format!("Path parameter: {name}")))
        .collect()
}

/// Required JSON body with an open object schema
pub fn generate_request_body() -> RequestBody {
    RequestBody::json(Schema::of_type(SchemaType::Object))
}

/// Response table keyed by status code.
pub fn generate_responses(method: &HttpMethod) -> BTreeMap<String, Response> {
    let object = || Schema::of_type(SchemaType::Object);
    let responses = match method {
        HttpMethod::Get => vec![("200", Response::json("Successful response", object()))],
        HttpMethod::Post => vec![
            ("201", Response::json("Successfully created", object())),
            ("400", Response::empty("Bad request")),
        ],
        HttpMethod::Put | HttpMethod::Patch => vec![
            ("200", Response::json("Successfully updated", object())),
            ("404", Response::empty("Not found")),
        ],
        HttpMethod::Delete => vec![
            ("204", Response::empty("Successfully deleted")),
            ("404", Response::empty("Not found")),
        ],
        HttpMethod::Options | HttpMethod::Head | HttpMethod::Trace | HttpMethod::Other(_) => {
            vec![("200", Response::empty("Successful response"))]
        }
    };

    responses
        .into_iter()
        .map(|(status, response)| (status.to_string(), response))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn claimed(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_method_tokens() {
        assert_eq!(HttpMethod::from_token("get"), HttpMethod::Get);
        assert_eq!(HttpMethod::from_token("Patch"), HttpMethod::Patch);
        assert_eq!(HttpMethod::from_token("options"), HttpMethod::Options);
        assert_eq!(HttpMethod::from_token("HEAD"), HttpMethod::Head);
        assert_eq!(HttpMethod::from_token("trace"), HttpMethod::Trace);
        assert_eq!(
            HttpMethod::from_token("purge"),
            HttpMethod::Other("PURGE".to_string())
        );
        assert_eq!(HttpMethod::Trace.as_str(), "TRACE");
        assert_eq!(HttpMethod::Delete.key(), "delete");
    }

    #[test]
    fn test_skip_rules() {
        let claimed = claimed(&["/users", "/users/:id"]);

        assert!(should_skip_route("/openapi", &claimed));
        assert!(should_skip_route("/openapi.json", &claimed));
        assert!(should_skip_route("", &claimed));
        assert!(should_skip_route("/", &claimed));
        assert!(should_skip_route("/users/:id", &claimed));
        assert!(!should_skip_route("/users/:id/avatar", &claimed));
    }

    #[test]
    fn test_determine_tag() {
        assert_eq!(determine_tag("/auth/login"), "Authentication");
        assert_eq!(determine_tag("/health"), "System");
        assert_eq!(determine_tag("/reports/daily"), "Reports");
        assert_eq!(determine_tag("/"), "General");
    }

    #[test]
    fn test_generate_summary() {
        assert_eq!(generate_summary("/users/:id", &HttpMethod::Get), "Get users id");
        assert_eq!(
            generate_summary("/auth/login", &HttpMethod::Post),
            "Create or execute auth login"
        );
        assert_eq!(
            generate_summary("/items/:id", &HttpMethod::Patch),
            "Partially update items id"
        );
        assert_eq!(
            generate_summary("/ping", &HttpMethod::from_token("head")),
            "HEAD ping"
        );
        assert_eq!(
            generate_summary("/debug", &HttpMethod::Trace),
            "TRACE debug"
        );
    }

    #[test]
    fn test_bodiless_methods_get_generic_response() {
        for method in [
            HttpMethod::Options,
            HttpMethod::Head,
            HttpMethod::Trace,
            HttpMethod::Other("PURGE".to_string()),
        ] {
            let responses = generate_responses(&method);
            assert_eq!(responses.keys().collect::<Vec<_>>(), vec!["200"]);
            assert_eq!(responses["200"].description, "Successful response");
            assert!(responses["200"].content.is_none());
            assert!(!method.has_body());
        }
    }

    #[test]
    fn test_path_parameters() {
        let params = extract_path_parameters("/orgs/:org_id/members/:member_id");

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!([
                {
                    "name": "org_id",
                    "in": "path",
                    "required": true,
                    "description": "Path parameter: org_id",
                    "schema": {"type": "string"}
                },
                {
                    "name": "member_id",
                    "in": "path",
                    "required": true,
                    "description": "Path parameter: member_id",
                    "schema": {"type": "string"}
                }
            ])
        );
    }

    #[test]
    fn test_resource_paths_are_not_rediscovered() {
        let routes = vec![
            RouteRecord::new("GET", "/users"),
            RouteRecord::new("POST", "/users"),
            RouteRecord::new("GET", "/users/:id"),
            RouteRecord::new("GET", "/openapi.json"),
            RouteRecord::new("GET", "/health"),
        ];

        let discovered = discover_non_resource_routes(&routes, &claimed(&["/users", "/users/:id"]));

        assert_eq!(discovered.keys().collect::<Vec<_>>(), vec!["/health"]);
        let health = discovered["/health"].get.as_ref().unwrap();
        assert_eq!(health.tags, vec!["System".to_string()]);
        assert_eq!(health.description, "GET /health");
        assert!(health.parameters.is_none());
        assert!(health.request_body.is_none());
    }

    #[test]
    fn test_login_route() {
        let routes = vec![RouteRecord::new("post", "/auth/login")];

        let discovered = discover_non_resource_routes(&routes, &HashSet::new());
        let login = discovered["/auth/login"].post.as_ref().unwrap();

        assert_eq!(
            serde_json::to_value(login).unwrap(),
            json!({
                "summary": "Create or execute auth login",
                "description": "POST /auth/login",
                "tags": ["Authentication"],
                "requestBody": {
                    "required": true,
                    "content": {"application/json": {"schema": {"type": "object"}}}
                },
                "responses": {
                    "201": {
                        "description": "Successfully created",
                        "content": {"application/json": {"schema": {"type": "object"}}}
                    },
                    "400": {"description": "Bad request"}
                }
            })
        );
    }

    #[test]
    fn test_methods_merge_under_converted_path() {
        let routes = vec![
            RouteRecord::new("PUT", "/settings/:key"),
            RouteRecord::new("DELETE", "/settings/:key"),
            RouteRecord::new("OPTIONS", "/settings/:key"),
        ];

        let discovered = discover_non_resource_routes(&routes, &HashSet::new());

        assert_eq!(discovered.len(), 1);
        let item = &discovered["/settings/{key}"];
        assert_eq!(item.operation_count(), 3);

        let delete = item.delete.as_ref().unwrap();
        assert_eq!(delete.responses["204"].description, "Successfully deleted");
        assert_eq!(delete.responses["404"].description, "Not found");
        assert!(delete.request_body.is_none());

        let put = item.put.as_ref().unwrap();
        assert!(put.request_body.is_some());
        assert_eq!(put.parameters.as_ref().unwrap()[0].name, "key");

        let options = item.options.as_ref().unwrap();
        assert_eq!(options.responses.len(), 1);
        assert!(options.responses["200"].content.is_none());
    }
}
