//! Framework-agnostic responses for the documentation endpoints.
//!
//! A host mounts [`ui_response`] at [`UI_PATH`] and [`document_response`] at
//! [`DOCUMENT_PATH`], translating [`DocsResponse`] into its own response type.

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::generator::generate_openapi_spec;
use crate::route_discovery::RouteRecord;
use log::error;
use serde_json::json;

/// Path of the interactive reference page
pub const UI_PATH: &str = "/openapi";

/// Path of the generated JSON document
pub const DOCUMENT_PATH: &str = "/openapi.json";

/// Only external origin the reference page may load from
pub const CDN_ORIGIN: &str = "https://cdn.jsdelivr.net";

/// Restricts the reference page to itself and the CDN
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
    style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
    font-src 'self' data: https://cdn.jsdelivr.net; \
    img-src 'self' data: https://cdn.jsdelivr.net; \
    connect-src 'self'";

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Status, headers and body of a docs endpoint response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsResponse {
    pub status: u16,
    pub content_type: String,
    /// Extra headers besides `Content-Type`
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// HTML page that renders [`DOCUMENT_PATH`] with the Scalar API reference.
pub fn ui_html(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title} Documentation</title>
    <meta charset="utf-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body {{
            margin: 0;
            padding: 0;
        }}
    </style>
</head>
<body>
    <script id="api-reference" data-url="{DOCUMENT_PATH}"></script>
    <script src="{CDN_ORIGIN}/npm/@scalar/api-reference"></script>
</body>
</html>
"#,
        title = escape_html(title)
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn ui_response(title: &str) -> DocsResponse {
    DocsResponse {
        status: 200,
        content_type: HTML_CONTENT_TYPE.to_string(),
        headers: vec![(
            "Content-Security-Policy".to_string(),
            CONTENT_SECURITY_POLICY.to_string(),
        )],
        body: ui_html(title),
    }
}

/// Generates the document for the current routes.
///
/// Generation failures become a 500 with a JSON `error` body.
pub fn document_response(routes: &[RouteRecord], cfg: &GeneratorConfig) -> DocsResponse {
    match render_document(routes, cfg) {
        Ok(body) => DocsResponse {
            status: 200,
            content_type: JSON_CONTENT_TYPE.to_string(),
            headers: Vec::new(),
            body,
        },
        Err(e) => {
            error!("Failed to generate OpenAPI document: {}", e);
            DocsResponse {
                status: 500,
                content_type: JSON_CONTENT_TYPE.to_string(),
                headers: Vec::new(),
                body: json!({ "error": e.to_string() }).to_string(),
            }
        }
    }
}

fn render_document(routes: &[RouteRecord], cfg: &GeneratorConfig) -> Result<String> {
    let doc = generate_openapi_spec(routes, cfg)?;
    Ok(serde_json::to_string(&doc)?)
}
