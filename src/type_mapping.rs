use serde::{Deserialize, Serialize};

/// OpenAPI primitive schema types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

/// Maps a normalized source type name to an OpenAPI `(type, format)` pair.
///
/// The caller strips any `Option<..>` wrapper first. Names outside the table
/// degrade to a plain string so an unknown type never fails generation.
pub fn map_type(type_name: &str) -> (SchemaType, Option<&'static str>) {
    match type_name {
        "i16" | "i32" => (SchemaType::Integer, Some("int32")),
        "i64" => (SchemaType::Integer, Some("int64")),
        "f32" => (SchemaType::Number, Some("float")),
        "f64" => (SchemaType::Number, Some("double")),
        "String" | "str" => (SchemaType::String, None),
        "bool" => (SchemaType::Boolean, None),
        "DateTime" | "chrono::DateTime" => (SchemaType::String, Some("date-time")),
        "Value" | "serde_json::Value" => (SchemaType::Object, None),
        _ => (SchemaType::String, None),
    }
}
