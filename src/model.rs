//! Schemas built from runtime model descriptors.
//!
//! Hosts that own typed models, rather than DTO sources on disk, describe
//! them through [`ApiModel`]. Each [`ModelField`] carries its JSON and
//! validation tags so the generated property can include formats and
//! constraints.

use crate::document::Schema;
use crate::schema_builder::{build_object_schema, is_system_field, FieldSchema};
use crate::type_mapping::SchemaType;

/// Shape of a model field's value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Uuid,
    Int,
    Int64,
    Uint,
    Float32,
    Float64,
    Bool,
    DateTime,
    /// A nested struct other than the well-known timestamp and UUID types
    Struct,
    Array(Box<FieldKind>),
    Map,
    Other,
}

/// Describes one field of a runtime model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelField {
    /// Field identifier, used when the JSON tag carries no name
    pub name: String,
    /// Raw JSON tag, e.g. `email,omitempty` or `-`
    pub json_tag: String,
    /// Raw validation tag, e.g. `required,min=3,max=50`
    pub validate_tag: String,
    pub kind: FieldKind,
    /// Whether the value may be absent (a nullable reference)
    pub is_pointer: bool,
    /// Non-public fields never reach the wire
    pub exported: bool,
}

impl ModelField {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            json_tag: String::new(),
            validate_tag: String::new(),
            kind,
            is_pointer: false,
            exported: true,
        }
    }

    pub fn json(mut self, tag: &str) -> Self {
        self.json_tag = tag.to_string();
        self
    }

    pub fn validate(mut self, tag: &str) -> Self {
        self.validate_tag = tag.to_string();
        self
    }

    pub fn pointer(mut self) -> Self {
        self.is_pointer = true;
        self
    }

    pub fn unexported(mut self) -> Self {
        self.exported = false;
        self
    }

    fn omit_empty(&self) -> bool {
        self.json_tag.contains("omitempty") || self.validate_tag.contains("omitempty")
    }
}

/// A model that can enumerate its fields at runtime
pub trait ApiModel {
    fn model_fields(&self) -> Vec<ModelField>;
}

/// Builds an object schema for a runtime model.
///
/// A missing model yields a bare `{type: object}`.
pub fn build_schema_from_model(model: Option<&dyn ApiModel>) -> Schema {
    match model {
        Some(model) => build_object_schema(&model.model_fields()),
        None => Schema::of_type(SchemaType::Object),
    }
}

impl FieldSchema for ModelField {
    fn json_name(&self) -> String {
        match self.json_tag.split(',').next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.name.clone(),
        }
    }

    fn property_schema(&self) -> Schema {
        let mut property = kind_schema(&self.kind);
        property.nullable = Some(self.is_pointer);
        apply_validation_rules(&mut property, &self.validate_tag);
        property
    }

    fn is_required(&self) -> bool {
        !self.is_pointer && !self.omit_empty() && !is_system_field(&self.json_name())
    }

    fn is_skipped(&self) -> bool {
        !self.exported || self.json_tag == "-"
    }
}

fn kind_schema(kind: &FieldKind) -> Schema {
    let with_format = |schema_type, format: &str| Schema {
        format: Some(format.to_string()),
        ..Schema::of_type(schema_type)
    };

    match kind {
        FieldKind::String | FieldKind::Other => Schema::of_type(SchemaType::String),
        FieldKind::Uuid => with_format(SchemaType::String, "uuid"),
        FieldKind::Int => with_format(SchemaType::Integer, "int32"),
        FieldKind::Int64 => with_format(SchemaType::Integer, "int64"),
        FieldKind::Uint => Schema::of_type(SchemaType::Integer),
        FieldKind::Float32 => with_format(SchemaType::Number, "float"),
        FieldKind::Float64 => with_format(SchemaType::Number, "double"),
        FieldKind::Bool => Schema::of_type(SchemaType::Boolean),
        FieldKind::DateTime => with_format(SchemaType::String, "date-time"),
        FieldKind::Struct | FieldKind::Map => Schema::of_type(SchemaType::Object),
        FieldKind::Array(items) => Schema::array(kind_schema(items)),
    }
}

/// Applies `validate` tag rules as formats and constraints.
///
/// Unknown rules and non-numeric bounds are ignored.
pub fn apply_validation_rules(property: &mut Schema, validate_tag: &str) {
    if validate_tag.is_empty() {
        return;
    }

    for rule in validate_tag.split(',') {
        let (name, value) = match rule.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (rule.trim(), ""),
        };

        match name {
            "email" => property.format = Some("email".to_string()),
            "uuid" => property.format = Some("uuid".to_string()),
            "url" => property.format = Some("uri".to_string()),
            "min" | "max" => {
                let Some(bound) = parse_positive(value) else {
                    continue;
                };
                match (property.schema_type, name) {
                    (Some(SchemaType::String), "min") => property.min_length = Some(bound),
                    (Some(SchemaType::String), _) => property.max_length = Some(bound),
                    (Some(SchemaType::Integer | SchemaType::Number), "min") => {
                        property.minimum = Some(bound)
                    }
                    (Some(SchemaType::Integer | SchemaType::Number), _) => {
                        property.maximum = Some(bound)
                    }
                    _ => {}
                }
            }
            "oneof" if property.schema_type == Some(SchemaType::String) => {
                property.enum_values = Some(value.split(' ').map(str::to_string).collect());
            }
            _ => {}
        }
    }
}

fn parse_positive(value: &str) -> Option<i64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<i64>().ok().filter(|bound| *bound > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Account;

    impl ApiModel for Account {
        fn model_fields(&self) -> Vec<ModelField> {
            vec![
                ModelField::new("ID", FieldKind::Uuid).json("id"),
                ModelField::new("Email", FieldKind::String)
                    .json("email")
                    .validate("required,email"),
                ModelField::new("Username", FieldKind::String)
                    .json("username")
                    .validate("required,min=3,max=32"),
                ModelField::new("Age", FieldKind::Int)
                    .json("age,omitempty")
                    .validate("min=18,max=130"),
                ModelField::new("Nickname", FieldKind::String)
                    .json("nickname")
                    .pointer(),
                ModelField::new("Password", FieldKind::String).json("-"),
                ModelField::new("internal", FieldKind::String).unexported(),
                ModelField::new("CreatedAt", FieldKind::DateTime).json("createdAt"),
            ]
        }
    }

    #[test]
    fn test_missing_model_is_bare_object() {
        let schema = build_schema_from_model(None);
        assert_eq!(serde_json::to_value(&schema).unwrap(), json!({"type": "object"}));
    }

    #[test]
    fn test_model_schema() {
        let schema = build_schema_from_model(Some(&Account));

        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "string", "format": "uuid", "nullable": false},
                    "email": {"type": "string", "format": "email", "nullable": false},
                    "username": {
                        "type": "string",
                        "nullable": false,
                        "minLength": 3,
                        "maxLength": 32
                    },
                    "age": {
                        "type": "integer",
                        "format": "int32",
                        "nullable": false,
                        "minimum": 18,
                        "maximum": 130
                    },
                    "nickname": {"type": "string", "nullable": true},
                    "createdAt": {"type": "string", "format": "date-time", "nullable": false}
                },
                "required": ["email", "username"]
            })
        );
    }

    #[test]
    fn test_property_order_follows_fields() {
        let schema = build_schema_from_model(Some(&Account));
        let names: Vec<&str> = schema.properties.as_ref().unwrap().names().collect();
        assert_eq!(
            names,
            vec!["id", "email", "username", "age", "nickname", "createdAt"]
        );
    }

    #[test]
    fn test_json_name_falls_back_to_field_name() {
        let field = ModelField::new("DisplayName", FieldKind::String).json(",omitempty");
        assert_eq!(field.json_name(), "DisplayName");
        assert!(!field.is_required());
    }

    #[test]
    fn test_array_and_map_kinds() {
        let tags = ModelField::new("Tags", FieldKind::Array(Box::new(FieldKind::String)));
        let meta = ModelField::new("Meta", FieldKind::Map);
        let count = ModelField::new("Count", FieldKind::Uint);

        assert_eq!(
            serde_json::to_value(tags.property_schema()).unwrap(),
            json!({"type": "array", "items": {"type": "string"}, "nullable": false})
        );
        assert_eq!(
            serde_json::to_value(meta.property_schema()).unwrap(),
            json!({"type": "object", "nullable": false})
        );
        assert_eq!(
            serde_json::to_value(count.property_schema()).unwrap(),
            json!({"type": "integer", "nullable": false})
        );
    }

    #[test]
    fn test_validation_rules() {
        let mut website = Schema::of_type(SchemaType::String);
        apply_validation_rules(&mut website, "url");
        assert_eq!(website.format.as_deref(), Some("uri"));

        let mut status = Schema::of_type(SchemaType::String);
        apply_validation_rules(&mut status, "required,oneof=draft published archived");
        assert_eq!(
            status.enum_values,
            Some(vec![
                "draft".to_string(),
                "published".to_string(),
                "archived".to_string()
            ])
        );

        let mut flag = Schema::of_type(SchemaType::Boolean);
        apply_validation_rules(&mut flag, "min=1,oneof=a b");
        assert_eq!(flag, Schema::of_type(SchemaType::Boolean));
    }

    #[test]
    fn test_validation_ignores_invalid_bounds() {
        let mut name = Schema::of_type(SchemaType::String);
        apply_validation_rules(&mut name, "min=abc,max=0,min=-3");
        assert_eq!(name.min_length, None);
        assert_eq!(name.max_length, None);

        let mut price = Schema::of_type(SchemaType::Number);
        apply_validation_rules(&mut price, "min=1,max=999");
        assert_eq!(price.minimum, Some(1));
        assert_eq!(price.maximum, Some(999));
    }

    #[test]
    fn test_omitempty_json_tag() {
        let field = ModelField::new("Email", FieldKind::String)
            .json("email,omitempty")
            .validate("required,email");

        assert_eq!(field.json_name(), "email");
        assert!(!field.is_required());
    }
}
