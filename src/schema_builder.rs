use crate::document::{Properties, Schema};
use crate::dto_scanner::StructField;
use crate::type_mapping::map_type;
use log::debug;

/// Field names managed by the backend, never required from clients
pub const SYSTEM_FIELDS: [&str; 5] = ["id", "created_at", "createdAt", "updated_at", "updatedAt"];

/// Whether a resolved JSON name is a system-managed field
pub fn is_system_field(json_name: &str) -> bool {
    SYSTEM_FIELDS.contains(&json_name)
}

/// A typed field that can describe itself as a schema property.
///
/// Implemented by scanned DTO fields and by runtime model fields, so both
/// sources share one object-schema builder.
pub trait FieldSchema {
    /// Property name in the JSON payload
    fn json_name(&self) -> String;

    /// Schema fragment for the property
    fn property_schema(&self) -> Schema;

    /// Whether clients must send the property
    fn is_required(&self) -> bool;

    /// Whether the field is left out of the schema entirely
    fn is_skipped(&self) -> bool {
        false
    }
}

impl FieldSchema for StructField {
    fn json_name(&self) -> String {
        if self.json_tag.is_empty() {
            self.name.to_lowercase()
        } else {
            self.json_tag.clone()
        }
    }

    fn property_schema(&self) -> Schema {
        let (schema_type, format) = map_type(&self.ty);
        Schema {
            format: format.map(str::to_string),
            nullable: Some(self.is_pointer),
            ..Schema::of_type(schema_type)
        }
    }

    fn is_required(&self) -> bool {
        !self.is_pointer && !is_system_field(&self.json_name())
    }
}

/// Builds the ordered `properties` map for a field list.
pub fn build_properties<F: FieldSchema>(fields: &[F]) -> Properties {
    fields
        .iter()
        .filter(|field| !field.is_skipped())
        .map(|field| (field.json_name(), field.property_schema()))
        .collect()
}

/// Names of the required fields in declaration order, `None` when there are
/// none so the `required` key is omitted.
///
/// A JSON name shared by several fields is listed once.
pub fn required_fields<F: FieldSchema>(fields: &[F]) -> Option<Vec<String>> {
    let mut required: Vec<String> = Vec::new();
    for name in fields
        .iter()
        .filter(|field| !field.is_skipped() && field.is_required())
        .map(FieldSchema::json_name)
    {
        if !required.contains(&name) {
            required.push(name);
        }
    }

    if required.is_empty() {
        None
    } else {
        Some(required)
    }
}

/// Builds a complete object schema from a field list.
pub fn build_object_schema<F: FieldSchema>(fields: &[F]) -> Schema {
    let properties = build_properties(fields);
    let required = required_fields(fields);
    debug!(
        "Built object schema with {} properties, {} required",
        properties.len(),
        required.as_ref().map_or(0, Vec::len)
    );

    Schema {
        required,
        ..Schema::object(properties)
    }
}
