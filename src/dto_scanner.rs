use crate::error::ScanError;
use crate::tags::{attribute_has_flag, attribute_tag};
use log::debug;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use syn::ext::IdentExt;

/// Name suffix that marks a struct as a DTO candidate
pub const DTO_SUFFIX: &str = "DTO";

/// Rendered name for the open-ended `serde_json::Value` type
pub const ANY_TYPE: &str = "Value";

/// Rendered name for string-keyed map types
pub const MAP_TYPE: &str = "HashMap<String, Value>";

/// One named field of a DTO, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Field identifier as written in the source
    pub name: String,
    /// Normalized type name with any `Option<..>` wrapper removed
    pub ty: String,
    /// Wire name from `#[serde(rename = "..")]`
    pub json_tag: String,
    /// Column name from `#[sqlx(rename = "..")]`
    pub db_tag: String,
    /// Value of `#[dto(scope = "..")]`
    pub dto_tag: String,
    /// Whether the field type was wrapped in `Option`
    pub is_pointer: bool,
}

/// A struct recognized as a DTO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtoSchema {
    pub name: String,
    pub fields: Vec<StructField>,
}

/// Scans one Rust source file and returns its DTOs keyed by type name.
///
/// The file is parsed but never compiled. A read or syntax error fails the
/// whole file; no partial result is returned.
pub fn extract_dtos_from_file(path: &Path) -> Result<BTreeMap<String, DtoSchema>, ScanError> {
    debug!("Scanning DTO file: {}", path.display());

    let content = fs::read_to_string(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let dtos = extract_dtos_from_source(&content).map_err(|source| ScanError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Found {} DTOs in {}", dtos.len(), path.display());
    Ok(dtos)
}

/// Same as [`extract_dtos_from_file`] for in-memory source text.
pub fn extract_dtos_from_source(source: &str) -> syn::Result<BTreeMap<String, DtoSchema>> {
    let syntax_tree = syn::parse_file(source)?;
    let mut dtos = BTreeMap::new();

    for item in &syntax_tree.items {
        let syn::Item::Struct(item_struct) = item else {
            continue;
        };

        let name = item_struct.ident.unraw().to_string();
        if !name.ends_with(DTO_SUFFIX) {
            continue;
        }

        let fields = extract_struct_fields(&item_struct.fields);
        debug!("DTO {} has {} fields", name, fields.len());
        dtos.insert(name.clone(), DtoSchema { name, fields });
    }

    Ok(dtos)
}

/// Collects named fields in order.
///
/// Tuple fields and `#[serde(flatten)]` fields are the embedding forms and
/// contribute nothing.
fn extract_struct_fields(fields: &syn::Fields) -> Vec<StructField> {
    let syn::Fields::Named(named) = fields else {
        return Vec::new();
    };

    named
        .named
        .iter()
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            if attribute_has_flag(&field.attrs, "serde", "flatten") {
                debug!("Skipping flattened field: {}", ident);
                return None;
            }

            let (ty, is_pointer) = resolve_field_type(&field.ty);
            let json_tag = attribute_tag(&field.attrs, "serde", "rename");
            let json_tag = json_tag.split(',').next().unwrap_or_default().to_string();

            Some(StructField {
                name: ident.unraw().to_string(),
                ty,
                json_tag,
                db_tag: attribute_tag(&field.attrs, "sqlx", "rename"),
                dto_tag: attribute_tag(&field.attrs, "dto", "scope"),
                is_pointer,
            })
        })
        .collect()
}

/// Renders a field type, unwrapping one level of `Option`.
fn resolve_field_type(ty: &syn::Type) -> (String, bool) {
    match option_inner(ty) {
        Some(inner) => (render_type(inner), true),
        None => (render_type(ty), false),
    }
}

fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    first_type_argument(segment)
}

fn first_type_argument(segment: &syn::PathSegment) -> Option<&syn::Type> {
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        syn::GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn render_type(ty: &syn::Type) -> String {
    match ty {
        syn::Type::Path(type_path) if type_path.qself.is_none() => render_path(&type_path.path),
        syn::Type::Group(group) => render_type(&group.elem),
        _ => String::new(),
    }
}

fn render_path(path: &syn::Path) -> String {
    let Some(last) = path.segments.last() else {
        return String::new();
    };
    let idents: Vec<String> = path
        .segments
        .iter()
        .map(|segment| segment.ident.unraw().to_string())
        .collect();

    if last.ident == "Value" && (idents.len() == 1 || idents == ["serde_json", "Value"]) {
        return ANY_TYPE.to_string();
    }

    if last.ident == "HashMap" || last.ident == "BTreeMap" {
        let string_keyed = matches!(
            first_type_argument(last),
            Some(syn::Type::Path(key)) if key.path.is_ident("String")
        );
        return if string_keyed {
            MAP_TYPE.to_string()
        } else {
            String::new()
        };
    }

    idents.join("::")
}
