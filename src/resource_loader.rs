use crate::dto_scanner::{extract_dtos_from_file, DtoSchema};
use crate::error::{GeneratorError, MainDtoError, Result};
use crate::naming::pluralize;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// Extension of the source files scanned for DTOs
pub const SOURCE_EXTENSION: &str = "rs";

/// All DTOs declared in one source file, grouped under the file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDtos {
    /// Resource name derived from the file stem (e.g. `user`)
    pub name: String,
    /// Naive plural of `name`, used as the collection path segment
    pub plural_name: String,
    /// DTOs keyed by type name
    pub dtos: BTreeMap<String, DtoSchema>,
}

impl ResourceDtos {
    /// Returns the DTO describing the canonical response shape.
    ///
    /// Exactly one DTO whose name mentions neither `Create` nor `Update` must
    /// exist; anything else is reported instead of guessed.
    pub fn main_dto(&self) -> std::result::Result<&DtoSchema, MainDtoError> {
        let mut candidates = self
            .dtos
            .values()
            .filter(|dto| !dto.name.contains("Create") && !dto.name.contains("Update"));

        match (candidates.next(), candidates.next()) {
            (Some(dto), None) => Ok(dto),
            (None, _) => Err(MainDtoError::Missing(self.name.clone())),
            (Some(first), Some(second)) => {
                let mut names = vec![first.name.clone(), second.name.clone()];
                names.extend(candidates.map(|dto| dto.name.clone()));
                Err(MainDtoError::Ambiguous {
                    resource: self.name.clone(),
                    candidates: names,
                })
            }
        }
    }
}

/// Loads every DTO resource found directly inside `dtos_dir`.
///
/// Only `.rs` files are considered, subdirectories are not descended into.
/// A file that fails to parse or declares no DTO is skipped so one broken
/// file does not hide the rest.
///
/// # Errors
///
/// Returns an error if the directory does not exist, is not a directory,
/// or cannot be listed.
pub fn load_resource_dtos(dtos_dir: &Path) -> Result<BTreeMap<String, ResourceDtos>> {
    if !dtos_dir.exists() {
        return Err(GeneratorError::DtoDirectoryNotFound(dtos_dir.to_path_buf()));
    }
    if !dtos_dir.is_dir() {
        return Err(GeneratorError::NotADirectory(dtos_dir.to_path_buf()));
    }

    debug!("Loading DTO resources from {}", dtos_dir.display());
    let mut resources = BTreeMap::new();

    for entry in WalkDir::new(dtos_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| GeneratorError::DtoDirectoryUnreadable {
            path: dtos_dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|s| s.to_str()) != Some(SOURCE_EXTENSION)
        {
            continue;
        }

        let Some(resource_name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let dtos = match extract_dtos_from_file(path) {
            Ok(dtos) => dtos,
            Err(e) => {
                warn!("Skipping DTO file: {}", e);
                continue;
            }
        };

        if dtos.is_empty() {
            debug!("No DTOs in {}, skipping", path.display());
            continue;
        }

        resources.insert(
            resource_name.to_string(),
            ResourceDtos {
                name: resource_name.to_string(),
                plural_name: pluralize(resource_name),
                dtos,
            },
        );
    }

    debug!("Loaded {} DTO resources", resources.len());
    Ok(resources)
}
