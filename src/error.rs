use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for document generation
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors that abort a whole documentation request
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("DTOs directory not found: {}", .0.display())]
    DtoDirectoryNotFound(PathBuf),
    #[error("DTOs path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to read DTOs directory {}: {source}", .path.display())]
    DtoDirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while scanning a single DTO source file.
///
/// The resource loader recovers from these by skipping the file.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },
}

/// Why a resource has no canonical response DTO
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MainDtoError {
    #[error("resource `{0}` has no DTO other than Create/Update variants")]
    Missing(String),
    #[error("resource `{resource}` has several candidate DTOs: {}", .candidates.join(", "))]
    Ambiguous {
        resource: String,
        candidates: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_not_found_message() {
        let err = GeneratorError::DtoDirectoryNotFound(PathBuf::from("/nope/dtos"));
        assert_eq!(err.to_string(), "DTOs directory not found: /nope/dtos");
    }

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let err = MainDtoError::Ambiguous {
            resource: "user".to_string(),
            candidates: vec!["AdminDTO".to_string(), "UserDTO".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "resource `user` has several candidate DTOs: AdminDTO, UserDTO"
        );
    }
}
