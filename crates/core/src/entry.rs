use serde::{Deserialize, Serialize};

/// One immediate child of a listed virtual folder.
///
/// Entries are built per request and never persisted. Within one listing,
/// folder names are unique (the classifier deduplicates them) and file names
/// are unique (object keys are).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Entry {
    /// Name of the child relative to the listed folder. A single path
    /// segment, never containing `/`.
    #[cfg_attr(feature = "openapi", schema(example = "invoice.pdf"))]
    pub relative_path: String,
    /// Whether the child is a folder.
    pub is_folder: bool,
    /// Signed download link for files, navigation link for folders.
    pub url: String,
    /// Object size in bytes. Always `0` for folders.
    #[cfg_attr(feature = "openapi", schema(example = 1024))]
    pub file_size: u64,
}

impl Entry {
    /// Build a folder entry.
    pub fn folder(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            relative_path: name.into(),
            is_folder: true,
            url: url.into(),
            file_size: 0,
        }
    }

    /// Build a file entry.
    pub fn file(name: impl Into<String>, url: impl Into<String>, file_size: u64) -> Self {
        Self {
            relative_path: name.into(),
            is_folder: false,
            url: url.into(),
            file_size,
        }
    }
}
