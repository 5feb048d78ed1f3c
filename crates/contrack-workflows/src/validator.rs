//! Upload candidate validation.
//!
//! Runs before any network call; a rejected file never reaches the store.

/// Validation errors for contract documents
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("file too large: {size} bytes exceeds the {}MB limit", .max / (1024 * 1024))]
    FileTooLarge { size: usize, max: usize },

    #[error("unsupported file type: {content_type} (allowed: {allowed:?})")]
    UnsupportedContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("empty file")]
    EmptyFile,
}

/// Content types the extraction service accepts: PDFs and common images.
/// `image/jpg` is not a registered type but browsers emit it, so the store
/// accepts it too.
const DOCUMENT_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Contract document validator
///
/// Checks content type and size without coupling to how the bytes were
/// obtained (disk, drag-and-drop, test fixture).
pub struct DocumentValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl Default for DocumentValidator {
    fn default() -> Self {
        Self::new(
            MAX_DOCUMENT_BYTES,
            DOCUMENT_CONTENT_TYPES
                .iter()
                .map(|ct| ct.to_string())
                .collect(),
        )
    }
}

impl DocumentValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::UnsupportedContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate a candidate before uploading it.
    pub fn validate(&self, content_type: &str, file_size: usize) -> Result<(), ValidationError> {
        self.validate_content_type(content_type)?;
        self.validate_file_size(file_size)?;
        Ok(())
    }
}

/// Content type for a file name's extension, for callers that only have a
/// path (the CLI). Unknown extensions return None and fail validation with
/// whatever type the caller substitutes.
pub fn content_type_for_extension(file_name: &str) -> Option<&'static str> {
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())?;

    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
