//! Per-file type and size validation.
//!
//! Pure and synchronous; runs on every file before any transcoding or
//! network work so rejected files never cost bandwidth.

use crate::types::RawFile;

/// Validation errors, naming the file and the violated rule.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{name}: unsupported content type {content_type}")]
    UnsupportedType { name: String, content_type: String },

    #[error("{name}: {size} bytes exceeds the {max_mb} MB limit")]
    TooLarge {
        name: String,
        size: usize,
        max_mb: u32,
    },

    #[error("{name}: empty file")]
    EmptyFile { name: String },
}

/// File validator
///
/// Enforces a content-type allow-list (image formats only) and a per-file
/// size ceiling in megabytes.
pub struct FileValidator {
    allowed_content_types: Vec<String>,
    max_size_mb: u32,
}

impl FileValidator {
    pub fn new(allowed_content_types: Vec<String>, max_size_mb: u32) -> Self {
        Self {
            allowed_content_types,
            max_size_mb,
        }
    }

    pub fn max_size_bytes(&self) -> usize {
        self.max_size_mb as usize * 1024 * 1024
    }

    /// Validate file size against the ceiling.
    ///
    /// Also applied to transcoded output before transfer.
    pub fn validate_size(&self, name: &str, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile {
                name: name.to_string(),
            });
        }
        if size > self.max_size_bytes() {
            return Err(ValidationError::TooLarge {
                name: name.to_string(),
                size,
                max_mb: self.max_size_mb,
            });
        }
        Ok(())
    }

    /// Validate content type against the allow-list.
    pub fn validate_content_type(&self, name: &str, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::UnsupportedType {
                name: name.to_string(),
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Validate all aspects of a file.
    pub fn validate(&self, file: &RawFile) -> Result<(), ValidationError> {
        self.validate_content_type(&file.name, &file.content_type)?;
        self.validate_size(&file.name, file.data.len())?;
        Ok(())
    }
}
