//! File payloads for multipart uploads.

use std::path::Path;

use bytes::Bytes;

use olab_core::error::AppError;
use olab_core::result::AppResult;

/// A file read into memory, ready to be posted as multipart form data.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// File name sent with the part.
    pub file_name: String,
    /// Raw file contents.
    pub data: Bytes,
}

impl FileUpload {
    /// Create an upload from in-memory bytes.
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, accepting only the listed extensions
    /// (case-insensitive).
    pub async fn from_path(path: &Path, allowed_extensions: &[&str]) -> AppResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
        {
            return Err(AppError::validation(format!(
                "Unsupported file type '{}'. Expected: {}",
                path.display(),
                allowed_extensions.join(", ")
            )));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::validation(format!("Invalid file name: {}", path.display())))?
            .to_string();

        let data = tokio::fs::read(path).await?;
        Ok(Self::new(file_name, data))
    }

    /// Guess the MIME type from the file name.
    pub fn mime_type(&self) -> &'static str {
        let lower = self.file_name.to_ascii_lowercase();
        if lower.ends_with(".xlsx") {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        } else if lower.ends_with(".csv") {
            "text/csv"
        } else {
            "application/octet-stream"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_wrong_extension() {
        let err = FileUpload::from_path(Path::new("users.csv"), &["xlsx"])
            .await
            .unwrap_err();
        assert_eq!(err.kind, olab_core::error::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_missing_file_is_storage_error() {
        let err = FileUpload::from_path(Path::new("/nonexistent/users.XLSX"), &["xlsx"])
            .await
            .unwrap_err();
        assert_eq!(err.kind, olab_core::error::ErrorKind::Storage);
    }

    #[test]
    fn test_mime_type() {
        let upload = FileUpload::new("Users.XLSX", vec![1u8, 2, 3]);
        assert!(upload.mime_type().contains("spreadsheetml"));
    }
}
