//! Artwork upload validation and preview rendering
//!
//! Validation trusts the content type the client reports; bytes are never
//! sniffed. Only images get a preview, and rendering it is a separate step
//! so the caller can run it off the request path.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub const MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;
pub static ACCEPTED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/jpg", "application/pdf"];

/// A file as picked by the user: reported name, size and type, plus the
/// content when the client sent it along.
#[derive(Clone, Debug)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub content: Option<Arc<[u8]>>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, size: u64, content_type: impl Into<String>) -> Self {
        Self { name: name.into(), size, content_type: content_type.into(), content: None }
    }

    pub fn with_content(mut self, bytes: Vec<u8>) -> Self {
        self.content = Some(Arc::from(bytes));
        self
    }

    pub fn is_image(&self) -> bool { self.content_type.starts_with("image/") }

    /// Size in mebibytes with two decimals, e.g. `"10.00 MB"`.
    pub fn display_size(&self) -> String {
        format!("{:.2} MB", self.size as f64 / 1024.0 / 1024.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UploadRejection {
    UnsupportedType { content_type: String },
    TooLarge { size: u64, limit: u64 },
}

impl UploadRejection {
    pub fn title(&self) -> &'static str {
        match self { Self::UnsupportedType { .. } => "Unsupported file format", Self::TooLarge { .. } => "File is too large" }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "Upload an image (JPG, PNG) or a PDF",
            Self::TooLarge { .. } => "Maximum file size is 50 MB",
        }
    }
}

impl std::error::Error for UploadRejection {}
impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType { content_type } => write!(f, "unsupported content type {content_type:?}"),
            Self::TooLarge { size, limit } => write!(f, "file is {size} bytes, limit is {limit}"),
        }
    }
}

/// Type is checked before size, so an oversized `.exe` reports the type.
pub fn validate(file: &FileHandle) -> Result<(), UploadRejection> {
    if !ACCEPTED_TYPES.contains(&file.content_type.as_str()) {
        return Err(UploadRejection::UnsupportedType { content_type: file.content_type.clone() });
    }
    if file.size > MAX_FILE_BYTES {
        return Err(UploadRejection::TooLarge { size: file.size, limit: MAX_FILE_BYTES });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewError { NotAnImage, NoContent }
impl std::error::Error for PreviewError {}
impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::NotAnImage => write!(f, "Not an image"), Self::NoContent => write!(f, "No content to preview") }
    }
}

/// Builds a `data:` URL for an image. CPU-bound on large files.
pub fn render_preview(content_type: &str, content: Option<&[u8]>) -> Result<String, PreviewError> {
    if !content_type.starts_with("image/") { return Err(PreviewError::NotAnImage); }
    let bytes = content.filter(|b| !b.is_empty()).ok_or(PreviewError::NoContent)?;
    Ok(format!("data:{};base64,{}", content_type, STANDARD.encode(bytes)))
}
