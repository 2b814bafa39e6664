//! Image ingestion
//!
//! A user-selected image file is embedded as a base64 `data:` URL and,
//! optionally, passed through an external text-extraction (OCR) step so its
//! text can accompany the turn. Both steps are opaque collaborators.

use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// An image payload attached to a user message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// `data:` URL embedding the image bytes
    pub data_url: String,
    /// Text extracted from the image, if an extractor ran
    pub extracted_text: Option<String>,
    /// Original file name, for display
    pub file_name: String,
}

impl ImageAttachment {
    /// Text sent to the backend as `image_text`
    pub fn image_text(&self) -> &str {
        self.extracted_text.as_deref().unwrap_or("")
    }
}

/// External OCR capability
pub trait TextExtractor: Send {
    /// Extract text from raw image bytes
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Read an image file into an attachment, running OCR when available
pub fn ingest_image(path: &Path, ocr: Option<&dyn TextExtractor>) -> Result<ImageAttachment> {
    let bytes = std::fs::read(path)?;
    let mime = mime_for_extension(path);

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let extracted_text = match ocr {
        Some(extractor) => match extractor.extract(&bytes) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            // OCR is best-effort; the image still goes through without text
            Err(e) => {
                debug!("Text extraction failed for {}: {}", file_name, e);
                None
            }
        },
        None => None,
    };

    let data_url = format!("data:{};base64,{}", mime, STANDARD.encode(&bytes));
    debug!("Ingested image {} ({} bytes)", file_name, bytes.len());

    Ok(ImageAttachment {
        data_url,
        extracted_text,
        file_name,
    })
}

/// Map a file extension to a mime type
fn mime_for_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Validate that a path looks like a supported image before ingesting
pub fn is_supported_image(path: &Path) -> bool {
    mime_for_extension(path) != "application/octet-stream"
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedExtractor(&'static str);

    impl TextExtractor for FixedExtractor {
        fn extract(&self, _bytes: &[u8]) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_ingest_builds_data_url() {
        let dir = std::env::temp_dir();
        let path = dir.join("parley_test_image.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let attachment = ingest_image(&path, None).unwrap();
        assert!(attachment.data_url.starts_with("data:image/png;base64,"));
        assert_eq!(attachment.file_name, "parley_test_image.png");
        assert!(attachment.extracted_text.is_none());
        assert_eq!(attachment.image_text(), "");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_ingest_runs_extractor() {
        let dir = std::env::temp_dir();
        let path = dir.join("parley_test_ocr.jpg");
        std::fs::write(&path, b"jpeg bytes").unwrap();

        let attachment = ingest_image(&path, Some(&FixedExtractor("extracted words"))).unwrap();
        assert_eq!(attachment.image_text(), "extracted words");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("a.PNG")));
        assert!(is_supported_image(Path::new("a.jpeg")));
        assert!(!is_supported_image(Path::new("a.txt")));
        assert!(!is_supported_image(Path::new("noext")));
    }
}
