//! PDF text extraction for uploaded resumes.
//!
//! Text-layer extraction only; scanned or image-only PDFs come back empty
//! and are rejected. No OCR.

use crate::errors::AppError;

/// Turns a fetched resume blob into plain text.
///
/// Behind a trait so the scoring pipeline can be exercised in tests without
/// real PDF bytes.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, AppError>;
}

pub struct PdfTextExtractor;

impl DocumentExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, AppError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::Extraction(format!("failed to parse resume PDF: {e}")))?;

        if text.trim().is_empty() {
            return Err(AppError::Extraction(
                "resume contains no extractable text".to_string(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail_with_extraction_error() {
        let result = PdfTextExtractor.extract(b"definitely not a pdf");
        match result {
            Err(AppError::Extraction(_)) => {}
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_payload_fails() {
        assert!(PdfTextExtractor.extract(&[]).is_err());
    }
}
