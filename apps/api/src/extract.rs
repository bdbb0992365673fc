//! PDF → plain-text adapter. The engine itself only ever sees text.

use tracing::debug;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Extracts the text layer of an uploaded PDF.
///
/// CPU-bound: callers on the async runtime should run it via `spawn_blocking`.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::Extraction(
            "uploaded file is not a PDF document".to_string(),
        ));
    }

    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("failed to read PDF text: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::Extraction(
            "PDF contains no extractable text (scanned image?)".to_string(),
        ));
    }

    debug!(bytes = bytes.len(), chars = text.len(), "extracted PDF text");
    Ok(text)
}
