// src/extract.rs

use crate::error::IngestError;
use lopdf::{Dictionary, Document};
use tracing::{info, warn};

/// Minimum number of non-whitespace characters we expect from a report
/// PDF with a real text layer. Below this we treat it as scanned.
const MIN_TEXT_CHARS: usize = 30;

/// Turn uploaded report bytes into plain text.
///
/// Scanned (image-only) documents and unparsable input both surface as
/// extraction failures — this crate does no OCR, and the decoder must
/// never run against an empty text layer.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, IngestError> {
    let doc = Document::load_mem(pdf_bytes)
        .map_err(|e| IngestError::Extraction(format!("failed to parse PDF: {e}")))?;

    if looks_like_scanned(&doc) {
        info!("PDF structural check: likely scanned / image-only");
        return Err(IngestError::Extraction(
            "document appears to be scanned; no text layer to read".to_string(),
        ));
    }

    let text = pdf_extract::extract_text_from_mem(pdf_bytes).map_err(|e| {
        warn!(error = %e, "pdf-extract failed — may be scanned or corrupted");
        IngestError::Extraction(format!("text extraction failed: {e}"))
    })?;

    let meaningful = text.chars().filter(|c| !c.is_whitespace()).count();
    if meaningful < MIN_TEXT_CHARS {
        info!(chars = meaningful, "Extracted text too short — treating as scanned");
        return Err(IngestError::Extraction(
            "document text layer is effectively empty".to_string(),
        ));
    }

    info!(chars = meaningful, "Text extracted successfully");
    Ok(text)
}

/// Look up a named resource dictionary on a page and report whether it
/// has any entries.
fn has_resource(doc: &Document, page: &Dictionary, kind: &[u8]) -> bool {
    page.get(b"Resources")
        .ok()
        .and_then(|r| doc.dereference(r).ok())
        .and_then(|(_, resolved)| resolved.as_dict().ok())
        .and_then(|res| res.get(kind).ok())
        .and_then(|entry| doc.dereference(entry).ok())
        .and_then(|(_, resolved)| resolved.as_dict().ok())
        .is_some_and(|dict| !dict.is_empty())
}

/// Inspect the object tree for pages that carry XObject images but no
/// Font resources — the signature of a scan. If at least 80% of pages
/// look like that, the whole document is treated as scanned.
fn looks_like_scanned(doc: &Document) -> bool {
    let pages = doc.get_pages();
    if pages.is_empty() {
        return false; // can't tell, let text extraction try
    }

    let image_only = pages
        .values()
        .filter_map(|&object_id| doc.get_object(object_id).ok())
        .filter_map(|obj| obj.as_dict().ok())
        .filter(|page| has_resource(doc, page, b"XObject") && !has_resource(doc, page, b"Font"))
        .count();

    let ratio = image_only as f64 / pages.len() as f64;
    info!(
        total_pages = pages.len(),
        image_only,
        ratio = format!("{ratio:.2}"),
        "Scanned-page analysis"
    );
    ratio >= 0.8
}
