use lopdf::Document;
use tracing::{debug, warn};

use crate::error::{ProbeError, Result};

/// Pages scanned when no cap is given.
pub const DEFAULT_MAX_PAGES: usize = 300;

/// Extracted text of one PDF page. `number` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

impl PageText {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Loads a PDF from memory and returns the text of its pages in order.
///
/// Pages whose content cannot be decoded come back empty instead of failing
/// the whole document.
pub fn extract_pages(data: &[u8], max_pages: Option<usize>) -> Result<Vec<PageText>> {
    let document = Document::load_mem(data).map_err(|e| ProbeError::Pdf(e.to_string()))?;

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    debug!("Loaded PDF with {} pages", page_numbers.len());

    let limit = max_pages.unwrap_or(page_numbers.len());
    if limit < page_numbers.len() {
        debug!("Only scanning the first {} pages", limit);
    }

    let pages = page_numbers
        .into_iter()
        .take(limit)
        .map(|number| {
            let text = document.extract_text(&[number]).unwrap_or_else(|e| {
                warn!("Failed to extract text from page {}: {}", number, e);
                String::new()
            });
            PageText::new(number, text)
        })
        .collect();

    Ok(pages)
}
