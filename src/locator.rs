use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::address::contains_address;
use crate::error::{ProbeError, Result};
use crate::extractor::RowExtractor;
use crate::pdf_text::PageText;

pub const DEFAULT_HEADING: &str = "IP Probes by Region";

/// Tried in order after the configured heading.
pub const FALLBACK_HEADINGS: &[&str] = &["Probes by Region"];

/// 1-based inclusive page selection, e.g. `202-203` or `202`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange(RangeInclusive<u32>);

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self(start..=end)
    }

    pub fn contains(&self, page: u32) -> bool {
        self.0.contains(&page)
    }

    pub fn end(&self) -> u32 {
        *self.0.end()
    }
}

impl FromStr for PageRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse_page = |part: &str| -> std::result::Result<u32, String> {
            let page = part
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a page number.", part.trim()))?;
            if page == 0 {
                return Err("Page numbers start at 1.".to_string());
            }
            Ok(page)
        };

        let (start, end) = match s.split_once('-') {
            Some((start, end)) => (parse_page(start)?, parse_page(end)?),
            None => {
                let page = parse_page(s)?;
                (page, page)
            }
        };

        if end < start {
            return Err(format!("Range end {} is before start {}.", end, start));
        }
        Ok(Self::new(start, end))
    }
}

#[derive(Debug, Clone)]
pub struct LocatorOptions {
    pub heading: String,
    pub end_heading: Option<String>,
    /// Skips heading search when set.
    pub pages: Option<PageRange>,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            end_heading: None,
            pages: None,
        }
    }
}

/// Text of the pages that make up the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedTable {
    pub pages: Vec<u32>,
    pub text: String,
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    // Lowercasing can change byte lengths outside ASCII; match on ASCII folds only.
    let haystack = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    haystack.find(&needle)
}

pub struct TableLocator {
    options: LocatorOptions,
    rows: RowExtractor,
}

impl TableLocator {
    pub fn new(options: LocatorOptions) -> Self {
        Self {
            options,
            rows: RowExtractor::default(),
        }
    }

    pub fn locate(&self, pages: &[PageText]) -> Result<LocatedTable> {
        match &self.options.pages {
            Some(range) => self.select_range(pages, range),
            None => self.search(pages),
        }
    }

    fn headings(&self) -> Vec<&str> {
        let mut headings = vec![self.options.heading.as_str()];
        for fallback in FALLBACK_HEADINGS {
            if !headings.iter().any(|h| h.eq_ignore_ascii_case(fallback)) {
                headings.push(fallback);
            }
        }
        headings
    }

    fn search(&self, pages: &[PageText]) -> Result<LocatedTable> {
        let headings = self.headings();
        let mut fallback: Option<LocatedTable> = None;

        for heading in &headings {
            let matches: Vec<(usize, usize)> = pages
                .iter()
                .enumerate()
                .filter_map(|(index, page)| {
                    find_ignore_case(&page.text, heading).map(|offset| (index, offset))
                })
                .collect();

            if matches.is_empty() {
                debug!("Heading '{}' not found", heading);
                continue;
            }

            // Contents pages and cross references mention the heading too;
            // the table is the first match that carries addresses.
            for &(index, offset) in &matches {
                info!("Found '{}' on page {}", heading, pages[index].number);
                let table = self.collect_from(pages, index, offset, heading.len());
                if contains_address(&table.text) {
                    info!("Table spans pages {:?}", table.pages);
                    return Ok(table);
                }
                debug!("No addresses after the heading on page {}", pages[index].number);
                fallback.get_or_insert(table);
            }
        }

        fallback.ok_or_else(|| ProbeError::TableNotFound {
            tried: headings
                .iter()
                .map(|h| format!("'{}'", h))
                .collect::<Vec<_>>()
                .join(" or "),
        })
    }

    /// Takes the heading page from the heading on, plus every following page
    /// that opens with a table row.
    fn collect_from(
        &self,
        pages: &[PageText],
        start: usize,
        heading_offset: usize,
        heading_len: usize,
    ) -> LocatedTable {
        let mut table = LocatedTable {
            pages: Vec::new(),
            text: String::new(),
        };

        for (index, page) in pages.iter().enumerate().skip(start) {
            let (mut text, search_from) = if index == start {
                (&page.text[heading_offset..], heading_len)
            } else {
                (page.text.as_str(), 0)
            };
            let mut ended = false;

            if let Some(end_heading) = &self.options.end_heading {
                let search_from = search_from.min(text.len());
                if let Some(pos) = find_ignore_case(&text[search_from..], end_heading) {
                    debug!("End heading '{}' found on page {}", end_heading, page.number);
                    text = &text[..search_from + pos];
                    ended = true;
                }
            }

            if index > start && !self.rows.starts_with_row(text) {
                debug!("Page {} does not open with a table row, table ends", page.number);
                break;
            }

            table.pages.push(page.number);
            table.text.push_str(text);
            if !table.text.ends_with('\n') {
                table.text.push('\n');
            }

            if ended {
                break;
            }
        }

        table
    }

    fn select_range(&self, pages: &[PageText], range: &PageRange) -> Result<LocatedTable> {
        let mut table = LocatedTable {
            pages: Vec::new(),
            text: String::new(),
        };

        for number in range.0.clone() {
            match pages.iter().find(|page| page.number == number) {
                Some(page) => {
                    table.pages.push(number);
                    table.text.push_str(&page.text);
                    if !table.text.ends_with('\n') {
                        table.text.push('\n');
                    }
                }
                None => warn!("Page {} does not exist in the PDF", number),
            }
        }

        if table.pages.is_empty() {
            return Err(ProbeError::TableNotFound {
                tried: format!("pages {}-{}", range.0.start(), range.0.end()),
            });
        }

        info!("Using pages {:?}", table.pages);
        Ok(table)
    }
}
