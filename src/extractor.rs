use tracing::debug;

use crate::address::{find_addresses, AddressKind, AddressToken};
use crate::error::{ProbeError, Result};
use crate::record::{ExtractionResult, ProbeRegionRecord};

/// Lines containing any of these (case-insensitive) are table chrome:
/// headings, column titles and page furniture.
pub const DEFAULT_EXCLUDED_TERMS: &[&str] = &[
    "ip probes by region",
    "available",
    "ipv4",
    "ipv6",
    "region",
    "table",
    "page",
    "ultradns",
    "confidential",
];

/// Characters that never appear in a region name but do in code samples.
const MARKUP_CHARS: &[char] = &['{', '}', '[', ']', '"', '<', '>', '=', ';'];

/// A line the extractor could not use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub skipped: Vec<SkippedLine>,
}

/// Replaces en/em dashes with `-` and collapses whitespace runs.
pub fn normalize_region_name(name: &str) -> String {
    name.replace(['\u{2013}', '\u{2014}'], "-")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct RowExtractor {
    excluded: Vec<String>,
}

impl Default for RowExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_TERMS.iter().copied())
    }
}

impl RowExtractor {
    pub fn new<'a>(excluded: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            excluded: excluded.into_iter().map(str::to_lowercase).collect(),
        }
    }

    fn is_excluded(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.excluded.iter().any(|term| lower.contains(term.as_str()))
    }

    fn region_name(&self, text: &str) -> Option<String> {
        let name = normalize_region_name(text.trim_end_matches([':', ',', '|']));
        let starts_with_digit = name.chars().next().is_some_and(|c| c.is_ascii_digit());
        let has_markup = name.contains(MARKUP_CHARS);
        if name.chars().count() > 1 && !starts_with_digit && !has_markup && !self.is_excluded(&name) {
            Some(name)
        } else {
            None
        }
    }

    /// Whether `text` opens with a table row: an address line, or a region
    /// name directly followed by an address line. Chrome lines are ignored.
    pub fn starts_with_row(&self, text: &str) -> bool {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !self.is_excluded(line));

        let Some(first) = lines.next() else {
            return false;
        };
        if !find_addresses(first).is_empty() {
            return true;
        }

        self.region_name(first).is_some()
            && lines.next().is_some_and(|next| !find_addresses(next).is_empty())
    }

    /// Groups table lines into region records.
    ///
    /// A region name opens a record at its first address. Addresses are kept
    /// verbatim and in order. Fails only when no record comes out.
    pub fn extract(&self, text: &str) -> Result<Extraction> {
        let mut records: Vec<ProbeRegionRecord> = Vec::new();
        let mut skipped = Vec::new();
        let mut pending: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let skip = |skipped: &mut Vec<SkippedLine>| {
                skipped.push(SkippedLine {
                    line_number: index + 1,
                    text: line.to_string(),
                })
            };

            let tokens = find_addresses(line);
            if self.is_excluded(line) {
                // Chrome is dropped quietly unless it takes addresses with it.
                if !tokens.is_empty() {
                    skip(&mut skipped);
                }
                continue;
            }

            let Some(first) = tokens.first() else {
                match self.region_name(line) {
                    Some(name) => pending = Some(name),
                    None => skip(&mut skipped),
                }
                continue;
            };

            let prefix = line[..first.start].trim();
            if !prefix.is_empty() {
                let Some(name) = self.region_name(prefix) else {
                    skip(&mut skipped);
                    continue;
                };
                pending = Some(name);
            }

            let Some(region) = pending.take() else {
                // Still attached to the record opened by an earlier line.
                let Some(record) = records.last_mut() else {
                    skip(&mut skipped);
                    continue;
                };
                push_tokens(record, &tokens);
                continue;
            };

            let mut record = ProbeRegionRecord::new(region);
            push_tokens(&mut record, &tokens);
            debug!("Started region '{}' at line {}", record.region, index + 1);
            records.push(record);
        }

        if records.is_empty() {
            return Err(ProbeError::Parse);
        }

        Ok(Extraction {
            result: ExtractionResult::new(records),
            skipped,
        })
    }
}

fn push_tokens(record: &mut ProbeRegionRecord, tokens: &[AddressToken<'_>]) {
    for token in tokens {
        match token.kind {
            AddressKind::V4 => record.ipv4.push(token.text.to_string()),
            AddressKind::V6 => record.ipv6.push(token.text.to_string()),
        }
    }
}
