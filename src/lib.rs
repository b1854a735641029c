//! # sitebacker-ips
//!
//! A CLI utility to pull the UltraDNS SiteBacker probe addresses out of the
//! published REST API guide, so firewall allow-lists can be kept in sync
//! without copying them from the PDF by hand.
//!
//! ## Current Features
//!
//! - PDF download over HTTP(S), or reading a local copy
//! - Locating the "IP Probes by Region" table, including tables split over pages
//! - JSON, YAML and CSV output
//!
//! ## Usage
//!
//! ```bash
//! sitebacker-ips --format csv -o probes.csv
//! ```

mod address;
mod error;
mod extractor;
mod fetcher;
mod format;
mod locator;
mod pdf_text;
mod pipeline;
mod record;

pub use address::{contains_address, find_addresses, AddressKind, AddressToken};
pub use error::{ProbeError, Result};
pub use extractor::{normalize_region_name, Extraction, RowExtractor, SkippedLine};
pub use fetcher::{DocumentSource, FetchOptions, Fetcher, DEFAULT_PDF_URL};
pub use format::{render, OutputFormat};
pub use locator::{LocatedTable, LocatorOptions, PageRange, TableLocator, DEFAULT_HEADING};
pub use pdf_text::{extract_pages, PageText, DEFAULT_MAX_PAGES};
pub use pipeline::{Pipeline, PipelineConfig};
pub use record::{ExtractionResult, ProbeRegionRecord};
