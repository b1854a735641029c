use colored::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{ProbeError, Result};
use crate::extractor::{Extraction, RowExtractor};
use crate::fetcher::{FetchOptions, Fetcher, DEFAULT_PDF_URL};
use crate::format::{render, OutputFormat};
use crate::locator::{LocatedTable, LocatorOptions, TableLocator};
use crate::pdf_text::{extract_pages, PageText, DEFAULT_MAX_PAGES};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// URL or local path of the PDF.
    pub source: String,
    pub format: OutputFormat,
    /// `None` writes to stdout.
    pub output: Option<PathBuf>,
    pub verbose: bool,
    pub max_pages: Option<usize>,
    pub fetch: FetchOptions,
    pub locator: LocatorOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_PDF_URL.to_string(),
            format: OutputFormat::default(),
            output: None,
            verbose: false,
            max_pages: Some(DEFAULT_MAX_PAGES),
            fetch: FetchOptions::default(),
            locator: LocatorOptions::default(),
        }
    }
}

/// Fetch, locate, extract and render, in that order.
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: Fetcher,
    locator: TableLocator,
    extractor: RowExtractor,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let fetcher = Fetcher::new(config.fetch.clone())?;
        let locator = TableLocator::new(config.locator.clone());

        Ok(Self {
            config,
            fetcher,
            locator,
            extractor: RowExtractor::default(),
        })
    }

    /// Runs every stage and writes the rendered output. Nothing is written
    /// unless every stage succeeds.
    pub async fn run(&self) -> Result<()> {
        let extraction = self.extract().await?;
        let rendered = render(&extraction.result, self.config.format)?;

        match &self.config.output {
            Some(path) => write_file(path, &rendered).await?,
            None => write_stdout(&rendered).await?,
        }

        Ok(())
    }

    /// The scan window only limits heading search; explicit pages are
    /// always read.
    fn page_cap(&self) -> Option<usize> {
        match &self.config.locator.pages {
            Some(range) => Some(range.end() as usize),
            None => self.config.max_pages,
        }
    }

    /// Runs every stage up to and including row extraction.
    pub async fn extract(&self) -> Result<Extraction> {
        let data = self.fetcher.fetch(&self.config.source).await?;
        let pages = extract_pages(&data, self.page_cap())?;
        let table = self.locator.locate(&pages)?;

        if self.config.verbose {
            if let Err(e) = write_pages(&mut std::io::stderr().lock(), &pages, &table) {
                warn!("Failed to print page content: {}", e);
            }
        }

        let extraction = self.extractor.extract(&table.text)?;

        if !extraction.skipped.is_empty() {
            warn!(
                "Skipped {} table line(s) that could not be attached to a region",
                extraction.skipped.len()
            );
            for line in &extraction.skipped {
                debug!("Skipped line {}: {:?}", line.line_number, line.text);
            }
        }

        info!(
            "Extracted {} regions with {} addresses",
            extraction.result.len(),
            extraction.result.address_count()
        );

        Ok(extraction)
    }
}

/// Dumps the raw text of the selected pages.
fn write_pages(out: &mut impl Write, pages: &[PageText], table: &LocatedTable) -> io::Result<()> {
    for page in pages.iter().filter(|p| table.pages.contains(&p.number)) {
        writeln!(out, "\n{}", format!("--- PAGE {} CONTENT ---", page.number).yellow())?;
        writeln!(out, "{}", page.text)?;
        writeln!(out, "{}\n", format!("--- END OF PAGE {} CONTENT ---", page.number).yellow())?;
    }
    Ok(())
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    let output_error = |source| ProbeError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(output_error)?;
    }

    fs::write(path, contents).await.map_err(output_error)?;

    info!("Data saved to {}", path.display().to_string().green());
    Ok(())
}

async fn write_stdout(contents: &str) -> Result<()> {
    let output_error = |source| ProbeError::Output {
        path: PathBuf::from("<stdout>"),
        source,
    };

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(contents.as_bytes())
        .await
        .map_err(output_error)?;
    stdout.flush().await.map_err(output_error)
}
