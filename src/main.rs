use anyhow::Result;
use clap::Parser;
use colored::*;
use sitebacker_ips::{
    FetchOptions, LocatorOptions, OutputFormat, PageRange, Pipeline, PipelineConfig,
    DEFAULT_HEADING, DEFAULT_MAX_PAGES, DEFAULT_PDF_URL,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sitebacker-ips")]
#[command(about = "Extract UltraDNS SiteBacker probe IPs from the published PDF guide")]
#[command(version = "0.1.0")]
struct Args {
    /// URL (or local path) of the PDF
    #[arg(long, default_value = DEFAULT_PDF_URL)]
    url: String,

    /// Output file path (prints to stdout when omitted)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Output format: json, csv or yaml
    #[arg(short = 'f', long = "format", default_value = "json", value_parser = parse_format)]
    format: OutputFormat,

    /// Print the raw text of the table pages and debug logs
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Heading that marks the start of the table
    #[arg(long, default_value = DEFAULT_HEADING)]
    heading: String,

    /// Heading that marks the end of the table
    #[arg(long = "end-heading")]
    end_heading: Option<String>,

    /// Use these pages instead of searching for the heading (e.g. 202-203)
    #[arg(long)]
    pages: Option<PageRange>,

    /// Only scan the first N pages of the document
    #[arg(long = "max-pages", default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Request timeout in seconds (HTTP client default when omitted)
    #[arg(short = 't', long = "timeout", value_parser = parse_timeout)]
    timeout: Option<f64>,
}

fn parse_timeout(s: &str) -> Result<f64, String> {
    let value = s.parse::<f64>().map_err(|_| "Not a number.")?;
    if value < 0.0 || !value.is_finite() {
        return Err("Must be zero or positive number.".to_string());
    }
    Ok(value)
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

impl Args {
    fn into_config(self) -> PipelineConfig {
        PipelineConfig {
            source: self.url,
            format: self.format,
            output: self.output,
            verbose: self.verbose,
            max_pages: Some(self.max_pages),
            fetch: FetchOptions {
                timeout: self.timeout.map(Duration::from_secs_f64),
            },
            locator: LocatorOptions {
                heading: self.heading,
                end_heading: self.end_heading,
                pages: self.pages,
            },
        }
    }
}

/// Logs go to stderr so stdout only carries the extracted data.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("sitebacker_ips={}", level).parse()?);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("{}", format!("Error: failed to set up logging: {}", e).red());
        process::exit(1);
    }

    let result = match Pipeline::new(args.into_config()) {
        Ok(pipeline) => pipeline.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        process::exit(1);
    }
}
