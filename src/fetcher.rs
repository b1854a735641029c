use colored::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

use crate::error::{ProbeError, Result};

/// Published location of the UltraDNS REST API guide.
pub const DEFAULT_PDF_URL: &str =
    "https://ultra-portalstatic.ultradns.com/static/console/docs/REST-API_User_Guide.pdf";

#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

/// Where the document bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Http(Url),
    File(PathBuf),
}

impl DocumentSource {
    /// Accepts http(s) URLs, `file://` URLs and bare paths.
    pub fn parse(input: &str) -> Result<Self> {
        match Url::parse(input) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self::Http(url)),
                "file" => url
                    .to_file_path()
                    .map(Self::File)
                    .map_err(|_| ProbeError::fetch(input, "invalid file URL")),
                // Windows drive letters parse as a one-letter scheme.
                scheme if scheme.len() == 1 => Ok(Self::File(PathBuf::from(input))),
                scheme => Err(ProbeError::fetch(
                    input,
                    format!("unsupported URL scheme '{}'", scheme),
                )),
            },
            Err(_) => Ok(Self::File(PathBuf::from(input))),
        }
    }
}

pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ProbeError::fetch("http client", e))?;

        Ok(Self { client })
    }

    /// Fetches the raw document bytes. One request, no retry.
    pub async fn fetch(&self, input: &str) -> Result<Vec<u8>> {
        match DocumentSource::parse(input)? {
            DocumentSource::Http(url) => self.fetch_http(&url).await,
            DocumentSource::File(path) => Self::read_file(&path).await,
        }
    }

    async fn fetch_http(&self, url: &Url) -> Result<Vec<u8>> {
        info!("Downloading PDF from \"{}\"", url.as_str().green());

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ProbeError::fetch(url.as_str(), e))?;

        let status = response.status();
        debug!("Server answered {}", status);

        if !status.is_success() {
            return Err(ProbeError::fetch(
                url.as_str(),
                format!("HTTP status {}", status),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProbeError::fetch(url.as_str(), e))?;

        info!("Download complete ({} bytes)", body.len());
        Ok(body.to_vec())
    }

    async fn read_file(path: &Path) -> Result<Vec<u8>> {
        info!("Reading PDF from \"{}\"", path.display().to_string().blue());

        let data = fs::read(path)
            .await
            .map_err(|e| ProbeError::fetch(path.display().to_string(), e))?;

        debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(data)
    }
}
