mod disposition;
mod fetcher;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::thread;

use indicatif::ProgressBar;
use thiserror::Error;

use crate::config::RunConfig;

pub use disposition::disposition_filename;
pub use fetcher::UReqFetcher;

#[derive(Debug)]
pub enum Response {
    Ok {
        body: Vec<u8>,
        content_disposition: Option<String>,
    },
    /// Final status outside 2xx, after redirects.
    Status(u16),
    InvalidBody,
    NetworkError(String),
}

impl Response {
    pub fn ok(body: Vec<u8>, content_disposition: Option<String>) -> Self {
        Self::Ok {
            body,
            content_disposition,
        }
    }

    pub fn status(code: u16) -> Self {
        Self::Status(code)
    }

    pub fn invalid_body() -> Self {
        Self::InvalidBody
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::NetworkError(message.into())
    }
}

pub trait FileDownloader {
    fn fetch(&self, url: &str) -> Response;
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("{url} returned HTTP {code}")]
    Status { url: String, code: u16 },

    #[error("could not read response body from {url}")]
    InvalidBody { url: String },

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub id: u64,
    pub source: String,
    pub file: PathBuf,
    pub bytes: usize,
}

impl Download {
    pub fn new(id: u64, source: String, file: PathBuf, bytes: usize) -> Self {
        Self {
            id,
            source,
            file,
            bytes,
        }
    }
}

/// Outcome of a run that went through the whole range.
#[derive(Debug, Default, PartialEq)]
pub struct RunReport {
    pub saved: Vec<Download>,
    /// IDs whose response had no usable Content-Disposition filename.
    pub skipped: Vec<u64>,
}

pub struct Downloader<T: FileDownloader> {
    fetcher: T,
    config: RunConfig,
    progress: ProgressBar,
}

impl<T> Downloader<T>
where
    T: FileDownloader,
{
    pub fn with_fetcher(config: RunConfig, fetcher: T) -> Self {
        Downloader {
            fetcher,
            config,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn url_for(&self, id: u64) -> String {
        self.config.url_for(id)
    }

    /// Fetches one ID and saves the body if the response names a file.
    ///
    /// `Ok(None)` means the response was fine but carried no usable filename.
    pub fn download(&self, id: u64) -> Result<Option<Download>, DownloadError> {
        let url = self.url_for(id);

        tracing::debug!(id, url = %url, "requesting");

        let response = self.fetcher.fetch(&url);

        match response {
            Response::NetworkError(message) => Err(DownloadError::Network { url, message }),
            Response::Status(code) => Err(DownloadError::Status { url, code }),
            Response::InvalidBody => Err(DownloadError::InvalidBody { url }),

            Response::Ok {
                content_disposition: None,
                ..
            } => {
                tracing::debug!(id, "no Content-Disposition header, skipping");
                Ok(None)
            }

            Response::Ok {
                body,
                content_disposition: Some(header),
            } => {
                let Some(filename) = disposition_filename(&header) else {
                    tracing::debug!(id, header = %header, "no filename in Content-Disposition, skipping");
                    return Ok(None);
                };

                let file_path = self.config.output_path(filename);

                fs::write(&file_path, &body).map_err(|source| DownloadError::Write {
                    path: file_path.clone(),
                    source,
                })?;

                tracing::info!(
                    "Successfully accessed and saved {} to {}",
                    filename,
                    self.config.output_dir().display()
                );

                Ok(Some(Download::new(id, url, file_path, body.len())))
            }
        }
    }

    /// Walks the whole range in order, one request per ID, pausing `delay` after each.
    ///
    /// The first error ends the run; files already written stay on disk.
    pub fn run(&self) -> Result<RunReport, DownloadError> {
        let mut report = RunReport::default();

        for id in self.config.range().iter() {
            let outcome = self.download(id);

            self.progress.inc(1);

            match outcome {
                Ok(Some(download)) => report.saved.push(download),
                Ok(None) => report.skipped.push(id),
                Err(e) => {
                    self.progress.abandon();
                    return Err(e);
                }
            }

            thread::sleep(self.config.delay());
        }

        self.progress.finish();

        tracing::debug!(
            saved = report.saved.len(),
            skipped = report.skipped.len(),
            "run finished"
        );

        Ok(report)
    }
}

impl Downloader<UReqFetcher> {
    pub fn new(config: RunConfig) -> Self {
        let fetcher = UReqFetcher::new(config.timeout());
        Downloader::with_fetcher(config, fetcher)
    }
}

#[cfg(test)]
use fetcher::MockFetcher;
