use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::id_range::IdRange;

/// Placeholder replaced by the file ID in a base URL template.
pub const ID_PLACEHOLDER: &str = "{id}";

pub const DEFAULT_DELAY_SECS: f64 = 1.0;

pub const DEFAULT_STEP: u64 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ID range step must be greater than zero")]
    ZeroStep,

    #[error("ID range {start}..{stop} is empty")]
    EmptyRange { start: u64, stop: u64 },

    #[error("missing required setting `{0}`")]
    MissingField(&'static str),

    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("`{field}` must be a finite, non-negative number of seconds, got {value}")]
    InvalidDuration { field: &'static str, value: f64 },

    #[error("output directory {} does not exist", .0.display())]
    OutputDirMissing(PathBuf),

    #[error("output path {} is not a directory", .0.display())]
    OutputDirNotDirectory(PathBuf),

    #[error("cannot inspect output directory {}: {source}", .path.display())]
    OutputDirInspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("output directory {} is not writable: {source}", .path.display())]
    OutputDirNotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Validated settings for one download run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    range: IdRange,
    /// URL template; `{id}` is substituted, otherwise the ID is appended as a path segment.
    base_url: String,
    output_dir: PathBuf,
    /// Pause after every request.
    delay: Duration,
    /// Whole-request timeout. `None` waits forever.
    timeout: Option<Duration>,
}

impl RunConfig {
    pub fn new(
        range: IdRange,
        base_url: &str,
        output_dir: impl Into<PathBuf>,
        delay: Duration,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let range = IdRange::new(range.start(), range.stop(), range.step())?;

        validate_base_url(base_url, range.start())?;

        let output_dir = output_dir.into();
        validate_output_dir(&output_dir)?;

        Ok(Self {
            range,
            base_url: base_url.to_string(),
            output_dir,
            delay,
            timeout,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn range(&self) -> IdRange {
        self.range
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn url_for(&self, id: u64) -> String {
        format_url(&self.base_url, id)
    }

    /// `output_dir` and `filename` joined by plain concatenation.
    ///
    /// Unlike `Path::join`, an absolute `filename` does not replace the directory. A
    /// separator is inserted only when `output_dir` does not already end with one.
    pub fn output_path(&self, filename: &str) -> PathBuf {
        let mut path = self.output_dir.clone().into_os_string();

        if !path.to_string_lossy().ends_with(std::path::is_separator) {
            path.push(MAIN_SEPARATOR_STR);
        }

        path.push(filename);
        PathBuf::from(path)
    }
}

pub fn format_url(template: &str, id: u64) -> String {
    if template.contains(ID_PLACEHOLDER) {
        template.replace(ID_PLACEHOLDER, &id.to_string())
    } else {
        format!("{}/{}", template.trim_end_matches('/'), id)
    }
}

fn validate_base_url(template: &str, sample_id: u64) -> Result<(), ConfigError> {
    let url = format_url(template, sample_id);

    let parsed = Url::parse(&url).map_err(|e| ConfigError::InvalidBaseUrl {
        url: url.clone(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidBaseUrl {
            url,
            reason: format!("unsupported scheme `{}`", scheme),
        }),
    }
}

fn validate_output_dir(path: &Path) -> Result<(), ConfigError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::OutputDirMissing(path.to_path_buf()))
        }
        Err(source) => {
            return Err(ConfigError::OutputDirInspect {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if !metadata.is_dir() {
        return Err(ConfigError::OutputDirNotDirectory(path.to_path_buf()));
    }

    // Removed again when the handle drops.
    tempfile::Builder::new()
        .prefix(".id-range-downloader-probe")
        .tempfile_in(path)
        .map(drop)
        .map_err(|source| ConfigError::OutputDirNotWritable {
            path: path.to_path_buf(),
            source,
        })
}

pub fn secs_to_duration(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidDuration { field, value })
}

/// `[range]` table of the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeSettings {
    pub start: Option<u64>,
    pub stop: Option<u64>,
    pub step: Option<u64>,
}

/// Unvalidated settings as read from a TOML file or assembled from CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub delay_secs: Option<f64>,
    pub timeout_secs: Option<f64>,
    #[serde(default)]
    pub range: RangeSettings,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Values set in `overrides` win over the ones in `self`.
    pub fn merged_with(self, overrides: FileConfig) -> Self {
        Self {
            base_url: overrides.base_url.or(self.base_url),
            output_dir: overrides.output_dir.or(self.output_dir),
            delay_secs: overrides.delay_secs.or(self.delay_secs),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
            range: RangeSettings {
                start: overrides.range.start.or(self.range.start),
                stop: overrides.range.stop.or(self.range.stop),
                step: overrides.range.step.or(self.range.step),
            },
        }
    }

    pub fn into_run_config(self) -> Result<RunConfig, ConfigError> {
        let start = self.range.start.ok_or(ConfigError::MissingField("range.start"))?;
        let stop = self.range.stop.ok_or(ConfigError::MissingField("range.stop"))?;
        let step = self.range.step.unwrap_or(DEFAULT_STEP);
        let range = IdRange::new(start, stop, step)?;

        let base_url = self.base_url.ok_or(ConfigError::MissingField("base_url"))?;
        let output_dir = self
            .output_dir
            .ok_or(ConfigError::MissingField("output_dir"))?;

        let delay = secs_to_duration("delay_secs", self.delay_secs.unwrap_or(DEFAULT_DELAY_SECS))?;
        let timeout = self
            .timeout_secs
            .map(|secs| secs_to_duration("timeout_secs", secs))
            .transpose()?;

        RunConfig::new(range, &base_url, output_dir, delay, timeout)
    }
}
