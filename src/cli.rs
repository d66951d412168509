use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use id_range_downloader::config::{FileConfig, RangeSettings};
use id_range_downloader::Downloader;
use indicatif::ProgressBar;

/// Download every file of a numeric ID range from an HTTP endpoint.
///
/// Settings come from an optional TOML file; flags override it.
#[derive(Debug, Parser)]
#[command(name = "id-range-downloader", version)]
#[command(about = "Sequentially download files by walking a numeric ID range", long_about = None)]
pub struct Cli {
    /// TOML file with base_url, output_dir, delay_secs, timeout_secs and a [range] table.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// First ID of the range.
    #[arg(long)]
    pub start: Option<u64>,

    /// End of the range (exclusive).
    #[arg(long)]
    pub stop: Option<u64>,

    /// Distance between consecutive IDs (default 1).
    #[arg(long)]
    pub step: Option<u64>,

    /// URL template; `{id}` is replaced by the ID, otherwise `/<id>` is appended.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Existing, writable directory the files are saved to.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Pause after every request, in seconds (default 1).
    #[arg(long)]
    pub delay_secs: Option<f64>,

    /// Per-request timeout in seconds. Without it a stalled request blocks forever.
    #[arg(long)]
    pub timeout_secs: Option<f64>,

    /// Do not draw a progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    fn overrides(&self) -> FileConfig {
        FileConfig {
            base_url: self.base_url.clone(),
            output_dir: self.output_dir.clone(),
            delay_secs: self.delay_secs,
            timeout_secs: self.timeout_secs,
            range: RangeSettings {
                start: self.start,
                stop: self.stop,
                step: self.step,
            },
        }
    }

    pub fn file_config(&self) -> Result<FileConfig> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        Ok(file.merged_with(self.overrides()))
    }

    /// Runs the download; `progress` is sized to the range once the config is valid.
    pub fn run(self, progress: ProgressBar) -> Result<()> {
        let cfg = self
            .file_config()?
            .into_run_config()
            .context("invalid configuration")?;

        tracing::debug!("loaded config: {:?}", cfg);

        progress.set_length(cfg.range().len());

        let report = Downloader::new(cfg).with_progress(progress).run()?;

        tracing::debug!(
            "run completed: {} saved, {} skipped",
            report.saved.len(),
            report.skipped.len()
        );

        Ok(())
    }
}
