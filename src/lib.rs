pub mod config;
pub mod downloader;
pub mod id_range;
pub mod logging;
pub mod progress;

pub use config::{ConfigError, FileConfig, RunConfig};
pub use downloader::{Download, DownloadError, Downloader, RunReport};
pub use id_range::IdRange;
