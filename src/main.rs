use clap::Parser;
use id_range_downloader::logging;
use id_range_downloader::progress::id_progress_bar;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Log lines and the bar share stderr, so the bar exists before logging starts.
    let progress = id_progress_bar(0, !cli.no_progress);

    if let Err(err) = logging::init_logging(progress.clone()) {
        eprintln!("id-range-downloader: could not initialize logging: {}", err);
    }

    if let Err(err) = cli.run(progress.clone()) {
        if !progress.is_finished() {
            progress.finish_and_clear();
        }
        eprintln!("id-range-downloader error: {:#}", err);
        std::process::exit(1);
    }
}
