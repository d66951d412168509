//! Logging init: human-readable lines on stderr, filtered by `RUST_LOG`.
//!
//! Lines are written while the progress bar is suspended so they never land in the
//! middle of a redraw.

use std::io::{self, Write};

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Hands each formatted event to `inner` with `bar` cleared from the terminal.
pub struct SuspendingMakeWriter<M> {
    bar: ProgressBar,
    inner: M,
}

impl<M> SuspendingMakeWriter<M> {
    pub fn new(bar: ProgressBar, inner: M) -> Self {
        Self { bar, inner }
    }
}

impl<'a, M> MakeWriter<'a> for SuspendingMakeWriter<M>
where
    M: MakeWriter<'a> + 'a,
{
    type Writer = SuspendingWriter<'a, M>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendingWriter {
            bar: &self.bar,
            inner: &self.inner,
            buf: Vec::new(),
        }
    }
}

/// Buffers one event; the buffer is written out when the writer drops.
pub struct SuspendingWriter<'a, M: MakeWriter<'a>> {
    bar: &'a ProgressBar,
    inner: &'a M,
    buf: Vec<u8>,
}

impl<'a, M: MakeWriter<'a>> io::Write for SuspendingWriter<'a, M> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a, M: MakeWriter<'a>> Drop for SuspendingWriter<'a, M> {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }

        let inner = self.inner;
        let buf = &self.buf;

        self.bar.suspend(|| {
            let mut writer = inner.make_writer();
            let _ = writer.write_all(buf);
            let _ = writer.flush();
        });
    }
}

/// Initialize logging to stderr, sharing the terminal with `progress`.
/// Returns Err if a global subscriber is already set.
pub fn init_logging(progress: ProgressBar) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(SuspendingMakeWriter::new(progress, io::stderr))
        .with_ansi(false)
        .finish()
        .try_init()
}
