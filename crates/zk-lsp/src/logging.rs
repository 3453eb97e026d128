/*
 * logging.rs
 * Copyright (c) 2025 zk contributors
 *
 * Where server logs go.
 *
 * Stdout carries the JSON-RPC stream, so log output is written to a
 * `LogSink` instead: stderr by default, or a file chosen on the command
 * line.
 */

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "zk=info";

/// A cloneable, shared log destination.
#[derive(Clone)]
pub struct LogSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl LogSink {
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stderr() -> Self {
        Self::from_writer(io::stderr())
    }

    /// Append to `path`, creating it if needed.
    pub fn file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(file))
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Box<dyn Write + Send>>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("log sink lock poisoned"))
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink").finish_non_exhaustive()
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install a subscriber writing to `sink` as the default for the current
/// thread until the guard is dropped.
pub fn install(sink: LogSink) -> DefaultGuard {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(sink)
                .with_ansi(false),
        )
        .set_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn clones_share_one_destination() {
        let buffer = SharedBuffer::default();
        let sink = LogSink::from_writer(buffer.clone());

        let mut first = sink.clone();
        let mut second = sink.make_writer();
        first.write_all(b"one ").unwrap();
        second.write_all(b"two").unwrap();
        second.flush().unwrap();

        assert_eq!(buffer.0.lock().unwrap().as_slice(), b"one two");
    }

    #[test]
    fn events_reach_the_sink() {
        let buffer = SharedBuffer::default();
        let sink = LogSink::from_writer(buffer.clone());

        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(uri = "file:///nb/a.md", "closing document");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("closing document"));
        assert!(output.contains("uri=\"file:///nb/a.md\""));
    }

    #[test]
    fn file_sink_appends() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("zk.log");

        let mut sink = LogSink::file(&path).unwrap();
        sink.write_all(b"first\n").unwrap();
        sink.flush().unwrap();

        let mut sink = LogSink::file(&path).unwrap();
        sink.write_all(b"second\n").unwrap();
        sink.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
