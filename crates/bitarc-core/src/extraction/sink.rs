//! Writable destinations handed to the engine for one item.

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::SystemTime;

use filetime::FileTime;

enum Target {
    File {
        writer: Option<BufWriter<File>>,
        path: PathBuf,
    },
    Memory(Vec<u8>),
}

struct SinkState {
    target: Target,
    bytes_written: u64,
    closed: bool,
}

/// Shared handle to an item's output destination.
///
/// The session keeps one handle and gives the engine a writer backed by the
/// same state. After [`close`](Self::close), writes through the engine's
/// writer fail with `BrokenPipe`.
#[derive(Clone)]
pub struct OutputSink {
    state: Rc<RefCell<SinkState>>,
}

impl OutputSink {
    /// Creates (or truncates) the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from creating the file.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_target(Target::File {
            writer: Some(BufWriter::new(file)),
            path: path.to_path_buf(),
        }))
    }

    /// Creates an in-memory sink.
    #[must_use]
    pub fn memory() -> Self {
        Self::from_target(Target::Memory(Vec::new()))
    }

    fn from_target(target: Target) -> Self {
        Self {
            state: Rc::new(RefCell::new(SinkState {
                target,
                bytes_written: 0,
                closed: false,
            })),
        }
    }

    /// Returns a writer the engine can fill.
    #[must_use]
    pub fn writer(&self) -> Box<dyn Write> {
        Box::new(SinkWriter {
            state: Rc::clone(&self.state),
        })
    }

    /// Destination file path; `None` for memory sinks.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        match &self.state.borrow().target {
            Target::File { path, .. } => Some(path.clone()),
            Target::Memory(_) => None,
        }
    }

    /// Bytes accepted so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.state.borrow().bytes_written
    }

    /// Returns `true` once the sink has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    /// Flushes pending bytes, stamps the modification time if given, and
    /// closes the destination. Closing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from flushing or from setting the time.
    pub fn close(&self, modified: Option<SystemTime>) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Ok(());
        }
        state.closed = true;

        if let Target::File { writer, .. } = &mut state.target
            && let Some(writer) = writer.take()
        {
            let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
            if let Some(modified) = modified {
                let mtime = FileTime::from_system_time(modified);
                filetime::set_file_handle_times(&file, None, Some(mtime))?;
            }
        }
        Ok(())
    }

    /// Takes the bytes collected by a memory sink; empty for file sinks.
    #[must_use]
    pub fn take_buffer(&self) -> Vec<u8> {
        match &mut self.state.borrow_mut().target {
            Target::Memory(buffer) => std::mem::take(buffer),
            Target::File { .. } => Vec::new(),
        }
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        let kind = match &state.target {
            Target::File { .. } => "file",
            Target::Memory(_) => "memory",
        };
        f.debug_struct("OutputSink")
            .field("kind", &kind)
            .field("bytes_written", &state.bytes_written)
            .field("closed", &state.closed)
            .finish()
    }
}

struct SinkWriter {
    state: Rc<RefCell<SinkState>>,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "output sink is closed",
            ));
        }
        let written = match &mut state.target {
            Target::File {
                writer: Some(writer),
                ..
            } => writer.write(buf)?,
            Target::File { writer: None, .. } => {
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "output sink is closed",
                ));
            }
            Target::Memory(buffer) => {
                buffer.extend_from_slice(buf);
                buf.len()
            }
        };
        state.bytes_written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        match &mut state.target {
            Target::File {
                writer: Some(writer),
                ..
            } => writer.flush(),
            _ => Ok(()),
        }
    }
}
