//! Where a formatter's rendered output goes. `-` (or a bare stdout
//! destination) prints directly; a file destination is written once,
//! atomically, when the run ends — most formats here are whole documents
//! (closing tags, footers) rather than independent log lines, so there is
//! nothing meaningful to persist until the last item has been seen.

use std::path::PathBuf;

use linkchecker_config::Destination;

pub enum Sink {
    Stdout,
    Buffered { path: PathBuf, buffer: String },
}

impl Sink {
    /// The destination path, for formatters (blacklist) that need to read
    /// their own prior output back before appending to it. `None` for
    /// `Stdout`.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Stdout => None,
            Self::Buffered { path, .. } => Some(path.as_path()),
        }
    }
}

impl Sink {
    #[must_use]
    pub fn new(destination: &Destination) -> Self {
        match destination {
            Destination::Stdout => Self::Stdout,
            Destination::File(path) => Self::Buffered {
                path: path.clone(),
                buffer: String::new(),
            },
        }
    }

    /// Append `text` verbatim (no trailing newline added).
    pub fn write(&mut self, text: &str) {
        match self {
            Self::Stdout => print!("{text}"),
            Self::Buffered { buffer, .. } => buffer.push_str(text),
        }
    }

    pub fn write_line(&mut self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Buffered { buffer, .. } => {
                buffer.push_str(line);
                buffer.push('\n');
            }
        }
    }

    /// Persist a buffered sink to disk. A no-op for `Stdout`, which has
    /// already been written line by line.
    pub fn flush(&self) {
        if let Self::Buffered { path, buffer } = self
            && let Err(err) = linkchecker_utils::atomic_write(path, buffer.as_bytes())
        {
            tracing::warn!(path = %path.display(), %err, "failed to persist formatter output");
        }
    }
}
