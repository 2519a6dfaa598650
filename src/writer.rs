use std::fmt;
use std::io::{self, Write};

use crate::entry::Entry;
use crate::util::escape;

/// Handed to the producer passed to [`write`](crate::write); every call to [`Emitter::emit`]
/// appends one entry to the output.
///
/// Once the sink fails, all further output is dropped so that the first error is the one
/// reported.
#[derive(Debug)]
pub struct Emitter<W> {
    sink: W,
    section: String,
    wrote: bool,
    error: Option<io::Error>,
}

impl<W: Write> Emitter<W> {
    pub(crate) fn new(sink: W) -> Self {
        Self {
            sink,
            section: String::new(),
            wrote: false,
            error: None,
        }
    }

    /// Writes `entry`, preceded by a section header whenever its section differs from the
    /// previous entry's.
    pub fn emit(&mut self, entry: &Entry) {
        if entry.section != self.section {
            if self.wrote {
                self.put("\n");
            }
            tracing::trace!(section = %entry.section.escape_debug(), "writing section header");
            self.put("[");
            self.put(&escape(&entry.section));
            self.put("]\n");
            entry.section.clone_into(&mut self.section);
        }

        self.put_fmt(format_args!("{entry}\n"));

        self.wrote = true;
    }

    /// The first write failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    fn put(&mut self, text: &str) {
        self.put_fmt(format_args!("{text}"));
    }

    fn put_fmt(&mut self, args: fmt::Arguments<'_>) {
        if self.error.is_some() {
            return;
        }

        if let Err(e) = self.sink.write_fmt(args) {
            tracing::debug!(error = %e, "write failed, dropping remaining output");
            self.error = Some(e);
        }
    }

    pub(crate) fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error {
            return Err(e);
        }

        self.sink.flush()?;
        Ok(self.sink)
    }
}
