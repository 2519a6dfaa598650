//! A minimal markup language for config files.
//!
//! A document is a list of lines:
//!
//! - blank lines are ignored;
//! - lines starting with `#` are comments and are ignored;
//! - `[name]` starts a section, which applies to every entry until the next header (`[]` goes
//!   back to the unnamed section);
//! - `key = value` is an entry; both sides are trimmed and only the first `=` separates them;
//! - a line ending in `\` continues on the next line, joined by a newline.
//!
//! ```
//! let text = "[server]\nhost = localhost\nmotd = hello\\\nworld\n";
//!
//! let mut entries = Vec::new();
//! ini::read(text.as_bytes(), |entry| {
//!     entries.push(entry);
//!     Ok::<_, std::convert::Infallible>(())
//! })?;
//!
//! assert_eq!(entries[1], ini::Entry::new("server", "motd", "hello\nworld"));
//!
//! let mut out = Vec::new();
//! ini::write_all(&mut out, &entries)?;
//! assert_eq!(out, text.as_bytes());
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

mod entry;
mod error;
mod lines;
mod parser;
mod util;
mod writer;

use std::io::{self, BufReader, Read, Write};

pub use entry::Entry;
pub use error::{ParseError, ReadError};
pub use lines::LogicalLines;
pub use parser::{Parser, ReadOptions};
pub use writer::Emitter;

/// Parses `source` and hands every entry to `consume`, in document order.
///
/// Stops at the first malformed line, read failure, or error returned by `consume`. Entries
/// delivered before that point stay delivered.
///
/// # Errors
///
/// See [`ReadError`].
pub fn read<R, F, E>(source: R, consume: F) -> Result<(), ReadError<E>>
where
    R: Read,
    F: FnMut(Entry) -> Result<(), E>,
{
    read_with(source, ReadOptions::default(), consume)
}

/// Same as [`read`] with non-default [`ReadOptions`].
///
/// # Errors
///
/// See [`ReadError`].
pub fn read_with<R, F, E>(
    source: R,
    options: ReadOptions,
    mut consume: F,
) -> Result<(), ReadError<E>>
where
    R: Read,
    F: FnMut(Entry) -> Result<(), E>,
{
    let mut parser = Parser::with_options(BufReader::new(source), options);
    let mut count = 0_usize;

    while let Some(entry) = parser.next_entry()? {
        consume(entry).map_err(ReadError::Callback)?;
        count += 1;
    }

    tracing::debug!(entries = count, "finished reading");
    Ok(())
}

/// Collects every entry of `source`.
///
/// # Errors
///
/// See [`ParseError`].
pub fn read_all<R: Read>(source: R) -> Result<Vec<Entry>, ParseError> {
    Parser::new(BufReader::new(source)).collect()
}

/// Writes the entries produced by `produce` to `sink`.
///
/// `produce` is called exactly once and pushes entries through the [`Emitter`] it receives.
/// Consecutive entries with the same section share one header. The sink is flushed at the end.
///
/// # Errors
///
/// Returns the first failure of `sink`; nothing is written after it.
pub fn write<W, F>(sink: W, produce: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut Emitter<W>),
{
    let mut emitter = Emitter::new(sink);
    produce(&mut emitter);
    emitter.finish().map(drop)
}

/// Writes `entries` to `sink` in iteration order.
///
/// # Errors
///
/// Returns the first failure of `sink`.
pub fn write_all<'a, W, I>(sink: W, entries: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Entry>,
{
    write(sink, |emitter| {
        for entry in entries {
            emitter.emit(entry);
        }
    })
}
