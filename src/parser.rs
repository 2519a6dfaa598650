use std::io::BufRead;

use crate::entry::Entry;
use crate::error::ParseError;
use crate::lines::LogicalLines;
use crate::util::{SECTION_FORBIDDEN, is_blank};

/// Knobs for the read path. The default accepts everything the format allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    strict_sections: bool,
    max_line_length: Option<usize>,
}

impl ReadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject section names containing `[`, `]`, `\`, `=` or `#`.
    ///
    /// Off by default: any line starting with `[` and ending with `]` is a section header.
    #[must_use]
    pub fn strict_sections(mut self, strict: bool) -> Self {
        self.strict_sections = strict;
        self
    }

    /// Reject logical lines longer than `limit` bytes.
    #[must_use]
    pub fn max_line_length(mut self, limit: Option<usize>) -> Self {
        self.max_line_length = limit;
        self
    }
}

/// What a single logical line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Comment,
    Section(&'a str),
    Entry { key: &'a str, value: &'a str },
}

fn classify(line: &str) -> Option<Line<'_>> {
    if is_blank(line) {
        return Some(Line::Blank);
    }

    if line.starts_with('#') {
        return Some(Line::Comment);
    }

    if let Some(name) = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        return Some(Line::Section(name));
    }

    line.split_once('=').map(|(key, value)| Line::Entry {
        key: key.trim(),
        value: value.trim(),
    })
}

/// Represents an on-going parse.
#[derive(Debug)]
pub struct Parser<R> {
    lines: LogicalLines<R>,
    options: ReadOptions,
    section: String,
    failed: bool,
}

impl<R: BufRead> Parser<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ReadOptions::default())
    }

    #[must_use]
    pub fn with_options(reader: R, options: ReadOptions) -> Self {
        Self {
            lines: LogicalLines::with_limit(reader, options.max_line_length),
            options,
            section: String::new(),
            failed: false,
        }
    }

    /// The section that the next entry will belong to.
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Reads logical lines until the next entry, skipping blanks and comments and tracking
    /// section headers along the way.
    ///
    /// # Errors
    ///
    /// Returns the first read failure or line that cannot be parsed.
    pub fn next_entry(&mut self) -> Result<Option<Entry>, ParseError> {
        while let Some(line) = self.lines.next_line()? {
            match classify(&line) {
                Some(Line::Blank | Line::Comment) => {}
                Some(Line::Section(name)) => {
                    if self.options.strict_sections && name.contains(SECTION_FORBIDDEN) {
                        return Err(ParseError::InvalidSectionName {
                            name: name.to_owned(),
                        });
                    }

                    tracing::trace!(section = %name.escape_debug(), "entering section");
                    name.clone_into(&mut self.section);
                }
                Some(Line::Entry { key, value }) => {
                    return Ok(Some(Entry::new(self.section.clone(), key, value)));
                }
                None => return Err(ParseError::MalformedLine { line }),
            }
        }

        Ok(None)
    }
}

impl<R: BufRead> Iterator for Parser<R> {
    type Item = Result<Entry, ParseError>;

    /// Yields entries until the end of the stream or the first error, after which it is fused.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let next = self.next_entry().transpose();
        self.failed = matches!(next, Some(Err(_)));
        next
    }
}
