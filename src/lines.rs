use std::io::{self, BufRead, Read};
use std::mem;

use crate::error::ParseError;

/// Splits a buffered stream into logical lines.
///
/// Raw lines end at `\n` or `\r\n`. A raw line whose accumulated text ends with a Line
/// Continuator (`\`) has that backslash replaced by `\n` and is joined with the next raw line.
#[derive(Debug)]
pub struct LogicalLines<R> {
    reader: R,
    limit: Option<usize>,
    raw: Vec<u8>,
    line: Vec<u8>,
}

impl<R: BufRead> LogicalLines<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_limit(reader, None)
    }

    /// Like [`LogicalLines::new`], but never buffers more than about `limit` bytes of a single
    /// logical line.
    #[must_use]
    pub fn with_limit(reader: R, limit: Option<usize>) -> Self {
        Self {
            reader,
            limit,
            raw: Vec::with_capacity(64),
            line: Vec::with_capacity(64),
        }
    }

    /// Returns the next logical line, or `None` at end of stream.
    ///
    /// A continuation that is still open when the stream ends is dropped.
    ///
    /// # Errors
    ///
    /// Fails if the underlying reader does, if the line is not UTF-8, or as soon as the line
    /// grows past the limit.
    pub fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        loop {
            self.raw.clear();
            let read = match self.limit {
                // Room for the rest of the line, its terminator and one byte to notice overflow.
                Some(limit) => {
                    let budget = limit.saturating_sub(self.line.len()).saturating_add(3);
                    (&mut self.reader)
                        .take(u64::try_from(budget).unwrap_or(u64::MAX))
                        .read_until(b'\n', &mut self.raw)?
                }
                None => self.reader.read_until(b'\n', &mut self.raw)?,
            };

            if read == 0 {
                self.line.clear();
                return Ok(None);
            }

            let raw = self.raw.strip_suffix(b"\n").unwrap_or(&self.raw);
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            self.line.extend_from_slice(raw);

            if let Some(limit) = self.limit
                && self.line.len() > limit
            {
                self.line.clear();
                return Err(ParseError::LineTooLong { limit });
            }

            if self.line.last() == Some(&b'\\') {
                self.line.pop();
                self.line.push(b'\n');
                continue;
            }

            let line = mem::take(&mut self.line);
            return String::from_utf8(line)
                .map(Some)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into());
        }
    }
}

impl<R: BufRead> Iterator for LogicalLines<R> {
    type Item = Result<String, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        LogicalLines::new(text.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .expect("reading from a slice cannot fail")
    }

    #[test]
    fn empty_input() {
        assert!(lines("").is_empty());
    }

    #[test]
    fn splits_on_both_terminators() {
        assert_eq!(lines("a\nb\r\nc"), ["a", "b", "c"]);
    }

    #[test]
    fn keeps_lone_carriage_return_inside_line() {
        assert_eq!(lines("a\rb\n"), ["a\rb"]);
    }

    #[test]
    fn blank_lines_are_still_lines() {
        assert_eq!(lines("\n  \nx\n"), ["", "  ", "x"]);
    }

    #[test]
    fn continuation_joins_with_newline() {
        assert_eq!(lines("foo = bar\\\nmulti line\n"), ["foo = bar\nmulti line"]);
    }

    #[test]
    fn continuation_with_crlf() {
        assert_eq!(lines("a\\\r\nb\r\n"), ["a\nb"]);
    }

    #[test]
    fn continuation_keeps_leading_whitespace() {
        assert_eq!(lines("a\\\n\tb\n"), ["a\n\tb"]);
    }

    #[test]
    fn consecutive_continuations() {
        assert_eq!(lines("a\\\n\\\nb\n"), ["a\n\nb"]);
    }

    #[test]
    fn only_the_last_backslash_is_replaced() {
        assert_eq!(lines("a\\\\\nb\n"), ["a\\\nb"]);
    }

    #[test]
    fn dangling_continuation_is_dropped() {
        assert_eq!(lines("a = b\nc = d\\\n"), ["a = b"]);
        assert_eq!(lines("c = d\\"), Vec::<String>::new());
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut lines = LogicalLines::new(&b"ok\n\xff\xfe\n"[..]);
        assert_eq!(lines.next_line().expect("first line is valid").as_deref(), Some("ok"));

        let err = lines.next_line().expect_err("second line is not UTF-8");
        assert!(matches!(err, ParseError::Io(ref e) if e.kind() == io::ErrorKind::InvalidData));
    }

    #[test]
    fn limit_counts_logical_line_without_terminator() {
        let mut lines = LogicalLines::with_limit(&b"12345678\r\n1234\\\n5678\n"[..], Some(8));
        assert_eq!(lines.next_line().expect("fits the limit").as_deref(), Some("12345678"));

        let err = lines.next_line().expect_err("joined line is 9 bytes");
        assert!(matches!(err, ParseError::LineTooLong { limit: 8 }));
    }

    /// Counts how many bytes were pulled from the inner reader.
    struct Counting<R> {
        inner: R,
        consumed: usize,
    }

    impl<R: Read> Read for Counting<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.inner.read(buf)?;
            self.consumed += n;
            Ok(n)
        }
    }

    #[test]
    fn limit_stops_reading_an_endless_line() {
        let mut source = Counting {
            inner: io::repeat(b'a').take(50_000_000),
            consumed: 0,
        };

        let err = LogicalLines::with_limit(io::BufReader::new(&mut source), Some(8))
            .next_line()
            .expect_err("line never ends");
        assert!(matches!(err, ParseError::LineTooLong { limit: 8 }));
        assert!(source.consumed <= 64 * 1024, "consumed {} bytes", source.consumed);
    }

    #[test]
    fn limit_does_not_split_multibyte_characters() {
        let text = "k = é\n".repeat(3);
        let lines = LogicalLines::with_limit(text.as_bytes(), Some(6))
            .collect::<Result<Vec<_>, _>>()
            .expect("every line is exactly at the limit");
        assert_eq!(lines, ["k = é", "k = é", "k = é"]);
    }
}
