use std::io;

use thiserror::Error;

/// Failure while turning text into entries.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read data")]
    Io(#[from] io::Error),

    #[error("invalid line: {line:?}")]
    MalformedLine { line: String },

    #[error("invalid section name: {name:?}")]
    InvalidSectionName { name: String },

    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}

/// Failure of [`read`](crate::read): either the text could not be parsed or the entry callback
/// gave up.
#[derive(Debug, Error)]
pub enum ReadError<E> {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("entry callback failed")]
    Callback(#[source] E),
}

impl<E> ReadError<E> {
    /// Returns the callback's own error, if that is what stopped the read.
    #[must_use]
    pub fn into_callback(self) -> Option<E> {
        match self {
            Self::Callback(e) => Some(e),
            Self::Parse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn malformed_line_quotes_the_line() {
        let err = ParseError::MalformedLine {
            line: "not valid\tat all".to_owned(),
        };
        assert_eq!(err.to_string(), r#"invalid line: "not valid\tat all""#);
    }

    #[test]
    fn io_error_is_the_source() {
        let err = ParseError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        let source = err.source().expect("io error should be exposed as the source");
        assert_eq!(source.to_string(), "eof");
    }

    #[test]
    fn parse_errors_are_transparent() {
        let err = ReadError::<io::Error>::from(ParseError::LineTooLong { limit: 8 });
        assert_eq!(err.to_string(), "line exceeds 8 bytes");
        assert!(err.into_callback().is_none());
    }

    #[test]
    fn callback_error_is_kept() {
        let err = ReadError::Callback(io::Error::other("stop"));
        assert_eq!(err.to_string(), "entry callback failed");
        assert_eq!(
            err.into_callback().map(|e| e.to_string()),
            Some("stop".to_owned())
        );
    }
}
