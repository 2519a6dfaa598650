use std::fmt;

use crate::util::escape;

/// A single `key = value` line together with the section it appeared under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Entry {
    pub section: String,
    pub key: String,
    pub value: String,
}

impl Entry {
    #[must_use]
    pub fn new(
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Renders the entry line exactly as the writer would, without the section header or the
/// trailing newline.
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.key.is_empty() {
            write!(f, "{} ", escape(&self.key))?;
        }
        f.write_str("=")?;
        if !self.value.is_empty() {
            write!(f, " {}", escape(&self.value))?;
        }
        Ok(())
    }
}
