use std::borrow::Cow;

/// Characters that are documented as invalid inside a section header.
pub(crate) const SECTION_FORBIDDEN: &[char] = &['[', ']', '\\', '=', '#'];

/// Turns every newline into an escaped continuation (`\` followed by `\n`) so that reading the
/// text back joins the lines into the original string.
pub(crate) fn escape(value: &str) -> Cow<'_, str> {
    if value.contains('\n') {
        Cow::Owned(value.replace('\n', "\\\n"))
    } else {
        Cow::Borrowed(value)
    }
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
