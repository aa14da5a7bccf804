//! Plain-text helpers for display fields.

/// Truncate `text` to at most `max_len` characters, appending `...` when a
/// cut happened.
///
/// The cut is naive, not word-boundary aware: `shorten("hello world", 5)`
/// yields `"hello..."`. Counting is `char`-based so multi-byte text never
/// splits mid-scalar.
pub fn shorten(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(max_len).collect();
    cut.push_str("...");
    cut
}

/// Escape text for embedding into HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
