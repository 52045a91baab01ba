use ammonia;

/// Clean HTML in user-supplied text (article content, bios) using ammonia.
///
/// Whitelist-based: safe formatting tags survive, anything scriptable
/// (<script>, <iframe>, event-handler attributes) is stripped before the text
/// ever reaches the database. Fail-safe against stored XSS regardless of how
/// clients render the fields.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
