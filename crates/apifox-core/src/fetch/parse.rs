//! Parse the reason phrase out of collected response header lines.

/// Returns the reason phrase of the last status line (the final response
/// after redirects). Empty when the server sent none (e.g. HTTP/2).
pub(crate) fn reason_phrase(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .rev()
        .find(|l| l.starts_with("HTTP/"))
        .and_then(|status_line| {
            let mut parts = status_line.splitn(3, ' ');
            parts.next()?; // version
            parts.next()?; // code
            parts.next().map(|r| r.trim().to_string())
        })
        .unwrap_or_default()
}
