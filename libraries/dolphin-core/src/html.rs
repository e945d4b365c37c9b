//! HTML escaping
//!
//! Free text coming from users is escaped once, in the storage write path.
//! Anything read back from the database is already safe to splice into HTML
//! and must not go through [`escape`] a second time.

/// Escape `&`, `<`, `>`, `"` and `'` as HTML entities.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#039;y&#039;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_leaves_plain_text_alone() {
        assert_eq!(escape("Called back, wants a demo."), "Called back, wants a demo.");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_is_not_idempotent() {
        // Double escaping visibly corrupts text, which is why it happens once.
        assert_eq!(escape(&escape("a & b")), "a &amp;amp; b");
    }
}
