//! Character escaping for markup output.

use bitflags::bitflags;

bitflags! {
    /// Escaping strictness flags consumed during tree traversal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EscapeFlags: u8 {
        /// Reject content that cannot appear in well-formed XML
        /// (`--` in comments, `]]>` in CDATA, `?>` in instruction data).
        const WELL_FORMED = 1;
        /// Leave existing entity and character references alone instead
        /// of re-encoding their leading ampersand.
        const NO_DOUBLE_ENCODING = 1 << 1;
    }
}

/// Escapes character data for element text content: `&`, `<`, `>`.
pub fn escape_text(text: &str, flags: EscapeFlags) -> String {
    escape(text, false, flags)
}

/// Escapes an attribute value: `&`, `<`, `>`, `"`.
pub fn escape_attr_value(value: &str, flags: EscapeFlags) -> String {
    escape(value, true, flags)
}

fn escape(text: &str, quote: bool, flags: EscapeFlags) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'&' => {
                if flags.contains(EscapeFlags::NO_DOUBLE_ENCODING) {
                    if let Some(end) = reference_end(bytes, i) {
                        out.push_str(&text[i..=end]);
                        i = end + 1;
                        continue;
                    }
                }
                out.push_str("&amp;");
                i += 1;
            }
            b'<' => {
                out.push_str("&lt;");
                i += 1;
            }
            b'>' => {
                out.push_str("&gt;");
                i += 1;
            }
            b'"' if quote => {
                out.push_str("&quot;");
                i += 1;
            }
            _ => {
                if let Some(ch) = text[i..].chars().next() {
                    out.push(ch);
                    i += ch.len_utf8();
                } else {
                    i += 1;
                }
            }
        }
    }

    out
}

/// Finds the end of an entity (`&name;`) or character (`&#NNN;`, `&#xHH;`)
/// reference starting at `start`, or `None` if the ampersand does not
/// begin a valid reference.
fn reference_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if i >= bytes.len() {
        return None;
    }

    if bytes[i] == b'#' {
        i += 1;
        let hex = bytes.get(i) == Some(&b'x');
        if hex {
            i += 1;
        }
        let digits_start = i;
        while i < bytes.len() && is_reference_digit(bytes[i], hex) {
            i += 1;
        }
        if i == digits_start {
            return None;
        }
    } else {
        if !bytes[i].is_ascii_alphabetic() && bytes[i] != b'_' {
            return None;
        }
        i += 1;
        while i < bytes.len()
            && (bytes[i].is_ascii_alphanumeric()
                || bytes[i] == b'_'
                || bytes[i] == b'-'
                || bytes[i] == b'.')
        {
            i += 1;
        }
    }

    if bytes.get(i) == Some(&b';') {
        Some(i)
    } else {
        None
    }
}

fn is_reference_digit(b: u8, hex: bool) -> bool {
    if hex {
        b.is_ascii_hexdigit()
    } else {
        b.is_ascii_digit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(
            escape_text("a < b & c > d", EscapeFlags::empty()),
            "a &lt; b &amp; c &gt; d"
        );
    }

    #[test]
    fn test_escape_text_leaves_quotes() {
        assert_eq!(
            escape_text("say \"hi\"", EscapeFlags::empty()),
            "say \"hi\""
        );
    }

    #[test]
    fn test_escape_attr_value() {
        assert_eq!(
            escape_attr_value("He said \"hello\" & <bye>", EscapeFlags::empty()),
            "He said &quot;hello&quot; &amp; &lt;bye&gt;"
        );
    }

    #[test]
    fn test_double_encoding_by_default() {
        assert_eq!(
            escape_text("&amp; &#10;", EscapeFlags::empty()),
            "&amp;amp; &amp;#10;"
        );
    }

    #[test]
    fn test_no_double_encoding_preserves_references() {
        let flags = EscapeFlags::NO_DOUBLE_ENCODING;
        assert_eq!(escape_text("&amp; &#10; &#x1F;", flags), "&amp; &#10; &#x1F;");
        assert_eq!(escape_text("&custom.ref;", flags), "&custom.ref;");
    }

    #[test]
    fn test_no_double_encoding_still_escapes_bare_ampersand() {
        let flags = EscapeFlags::NO_DOUBLE_ENCODING;
        assert_eq!(escape_text("fish & chips", flags), "fish &amp; chips");
        assert_eq!(escape_text("trailing &", flags), "trailing &amp;");
        assert_eq!(escape_text("&#;", flags), "&amp;#;");
        assert_eq!(escape_text("&not a ref", flags), "&amp;not a ref");
    }

    #[test]
    fn test_multibyte_passthrough() {
        assert_eq!(escape_text("über & ünder", EscapeFlags::empty()), "über &amp; ünder");
    }
}
