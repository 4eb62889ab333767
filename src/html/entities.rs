//! Character references: decoding on the way in, escaping on the way out.

use phf::phf_map;

/// The named character references citelist understands. Anything else is left
/// as literal text.
static NAMED: phf::Map<&'static str, char> = phf_map! {
    "amp" => '&',
    "lt" => '<',
    "gt" => '>',
    "quot" => '"',
    "apos" => '\'',
    "nbsp" => '\u{a0}',
    "copy" => '©',
    "reg" => '®',
    "ndash" => '–',
    "mdash" => '—',
    "hellip" => '…',
    "lsquo" => '‘',
    "rsquo" => '’',
    "ldquo" => '“',
    "rdquo" => '”',
    "uarr" => '↑',
};

/// Decode the character references in `input`.
pub fn decode(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        output.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        // References are short; don't scan the whole remainder for a ';'.
        let decoded = after
            .char_indices()
            .take(32)
            .find(|(_, c)| *c == ';')
            .and_then(|(semi, _)| decode_reference(&after[..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                output.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                output.push('&');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

/// Decode a single reference body (the part between `&` and `;`).
fn decode_reference(body: &str) -> Option<char> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = if let Some(hex) = numeric
            .strip_prefix('x')
            .or_else(|| numeric.strip_prefix('X'))
        {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            numeric.parse::<u32>().ok()?
        };
        char::from_u32(code)
    } else {
        NAMED.get(body).copied()
    }
}

/// Escape text content.
pub fn escape_text(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
    output
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named() {
        assert_eq!(decode("Smith &amp; Jones"), "Smith & Jones");
        assert_eq!(decode("&lt;b&gt;"), "<b>");
        assert_eq!(decode("&uarr;1"), "↑1");
    }

    #[test]
    fn numeric() {
        assert_eq!(decode("&#8593;&#x2191;&#X2191;"), "↑↑↑");
    }

    #[test]
    fn unknown_left_alone() {
        assert_eq!(decode("AT&T"), "AT&T");
        assert_eq!(decode("&bogus; & &#xZZ;"), "&bogus; & &#xZZ;");
        assert_eq!(decode("trailing &"), "trailing &");
    }

    #[test]
    fn escapes() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(
            escape_attr(r#"say "hi" & <go>"#),
            "say &quot;hi&quot; &amp; &lt;go&gt;"
        );
    }
}
