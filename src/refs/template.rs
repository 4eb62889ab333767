//! Placeholder templates (`%author%`, `%index%`, ...).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Anything that looks like an HTML tag
    static ref MARKUP_TAG: Regex = Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*(\s[^>]*)?/?>").unwrap();
}

/// Replace placeholders, in order.
///
/// Only the first occurrence of each placeholder is replaced, and the
/// replacements are applied one after another, so a value containing a later
/// placeholder is itself substituted into.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut output = template.to_string();
    for (placeholder, value) in values {
        output = output.replacen(placeholder, value, 1);
    }
    output
}

/// Whether a template contains a markup tag, and so is inserted as markup
/// rather than text.
pub fn contains_markup(template: &str) -> bool {
    MARKUP_TAG.is_match(template)
}
