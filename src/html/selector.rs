//! Simple selectors for finding marker elements.
//!
//! Supported forms are a tag name, `*`, `.class`, `#id`, and any compound of
//! those (`span.reference`, `.a.b#c`). Combinators and attribute selectors are
//! not.

use super::dom::Element;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A whole compound selector
    static ref COMPOUND: Regex =
        Regex::new(r"^(?P<tag>\*|[A-Za-z][A-Za-z0-9-]*)?(?P<rest>(?:[.#][A-Za-z_-][A-Za-z0-9_-]*)*)$").unwrap();
    /// One class or id part of a compound selector
    static ref PART: Regex = Regex::new(r"(?P<kind>[.#])(?P<name>[A-Za-z_-][A-Za-z0-9_-]*)").unwrap();
}

/// A parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
    id: Option<String>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Selector, String> {
        let trimmed = input.trim();
        let caps = match COMPOUND.captures(trimmed) {
            Some(c) if !trimmed.is_empty() => c,
            _ => {
                let err_msg = format!("unsupported selector \"{}\"", input);
                return Err(err_msg);
            }
        };

        let tag = caps
            .name("tag")
            .map(|t| t.as_str())
            .filter(|t| *t != "*")
            .map(|t| t.to_ascii_lowercase());

        let mut classes = Vec::new();
        let mut id = None;
        if let Some(rest) = caps.name("rest") {
            for part in PART.captures_iter(rest.as_str()) {
                let name = part["name"].to_string();
                if &part["kind"] == "." {
                    classes.push(name);
                } else {
                    id = Some(name);
                }
            }
        }

        Ok(Selector { tag, classes, id })
    }

    /// Whether `element` matches.
    pub fn matches(&self, element: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if &element.name != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| element.has_class(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, attrs: &[(&str, &str)]) -> Element {
        let mut e = Element::new(name);
        for (n, v) in attrs {
            e.set_attr(n, v);
        }
        e
    }

    #[test]
    fn class() {
        let s = Selector::parse(".reference").unwrap();
        assert!(s.matches(&element("span", &[("class", "cite reference")])));
        assert!(!s.matches(&element("span", &[("class", "references")])));
        assert!(!s.matches(&element("span", &[])));
    }

    #[test]
    fn compound() {
        let s = Selector::parse("SPAN.reference#first").unwrap();
        assert!(s.matches(&element("span", &[("class", "reference"), ("id", "first")])));
        assert!(!s.matches(&element("a", &[("class", "reference"), ("id", "first")])));
        assert!(!s.matches(&element("span", &[("class", "reference"), ("id", "second")])));
    }

    #[test]
    fn universal() {
        let s = Selector::parse("*").unwrap();
        assert!(s.matches(&element("p", &[])));
    }

    #[test]
    fn unsupported() {
        assert!(Selector::parse("").unwrap_err().contains("unsupported selector"));
        assert!(Selector::parse("div > p").is_err());
        assert!(Selector::parse("[data-url]").is_err());
    }
}
