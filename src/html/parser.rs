//! This module contains the HTML parser. It converts a collection of tokens
//! into a [`Document`].

use super::dom::{Document, Element, NodeData, NodeId};
use super::entities::decode;
use super::lexer::{Token, TokenType};
use ansi_term::Color;
use phf::phf_set;
use slog::{debug, trace, warn};

/// Elements that never have children.
static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "source", "track", "wbr",
};

/// Whether an element never takes children.
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(name)
}

/// The contents of a start tag.
#[derive(Debug, PartialEq, Eq)]
struct Tag {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
}

/// The main parser function.
pub fn parser(tokens: &[Token]) -> Result<Document, String> {
    debug!(slog_scope::logger(), "Starting parser...");

    let mut document = Document::new();
    let root = document.root();
    build(&mut document, root, tokens)?;

    debug!(slog_scope::logger(), "Parsing completed");
    Ok(document)
}

/// Build the nodes described by `tokens` as children of `parent`.
///
/// An end tag closes the nearest open element with the same name (and
/// everything opened inside it). End tags with no matching open element are
/// dropped. Elements still open at the end of the tokens are closed there.
pub fn build(document: &mut Document, parent: NodeId, tokens: &[Token]) -> Result<(), String> {
    let mut open: Vec<NodeId> = vec![parent];

    for token in tokens {
        let current = *open.last().unwrap_or(&parent);

        match token.token_type {
            TokenType::Text => {
                let node = document.create_text(&decode(token.contents));
                document.append_child(current, node);
            }
            TokenType::RawText => {
                let node = document.create_text(token.contents);
                document.append_child(current, node);
            }
            TokenType::Comment => {
                let len = token.contents.len();
                let body = &token.contents[4..len - 3];
                let node = document.create_node(NodeData::Comment(body.to_string()));
                document.append_child(current, node);
            }
            TokenType::Declaration => {
                let node = document.create_node(NodeData::Doctype(token.contents.to_string()));
                document.append_child(current, node);
            }
            TokenType::StartTag => {
                let tag = parse_tag(token.contents)?;
                trace!(slog_scope::logger(), "Opening <{}>", tag.name);

                let mut element = Element::new(&tag.name);
                for (name, value) in tag.attributes {
                    // The first of two duplicate attributes wins.
                    if element.attr(&name).is_none() {
                        element.attributes.push((name, value));
                    }
                }

                let node = document.create_node(NodeData::Element(element));
                document.append_child(current, node);
                if !tag.self_closing && !is_void(&tag.name) {
                    open.push(node);
                }
            }
            TokenType::EndTag => {
                let name = end_tag_name(token.contents);
                trace!(slog_scope::logger(), "Closing </{}>", name);

                // Never close past the parent the tokens are being built into.
                let position = open
                    .iter()
                    .enumerate()
                    .skip(1)
                    .rev()
                    .find(|(_, id)| document.element(**id).map(|e| e.name.as_str()) == Some(name.as_str()))
                    .map(|(i, _)| i);

                match position {
                    Some(i) => open.truncate(i),
                    None => {
                        if !is_void(&name) {
                            warn!(
                                slog_scope::logger(),
                                "Dropping unmatched end tag {}", token.contents
                            );
                            eprintln!(
                                "{} Dropping unmatched end tag {}",
                                Color::Yellow.paint("WARN"),
                                Color::Blue.paint(token.contents)
                            );
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Get the lower-cased element name from an end tag.
fn end_tag_name(contents: &str) -> String {
    contents
        .trim_start_matches("</")
        .trim_end_matches('>')
        .trim()
        .to_ascii_lowercase()
}

/// Parse a start tag into its name, attributes, and self-closing flag.
fn parse_tag(contents: &str) -> Result<Tag, String> {
    let inner = contents
        .strip_prefix('<')
        .and_then(|c| c.strip_suffix('>'))
        .ok_or_else(|| format!("malformed tag {}", contents))?;

    let self_closing = inner.ends_with('/');
    let inner = inner.trim_end_matches('/');
    let bytes = inner.as_bytes();

    // The element name
    let mut i = 0;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'/' {
        i += 1;
    }
    let name = inner[..i].to_ascii_lowercase();
    if name.is_empty() {
        return Err(format!("tag with no name: {}", contents));
    }

    // The attributes
    let mut attributes = Vec::new();
    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        let start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        let attr_name = inner[start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = String::new();
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(format!("unterminated attribute value in {}", contents));
                }
                value = decode(&inner[value_start..i]);
                i += 1;
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = decode(&inner[value_start..i]);
            }
        }

        if !attr_name.is_empty() {
            attributes.push((attr_name, value));
        }
    }

    Ok(Tag {
        name,
        attributes,
        self_closing,
    })
}

#[cfg(test)]
mod tests {
    use super::super::lexer::lexer;
    use super::*;

    fn parse(input: &str) -> Document {
        parser(&lexer(input).unwrap()).unwrap()
    }

    mod tags {
        use super::*;

        #[test]
        fn attributes() {
            let tag = parse_tag(r#"<SPAN class="reference" data-url='https://x?a=1&amp;b=2' data-title=Paper hidden>"#)
                .unwrap();
            assert_eq!(tag.name, "span");
            assert_eq!(
                tag.attributes,
                vec![
                    ("class".to_string(), "reference".to_string()),
                    ("data-url".to_string(), "https://x?a=1&b=2".to_string()),
                    ("data-title".to_string(), "Paper".to_string()),
                    ("hidden".to_string(), "".to_string()),
                ]
            );
            assert!(!tag.self_closing);
        }

        #[test]
        fn self_closing() {
            let tag = parse_tag(r#"<img src="a.png" />"#).unwrap();
            assert_eq!(tag.name, "img");
            assert!(tag.self_closing);
            assert_eq!(tag.attributes.len(), 1);
        }

        #[test]
        fn spaces_around_equals() {
            let tag = parse_tag(r#"<a href = "x">"#).unwrap();
            assert_eq!(tag.attributes, vec![("href".to_string(), "x".to_string())]);
        }
    }

    mod tree {
        use super::*;

        #[test]
        fn nesting() {
            let doc = parse("<div><p>a<b>b</b></p>c</div>");
            let root = doc.root();
            let div = doc.children(root)[0];
            assert_eq!(doc.element(div).unwrap().name, "div");
            assert_eq!(doc.children(div).len(), 2);
            let p = doc.children(div)[0];
            assert_eq!(doc.text_content(p), "ab");
            assert_eq!(doc.text_content(div), "abc");
        }

        #[test]
        fn void_elements() {
            let doc = parse("<p>a<br>b<img src=x>c</p>");
            let p = doc.children(doc.root())[0];
            assert_eq!(doc.children(p).len(), 5);
            assert_eq!(doc.text_content(p), "abc");
        }

        #[test]
        fn unmatched_end_tag() {
            let doc = parse("<p>a</span>b</p>");
            let p = doc.children(doc.root())[0];
            assert_eq!(doc.text_content(p), "ab");
            assert_eq!(doc.children(doc.root()).len(), 1);
        }

        #[test]
        fn end_tag_closes_inner_elements() {
            let doc = parse("<div><p>a<em>b</div>c");
            let root = doc.root();
            assert_eq!(doc.children(root).len(), 2);
            assert_eq!(doc.text_content(doc.children(root)[1]), "c");
        }

        #[test]
        fn unclosed_elements() {
            let doc = parse("<ol id=\"reference-list\"><li>one");
            let ol = doc.get_element_by_id("reference-list").unwrap();
            assert_eq!(doc.text_content(ol), "one");
        }
    }
}
