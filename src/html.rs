//! The citelist document layer. Loads an HTML string into a [`Document`],
//! lets the reference processor mutate it, and writes it back out.

pub mod dom;
mod entities;
mod lexer;
mod parser;
pub mod selector;
mod serialize;

pub use dom::{Document, Element, Handler, NodeData, NodeId};
pub use selector::Selector;

use slog::{debug, o};

/// Parse an HTML string into a [`Document`].
pub fn parse(input: &str) -> Result<Document, String> {
    debug!(slog_scope::logger(), "Parsing HTML input...");

    // Lex the input
    let tokens = match slog_scope::scope(&slog_scope::logger().new(o!("fn" => "lexer()")), || {
        lexer::lexer(input)
    }) {
        Ok(t) => t,
        Err(e) => return Err(e),
    };

    // Build the tree
    let document = match slog_scope::scope(&slog_scope::logger().new(o!("fn" => "parser()")), || {
        parser::parser(&tokens)
    }) {
        Ok(d) => d,
        Err(e) => return Err(e),
    };

    debug!(slog_scope::logger(), "HTML input parsed.");
    Ok(document)
}

/// Write a [`Document`] back out as an HTML string.
pub fn serialize(document: &Document) -> String {
    slog_scope::scope(
        &slog_scope::logger().new(o!("fn" => "serialize()")),
        || serialize::serialize(document),
    )
}

impl Document {
    /// Replace the children of `parent` with the nodes parsed from `markup`.
    ///
    /// This is the equivalent of assigning `innerHTML`. Nothing in `markup` is
    /// escaped.
    pub fn set_inner_html(&mut self, parent: NodeId, markup: &str) -> Result<(), String> {
        let tokens = lexer::lexer(markup)?;
        self.clear_children(parent);
        parser::build(self, parent, &tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let input = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Test &amp; Title</title></head>
<body>
<!-- a comment -->
<p class="intro">Some <em>text</em> here.<br>More text.</p>
<script>if (a < b && c > d) { run(); }</script>
</body>
</html>"#;
        let document = parse(input).unwrap();
        assert_eq!(serialize(&document), input);
    }

    #[test]
    fn quoting_normalized() {
        let document = parse("<p data-a='one' data-b=two hidden>x</p>").unwrap();
        assert_eq!(
            serialize(&document),
            r#"<p data-a="one" data-b="two" hidden>x</p>"#
        );
    }

    #[test]
    fn inner_html() {
        let mut document = parse(r#"<div id="target"><p>old</p></div>"#).unwrap();
        let target = document.get_element_by_id("target").unwrap();
        document
            .set_inner_html(target, r#", <span class="a">Smith</span>"#)
            .unwrap();
        assert_eq!(
            serialize(&document),
            r#"<div id="target">, <span class="a">Smith</span></div>"#
        );
    }
}
