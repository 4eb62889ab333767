//! This module writes a [`Document`] back out as HTML.

use super::dom::{Document, Element, NodeData, NodeId};
use super::entities::{escape_attr, escape_text};
use super::parser::is_void;
use crate::runtime::script::inline_handler;
use slog::{debug, trace};

/// The main serialize function.
pub fn serialize(document: &Document) -> String {
    debug!(slog_scope::logger(), "Beginning serialization...");

    let mut output = String::new();
    for child in document.children(document.root()) {
        serialize_node(document, *child, false, &mut output);
    }

    debug!(slog_scope::logger(), "Serialization complete");
    output
}

/// Serialize one node and everything below it.
///
/// `raw` is set for the children of `<script>` and `<style>`, whose text is
/// written unescaped.
fn serialize_node(document: &Document, id: NodeId, raw: bool, output: &mut String) {
    let node = match document.node(id) {
        Some(n) => n,
        None => return,
    };

    match &node.data {
        NodeData::Root => {}
        NodeData::Doctype(d) => output.push_str(d),
        NodeData::Comment(c) => {
            output.push_str("<!--");
            output.push_str(c);
            output.push_str("-->");
        }
        NodeData::Text(t) => {
            if raw {
                output.push_str(t);
            } else {
                output.push_str(&escape_text(t));
            }
        }
        NodeData::Element(element) => {
            trace!(slog_scope::logger(), "Serializing <{}>", element.name);
            open_tag(element, output);
            if is_void(&element.name) {
                return;
            }
            let raw_children = element.name == "script" || element.name == "style";
            for child in &node.children {
                serialize_node(document, *child, raw_children, output);
            }
            output.push_str("</");
            output.push_str(&element.name);
            output.push('>');
        }
    }
}

/// Write an element's start tag, including its handler slots.
fn open_tag(element: &Element, output: &mut String) {
    output.push('<');
    output.push_str(&element.name);

    for (name, value) in &element.attributes {
        // A filled handler slot owns its inline attribute.
        if (name == "onclick" && element.on_click.is_some())
            || (name == "onkeypress" && element.on_key_press.is_some())
        {
            continue;
        }
        push_attr(name, value, output);
    }

    if let Some(handler) = &element.on_click {
        push_attr("onclick", &inline_handler(handler), output);
    }
    if let Some(handler) = &element.on_key_press {
        push_attr("onkeypress", &inline_handler(handler), output);
    }

    output.push('>');
}

fn push_attr(name: &str, value: &str, output: &mut String) {
    output.push(' ');
    output.push_str(name);
    if !value.is_empty() {
        output.push_str("=\"");
        output.push_str(&escape_attr(value));
        output.push('"');
    }
}
