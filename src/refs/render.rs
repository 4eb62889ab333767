//! This module contains functionality for rendering the reference list.

use super::template::{contains_markup, fill};
use super::{Occurrence, ReferenceEntry, ReferenceTable};
use crate::config::{BackLinkPolicy, ProcessorConfig};
use crate::html::{Document, Handler, NodeId};
use slog::{debug, trace};

/// The main render function.
///
/// Appends one `<li>` per reference, in id order, to the list container. The
/// container is only looked up once there is something to put in it.
pub fn render(
    document: &mut Document,
    table: &ReferenceTable,
    config: &ProcessorConfig,
) -> Result<(), String> {
    debug!(slog_scope::logger(), "Beginning rendering...");

    if table.is_empty() {
        debug!(slog_scope::logger(), "No references to render");
        return Ok(());
    }

    let list = match document.get_element_by_id(&config.list_id) {
        Some(l) => l,
        None => {
            let err_msg = format!(
                "the document has no reference list container (an element with id \"{}\")",
                config.list_id
            );
            return Err(err_msg);
        }
    };

    for ref_id in 1..=table.len() {
        let entry = match table.entry(ref_id) {
            Some(e) => e,
            None => {
                let err_msg = format!("no reference entry for id {}", ref_id);
                return Err(err_msg);
            }
        };
        let li = render_entry(document, entry, config)?;
        document.append_child(list, li);
    }

    debug!(slog_scope::logger(), "Rendering complete");
    Ok(())
}

/// Build the `<li>` for one reference.
fn render_entry(
    document: &mut Document,
    entry: &ReferenceEntry,
    config: &ProcessorConfig,
) -> Result<NodeId, String> {
    trace!(slog_scope::logger(), "Rendering reference {}...", entry.id);

    let li = document.create_element("li");
    if let Some(e) = document.element_mut(li) {
        e.set_attr("id", &format!("{}{}", config.ref_id_prefix, entry.id));
    }

    // The reference content
    let ref_content = document.create_element("span");

    let ref_link = document.create_element("a");
    if let Some(e) = document.element_mut(ref_link) {
        e.set_attr("href", &entry.key);
        e.set_attr("target", &config.external_link_target);
        e.set_attr("rel", &config.external_link_rel);
    }
    document.set_text_content(ref_link, &entry.title);
    document.append_child(ref_content, ref_link);

    // The author and date. Neither is escaped when the template is markup.
    let formatted = fill(
        &config.format_template,
        &[("%author%", entry.author.as_str()), ("%date%", entry.date.as_str())],
    );
    if contains_markup(&config.format_template) {
        let text_container = document.create_element("span");
        document.set_inner_html(text_container, &formatted)?;
        document.append_child(ref_content, text_container);
    } else {
        let text = document.create_text(&formatted);
        document.append_child(ref_content, text);
    }

    document.append_child(li, ref_content);

    // The back links
    let container = document.create_element("span");
    if let Some(e) = document.element_mut(container) {
        e.add_class("back-links-container");
        e.set_style("margin-left", &config.back_links_margin_left);
    }
    document.append_child(li, container);

    for (position, occurrence) in entry.occurrences.iter().enumerate() {
        if config.back_links == BackLinkPolicy::FirstOccurrence && position > 0 {
            break;
        }

        if !document.children(container).is_empty() {
            let separator = document.create_element("span");
            document.set_text_content(separator, &config.back_links_separator);
            if let Some(e) = document.element_mut(separator) {
                e.set_style("font-size", &config.separator_font_size);
                e.set_style("color", &config.separator_color);
            }
            document.append_child(container, separator);
        }

        let back_link = back_link(document, entry.id, position, occurrence, config);
        document.append_child(container, back_link);
    }

    Ok(li)
}

/// Build one back-link.
///
/// With one back-link per reference the link text carries the reference
/// number. With one per occurrence it carries the occurrence's position within
/// the reference instead, so the links can be told apart.
fn back_link(
    document: &mut Document,
    ref_id: usize,
    position: usize,
    occurrence: &Occurrence,
    config: &ProcessorConfig,
) -> NodeId {
    let ref_id_text = ref_id.to_string();
    let position_text = (position + 1).to_string();

    let link_number = match config.back_links {
        BackLinkPolicy::FirstOccurrence => ref_id_text.as_str(),
        BackLinkPolicy::EveryOccurrence => position_text.as_str(),
    };
    let text = fill(&config.back_link_text, &[("%index%", link_number)]);
    let aria_label = fill(
        &config.back_link_aria_label,
        &[("%refId%", ref_id_text.as_str()), ("%index%", position_text.as_str())],
    );

    let link = document.create_element("a");
    document.set_text_content(link, &text);
    if let Some(e) = document.element_mut(link) {
        e.add_class("back-to-text");
        e.set_attr("href", &format!("#{}", occurrence.element_id));
        e.set_attr("aria-label", &aria_label);
        e.on_click = Some(Handler::CenterOnOccurrence {
            target: occurrence.element_id.clone(),
        });
    }
    link
}
