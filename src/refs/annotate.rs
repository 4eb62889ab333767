//! Rewriting the markers in place.

use super::{CitationMarker, Occurrence, ReferenceTable};
use crate::config::ProcessorConfig;
use crate::html::{Document, Handler};
use slog::{debug, trace};

/// Rewrite every marker, in document order.
///
/// Each marker gets a new `id` (any existing one is lost), the text `[n]`,
/// `role` and `tabindex` attributes, and navigation handlers that replace any
/// it already had. Its occurrence is recorded on the reference entry.
pub fn annotate(
    document: &mut Document,
    markers: &[CitationMarker],
    table: &mut ReferenceTable,
    config: &ProcessorConfig,
) -> Result<(), String> {
    debug!(slog_scope::logger(), "Annotating markers...");

    // Counts every marker, not every marker of one reference.
    let mut occurrence_counter = 1;

    for marker in markers {
        let ref_id = match table.id_for(&marker.key) {
            Some(id) => id,
            None => {
                let err_msg = format!("marker key {} was never numbered", marker.key);
                return Err(err_msg);
            }
        };

        let occurrence_id = format!(
            "{}{}-{}",
            config.occurrence_id_prefix, ref_id, occurrence_counter
        );
        trace!(
            slog_scope::logger(),
            "Marker {} is occurrence {}",
            marker.key,
            occurrence_id
        );

        match table.entry_mut(ref_id) {
            Some(entry) => entry.occurrences.push(Occurrence {
                element_id: occurrence_id.clone(),
                index: occurrence_counter,
            }),
            None => {
                let err_msg = format!("no reference entry for id {}", ref_id);
                return Err(err_msg);
            }
        }

        document.set_text_content(marker.node, &format!("[{}]", ref_id));

        let element = match document.element_mut(marker.node) {
            Some(e) => e,
            None => {
                let err_msg = format!("marker node {} is not an element", marker.node);
                return Err(err_msg);
            }
        };

        element.set_attr("id", &occurrence_id);
        element.set_attr("role", &config.ref_role);
        element.set_attr("tabindex", &config.ref_tab_index);

        let target = format!("{}{}", config.ref_id_prefix, ref_id);
        element.remove_attr("onclick");
        element.remove_attr("onkeypress");
        element.on_click = Some(Handler::ScrollToEntry {
            target: target.clone(),
        });
        element.on_key_press = Some(Handler::ScrollToEntry { target });

        occurrence_counter += 1;
    }

    debug!(slog_scope::logger(), "Markers annotated.");
    Ok(())
}
