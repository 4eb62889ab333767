//! Finding the citation markers and numbering the unique references.

use super::{CitationMarker, ReferenceTable};
use crate::html::{Document, Selector};
use ansi_term::Color;
use slog::{debug, trace, warn};

/// The key used for markers with no `data-url`.
pub const MISSING_KEY: &str = "undefined";

/// Collect every marker in document order.
pub fn collect_markers(document: &Document, selector: &Selector) -> Vec<CitationMarker> {
    debug!(slog_scope::logger(), "Collecting markers...");

    let mut markers = Vec::new();
    let mut missing = 0;

    for node in document.select_all(selector) {
        let element = match document.element(node) {
            Some(e) => e,
            None => continue,
        };

        let key = match element.data("url") {
            Some(url) => url.to_string(),
            None => {
                missing += 1;
                MISSING_KEY.to_string()
            }
        };

        let marker = CitationMarker {
            node,
            key,
            title: element.data("title").unwrap_or("").to_string(),
            author: element.data("author").unwrap_or("").to_string(),
            date: element.data("date").unwrap_or("").to_string(),
        };
        trace!(slog_scope::logger(), "Found marker {:?}", marker);
        markers.push(marker);
    }

    if missing > 0 {
        warn!(
            slog_scope::logger(),
            "{} markers have no data-url and share one reference", missing
        );
        eprintln!(
            "{} {} marker(s) have no {} attribute; they will share one reference",
            Color::Yellow.paint("WARN"),
            missing,
            Color::Blue.paint("data-url")
        );
    }

    debug!(slog_scope::logger(), "{} markers collected.", markers.len());
    markers
}

/// Assign an id to each unique key, in the order the keys are first seen.
pub fn deduplicate(markers: &[CitationMarker]) -> ReferenceTable {
    debug!(slog_scope::logger(), "Numbering references...");

    let mut table = ReferenceTable::new();
    for marker in markers {
        let id = table.insert(marker);
        trace!(slog_scope::logger(), "{} -> {}", marker.key, id);
    }

    debug!(slog_scope::logger(), "{} unique references.", table.len());
    table
}
