//! The reference processor.
//!
//! Runs once over a loaded [`Document`]: collects the citation markers, gives
//! each unique URL a number, rewrites the markers, and fills in the reference
//! list. Running it again on its own output is not idempotent: the markers
//! are still markers, so the list entries are appended a second time and the
//! occurrence ids are reassigned.

mod annotate;
mod render;
mod scan;
pub mod template;

use crate::config::ProcessorConfig;
use crate::html::{Document, NodeId, Selector};
use serde::Serialize;
use slog::{debug, o};
use std::collections::HashMap;

/// A citation marker read from the document.
///
/// * `node`: The marker element.
/// * `key`: The `data-url` attribute. This is the identity used for
///   deduplication. A marker with no `data-url` gets the literal key
///   `undefined`, so all such markers share one reference.
/// * `title`, `author`, `date`: The matching `data-*` attributes, or an empty
///   string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationMarker {
    pub node: NodeId,
    pub key: String,
    pub title: String,
    pub author: String,
    pub date: String,
}

/// One appearance of a marker in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub element_id: String,
    /// The document-wide occurrence counter when this marker was reached.
    /// Not reset per reference.
    pub index: usize,
}

/// A numbered, deduplicated reference.
///
/// The metadata comes from the first marker seen with the key; later markers
/// with the same key only add occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceEntry {
    pub id: usize,
    pub key: String,
    pub title: String,
    pub author: String,
    pub date: String,
    pub occurrences: Vec<Occurrence>,
}

/// The key -> id and id -> entry lookups built by the processor.
///
/// Ids are dense, starting at 1, so entry `n` lives at `entries[n - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReferenceTable {
    #[serde(skip)]
    ids: HashMap<String, usize>,
    pub entries: Vec<ReferenceEntry>,
}

impl ReferenceTable {
    pub fn new() -> ReferenceTable {
        ReferenceTable::default()
    }

    /// The id assigned to `key`, if any.
    pub fn id_for(&self, key: &str) -> Option<usize> {
        self.ids.get(key).copied()
    }

    pub fn entry(&self, id: usize) -> Option<&ReferenceEntry> {
        self.entries.get(id.checked_sub(1)?)
    }

    pub fn entry_mut(&mut self, id: usize) -> Option<&mut ReferenceEntry> {
        self.entries.get_mut(id.checked_sub(1)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the id for the marker's key, creating a new entry from the
    /// marker's metadata if the key hasn't been seen.
    fn insert(&mut self, marker: &CitationMarker) -> usize {
        if let Some(id) = self.id_for(&marker.key) {
            return id;
        }
        let id = self.entries.len() + 1;
        self.ids.insert(marker.key.clone(), id);
        self.entries.push(ReferenceEntry {
            id,
            key: marker.key.clone(),
            title: marker.title.clone(),
            author: marker.author.clone(),
            date: marker.date.clone(),
            occurrences: Vec::new(),
        });
        id
    }
}

/// The main reference-processor function.
pub fn process(document: &mut Document, config: &ProcessorConfig) -> Result<ReferenceTable, String> {
    debug!(slog_scope::logger(), "Starting reference processor...");

    let selector = Selector::parse(&config.marker_selector)?;

    // Collect the markers
    let markers = slog_scope::scope(
        &slog_scope::logger().new(o!("fn" => "collect_markers()")),
        || scan::collect_markers(document, &selector),
    );

    // Number the unique references
    let mut table = slog_scope::scope(
        &slog_scope::logger().new(o!("fn" => "deduplicate()")),
        || scan::deduplicate(&markers),
    );

    // Rewrite the markers
    match slog_scope::scope(&slog_scope::logger().new(o!("fn" => "annotate()")), || {
        annotate::annotate(document, &markers, &mut table, config)
    }) {
        Ok(_) => (),
        Err(e) => return Err(e),
    };

    // Build the reference list
    match slog_scope::scope(&slog_scope::logger().new(o!("fn" => "render()")), || {
        render::render(document, &table, config)
    }) {
        Ok(_) => (),
        Err(e) => return Err(e),
    };

    debug!(
        slog_scope::logger(),
        "Reference processing completed: {} markers, {} references",
        markers.len(),
        table.len()
    );
    Ok(table)
}
