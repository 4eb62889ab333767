//! A simulated page for running navigation handlers.
//!
//! The page owns the processed [`Document`], a viewport, a [`Layout`] that
//! says where elements are, and a millisecond clock. Highlight removals are
//! fire-and-forget timers on that clock: nothing cancels them and nothing
//! serializes overlapping highlights on the same element.

use crate::config::{ProcessorConfig, ScrollBehavior};
use crate::html::{Document, Handler, NodeId};
use slog::{debug, trace};
use std::collections::HashMap;

/// An element's box, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

/// Where elements are laid out.
pub trait Layout {
    /// The box of `node`, in document coordinates.
    fn bounding_box(&self, document: &Document, node: NodeId) -> Rect;
}

/// A [`Layout`] that looks boxes up by element id. Elements without an entry
/// have an empty box at the top of the document.
#[derive(Debug, Clone, Default)]
pub struct FixedLayout {
    boxes: HashMap<String, Rect>,
}

impl FixedLayout {
    pub fn new() -> FixedLayout {
        FixedLayout::default()
    }

    /// Place the element with id `id`.
    pub fn with_box(mut self, id: &str, top: f64, height: f64) -> FixedLayout {
        self.boxes.insert(id.to_string(), Rect { top, height });
        self
    }
}

impl Layout for FixedLayout {
    fn bounding_box(&self, document: &Document, node: NodeId) -> Rect {
        document
            .element(node)
            .and_then(|e| e.id())
            .and_then(|id| self.boxes.get(id))
            .copied()
            .unwrap_or_default()
    }
}

/// The visible part of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub inner_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            scroll_y: 0.0,
            inner_height: 800.0,
        }
    }
}

/// A scroll performed by a handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scroll {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// What happened when an event was dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// A handler ran.
    pub handled: bool,
    /// The handler prevented the default action (the anchor jump).
    pub default_prevented: bool,
}

/// A pending highlight removal.
#[derive(Debug, Clone)]
struct Timer {
    due: u64,
    node: NodeId,
}

/// A document loaded into a simulated browsing context.
pub struct Page {
    pub document: Document,
    pub viewport: Viewport,
    layout: Box<dyn Layout>,
    highlight_class: String,
    highlight_duration: u64,
    scroll_behavior: ScrollBehavior,
    now: u64,
    timers: Vec<Timer>,
    scrolls: Vec<Scroll>,
}

impl Page {
    /// Creates a new [`Page`] with the default viewport.
    pub fn new(document: Document, layout: Box<dyn Layout>, config: &ProcessorConfig) -> Page {
        Page {
            document,
            viewport: Viewport::default(),
            layout,
            highlight_class: config.highlight_class.clone(),
            highlight_duration: config.highlight_duration,
            scroll_behavior: config.scroll_behavior,
            now: 0,
            timers: Vec::new(),
            scrolls: Vec::new(),
        }
    }

    /// Milliseconds since the page was created.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Every scroll so far, oldest first.
    pub fn scrolls(&self) -> &[Scroll] {
        &self.scrolls
    }

    /// The number of highlight removals still waiting to run.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether the element with id `id` currently has the highlight class.
    pub fn is_highlighted(&self, id: &str) -> bool {
        self.document
            .get_element_by_id(id)
            .and_then(|n| self.document.element(n))
            .map_or(false, |e| e.has_class(&self.highlight_class))
    }

    /// Click the element with id `id`.
    pub fn click(&mut self, id: &str) -> Result<Dispatch, String> {
        let handler = self.element_handler(id, |e| e.on_click.clone())?;
        match handler {
            Some(h) => self.run(&h),
            None => Ok(Dispatch::default()),
        }
    }

    /// Press `key` while the element with id `id` has focus. Only `Enter` and
    /// space activate a marker.
    pub fn key_press(&mut self, id: &str, key: &str) -> Result<Dispatch, String> {
        let handler = self.element_handler(id, |e| e.on_key_press.clone())?;
        match handler {
            Some(h) if key == "Enter" || key == " " => self.run(&h),
            _ => Ok(Dispatch::default()),
        }
    }

    /// Add the highlight class to the element with id `id` and schedule its
    /// removal.
    pub fn highlight(&mut self, id: &str) -> Result<(), String> {
        let node = self.resolve(id)?;
        trace!(slog_scope::logger(), "Highlighting {} at {}ms", id, self.now);

        if let Some(e) = self.document.element_mut(node) {
            e.add_class(&self.highlight_class);
        }
        self.timers.push(Timer {
            due: self.now + self.highlight_duration,
            node,
        });
        Ok(())
    }

    /// Move the clock forward, running every timer that comes due, earliest
    /// first (and in scheduling order when two are due together).
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;

        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= self.now)
                .min_by_key(|(i, t)| (t.due, *i))
                .map(|(i, _)| i);

            let timer = match next {
                Some(i) => self.timers.remove(i),
                None => break,
            };

            trace!(
                slog_scope::logger(),
                "Removing highlight from node {} (due {}ms)",
                timer.node,
                timer.due
            );
            if let Some(e) = self.document.element_mut(timer.node) {
                e.remove_class(&self.highlight_class);
            }
        }
    }

    /// Run a handler. Targets are resolved before anything changes, so a
    /// handler with a missing target fails without touching the page.
    fn run(&mut self, handler: &Handler) -> Result<Dispatch, String> {
        match handler {
            Handler::ScrollToEntry { target } => {
                debug!(slog_scope::logger(), "Navigating to {}", target);
                let node = self.resolve(target)?;
                let rect = self.layout.bounding_box(&self.document, node);

                // scrollIntoView() aligns the top of the element with the top
                // of the viewport.
                self.scroll_to(rect.top);
                self.highlight(target)?;

                Ok(Dispatch {
                    handled: true,
                    default_prevented: false,
                })
            }
            Handler::CenterOnOccurrence { target } => {
                debug!(slog_scope::logger(), "Returning to {}", target);
                let node = self.resolve(target)?;
                let rect = self.layout.bounding_box(&self.document, node);

                // The box relative to the viewport, then back to the document.
                let client_top = rect.top - self.viewport.scroll_y;
                let absolute_top = client_top + self.viewport.scroll_y;
                let middle = absolute_top - (self.viewport.inner_height / 2.0) + (rect.height / 2.0);

                self.scroll_to(middle);
                self.highlight(target)?;

                Ok(Dispatch {
                    handled: true,
                    default_prevented: true,
                })
            }
        }
    }

    /// Scroll the viewport. The page can't scroll above its top.
    fn scroll_to(&mut self, top: f64) {
        let top = top.max(0.0);
        self.viewport.scroll_y = top;
        self.scrolls.push(Scroll {
            top,
            behavior: self.scroll_behavior,
        });
    }

    fn resolve(&self, id: &str) -> Result<NodeId, String> {
        match self.document.get_element_by_id(id) {
            Some(n) => Ok(n),
            None => {
                let err_msg = format!("no element with id \"{}\"", id);
                Err(err_msg)
            }
        }
    }

    fn element_handler<F>(&self, id: &str, slot: F) -> Result<Option<Handler>, String>
    where
        F: Fn(&crate::html::Element) -> Option<Handler>,
    {
        let node = self.resolve(id)?;
        Ok(self.document.element(node).and_then(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackLinkPolicy;
    use crate::html::parse;
    use crate::refs::process;

    const DOCUMENT: &str = r#"<body>
<p>See <span class="reference" data-url="https://x" data-title="Paper A" data-author="Smith" data-date="2021">a</span>.</p>
<p>Also <span class="reference" data-url="https://y" data-title="Paper B">b</span>.</p>
<p>And <span class="reference" data-url="https://x">c</span>.</p>
<ol id="reference-list"></ol>
</body>"#;

    fn page_with(config: &ProcessorConfig) -> Page {
        let mut document = parse(DOCUMENT).unwrap();
        process(&mut document, config).unwrap();
        let layout = FixedLayout::new()
            .with_box("ref-occurrence-1-1", 100.0, 20.0)
            .with_box("ref-occurrence-2-2", 1500.0, 20.0)
            .with_box("ref-occurrence-1-3", 2600.0, 20.0)
            .with_box("ref-1", 5000.0, 40.0)
            .with_box("ref-2", 5040.0, 40.0);
        Page::new(document, Box::new(layout), config)
    }

    fn page() -> Page {
        page_with(&ProcessorConfig::default())
    }

    /// The id of the first back-link in a reference entry.
    fn back_link_id(page: &mut Page, entry: &str) -> String {
        let li = page.document.get_element_by_id(entry).unwrap();
        let link = page
            .document
            .descendants(li)
            .into_iter()
            .find(|n| {
                page.document
                    .element(*n)
                    .map_or(false, |e| e.has_class("back-to-text"))
            })
            .unwrap();
        let id = format!("{}-back", entry);
        page.document.element_mut(link).unwrap().set_attr("id", &id);
        id
    }

    mod markers {
        use super::*;

        #[test]
        fn click_scrolls_and_highlights() {
            let mut page = page();
            let dispatch = page.click("ref-occurrence-1-3").unwrap();

            assert!(dispatch.handled);
            assert!(!dispatch.default_prevented);
            assert_eq!(page.viewport.scroll_y, 5000.0);
            assert_eq!(
                page.scrolls(),
                &[Scroll {
                    top: 5000.0,
                    behavior: ScrollBehavior::Smooth
                }]
            );
            assert!(page.is_highlighted("ref-1"));
            assert!(!page.is_highlighted("ref-2"));
        }

        #[test]
        fn highlight_lasts_exactly_the_duration() {
            let mut page = page();
            page.click("ref-occurrence-2-2").unwrap();

            assert!(page.is_highlighted("ref-2"));
            page.advance(1999);
            assert!(page.is_highlighted("ref-2"));
            page.advance(1);
            assert!(!page.is_highlighted("ref-2"));
            assert_eq!(page.pending_timers(), 0);
        }

        #[test]
        fn enter_and_space_activate() {
            let mut page = page();

            let ignored = page.key_press("ref-occurrence-1-1", "a").unwrap();
            assert!(!ignored.handled);
            assert!(page.scrolls().is_empty());

            assert!(page.key_press("ref-occurrence-1-1", "Enter").unwrap().handled);
            assert!(page.key_press("ref-occurrence-2-2", " ").unwrap().handled);
            assert_eq!(page.scrolls().len(), 2);
            assert_eq!(page.viewport.scroll_y, 5040.0);
            assert!(page.is_highlighted("ref-1"));
            assert!(page.is_highlighted("ref-2"));
        }

        #[test]
        fn auto_scroll_behavior() {
            let config = ProcessorConfig {
                scroll_behavior: ScrollBehavior::Auto,
                highlight_duration: 500,
                ..ProcessorConfig::default()
            };
            let mut page = page_with(&config);
            page.click("ref-occurrence-1-1").unwrap();
            assert_eq!(page.scrolls()[0].behavior, ScrollBehavior::Auto);
            page.advance(500);
            assert!(!page.is_highlighted("ref-1"));
        }

        #[test]
        fn missing_entry_fails_without_changes() {
            let mut page = page();
            let li = page.document.get_element_by_id("ref-1").unwrap();
            page.document.detach(li);

            let err = page.click("ref-occurrence-1-1").unwrap_err();
            assert!(err.contains("ref-1"));
            assert!(page.scrolls().is_empty());
            assert_eq!(page.pending_timers(), 0);
        }
    }

    mod back_links {
        use super::*;

        #[test]
        fn click_centers_first_occurrence() {
            let mut page = page();
            page.viewport.scroll_y = 5000.0;
            let link = back_link_id(&mut page, "ref-1");

            let dispatch = page.click(&link).unwrap();
            assert!(dispatch.handled);
            assert!(dispatch.default_prevented);

            // 100 - 800 / 2 + 20 / 2 is above the top of the page.
            assert_eq!(page.viewport.scroll_y, 0.0);
            assert!(page.is_highlighted("ref-occurrence-1-1"));
            assert!(!page.is_highlighted("ref-occurrence-1-3"));
        }

        #[test]
        fn centering() {
            let mut page = page();
            page.viewport.scroll_y = 5000.0;
            let link = back_link_id(&mut page, "ref-2");

            page.click(&link).unwrap();
            assert_eq!(page.viewport.scroll_y, 1500.0 - 400.0 + 10.0);
            assert!(page.is_highlighted("ref-occurrence-2-2"));
            page.advance(2000);
            assert!(!page.is_highlighted("ref-occurrence-2-2"));
        }

        #[test]
        fn key_press_does_nothing() {
            let mut page = page();
            let link = back_link_id(&mut page, "ref-1");
            assert!(!page.key_press(&link, "Enter").unwrap().handled);
        }

        #[test]
        fn every_occurrence_reaches_later_citations() {
            let config = ProcessorConfig {
                back_links: BackLinkPolicy::EveryOccurrence,
                ..ProcessorConfig::default()
            };
            let mut page = page_with(&config);
            let li = page.document.get_element_by_id("ref-1").unwrap();
            let links: Vec<NodeId> = page
                .document
                .descendants(li)
                .into_iter()
                .filter(|n| {
                    page.document
                        .element(*n)
                        .map_or(false, |e| e.has_class("back-to-text"))
                })
                .collect();
            assert_eq!(links.len(), 2);
            page.document
                .element_mut(links[1])
                .unwrap()
                .set_attr("id", "second-back");

            page.click("second-back").unwrap();
            assert_eq!(page.viewport.scroll_y, 2600.0 - 400.0 + 10.0);
            assert!(page.is_highlighted("ref-occurrence-1-3"));
        }

        #[test]
        fn missing_occurrence_fails() {
            let mut page = page();
            let link = back_link_id(&mut page, "ref-1");
            let occurrence = page.document.get_element_by_id("ref-occurrence-1-1").unwrap();
            page.document
                .element_mut(occurrence)
                .unwrap()
                .set_attr("id", "renamed");

            assert!(page.click(&link).is_err());
            assert!(page.scrolls().is_empty());
        }
    }

    mod highlight {
        use super::*;

        #[test]
        fn overlapping_highlights_are_not_serialized() {
            let mut page = page();
            page.highlight("ref-1").unwrap();
            page.advance(1500);
            page.highlight("ref-1").unwrap();
            assert_eq!(page.pending_timers(), 2);

            // The first removal still runs on schedule and cuts the second
            // highlight short.
            page.advance(500);
            assert!(!page.is_highlighted("ref-1"));
            assert_eq!(page.pending_timers(), 1);

            page.advance(1500);
            assert!(!page.is_highlighted("ref-1"));
            assert_eq!(page.pending_timers(), 0);
        }

        #[test]
        fn removal_follows_the_element() {
            let mut page = page();
            page.highlight("ref-2").unwrap();
            let li = page.document.get_element_by_id("ref-2").unwrap();
            page.document.element_mut(li).unwrap().set_attr("id", "moved");

            page.advance(2000);
            let e = page.document.element(li).unwrap();
            assert!(!e.has_class("reference-highlight"));
        }

        #[test]
        fn unknown_id() {
            let mut page = page();
            assert!(page.highlight("nope").unwrap_err().contains("nope"));
        }
    }
}
