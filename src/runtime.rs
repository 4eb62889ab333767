//! Running the navigation handlers.
//!
//! [`page`] executes handlers against a simulated page (viewport, layout, and
//! timers). [`script`] is the browser-side equivalent written into the output
//! document.

pub mod page;
pub mod script;

pub use page::{Dispatch, FixedLayout, Layout, Page, Rect, Scroll, Viewport};
