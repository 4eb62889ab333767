//! The browser runtime written into processed documents.
//!
//! Handler slots are serialized as inline `onclick`/`onkeypress` attributes
//! that call into this script, so the output keeps working without citelist.

use crate::config::ProcessorConfig;
use crate::html::{Document, Handler, NodeId, Selector};
use crate::refs::template::fill;
use slog::debug;

/// The runtime. The `%...%` placeholders are filled with JSON literals.
pub const RUNTIME_JS: &str = r#"
(function () {
    var highlightClass = %highlightClass%;
    var highlightDuration = %highlightDuration%;
    var scrollBehavior = %scrollBehavior%;

    function highlight(id) {
        var element = document.getElementById(id);
        element.classList.add(highlightClass);
        setTimeout(function () {
            element.classList.remove(highlightClass);
        }, highlightDuration);
    }

    window.citelistNavigate = function (event, refId) {
        if (event.type === 'keypress' && event.key !== 'Enter' && event.key !== ' ') {
            return;
        }
        document.getElementById(refId).scrollIntoView({ behavior: scrollBehavior });
        highlight(refId);
    };

    window.citelistBack = function (event, occurrenceId) {
        event.preventDefault();
        var element = document.getElementById(occurrenceId);
        var rect = element.getBoundingClientRect();
        var absoluteTop = rect.top + window.pageYOffset;
        var middle = absoluteTop - (window.innerHeight / 2) + (rect.height / 2);
        window.scrollTo({ top: middle, behavior: scrollBehavior });
        highlight(occurrenceId);
    };
})();
"#;

/// The attribute value that runs `handler` in the browser.
pub fn inline_handler(handler: &Handler) -> String {
    match handler {
        Handler::ScrollToEntry { target } => {
            format!("citelistNavigate(event, {})", js_string(target))
        }
        Handler::CenterOnOccurrence { target } => {
            format!("citelistBack(event, {})", js_string(target))
        }
    }
}

/// The runtime with the configuration filled in.
pub fn runtime_script(config: &ProcessorConfig) -> String {
    let highlight_class = js_string(&config.highlight_class);
    let highlight_duration = config.highlight_duration.to_string();
    let scroll_behavior = js_string(config.scroll_behavior.as_str());

    fill(
        RUNTIME_JS,
        &[
            ("%highlightClass%", highlight_class.as_str()),
            ("%highlightDuration%", highlight_duration.as_str()),
            ("%scrollBehavior%", scroll_behavior.as_str()),
        ],
    )
}

/// Add the runtime as the last child of `<body>`, or at the end of the
/// document if there is no body.
pub fn inject_runtime(document: &mut Document, config: &ProcessorConfig) -> Result<NodeId, String> {
    debug!(slog_scope::logger(), "Injecting runtime script...");

    let body = document
        .select_all(&Selector::parse("body")?)
        .first()
        .copied()
        .unwrap_or_else(|| document.root());

    let script = document.create_element("script");
    let contents = runtime_script(config);
    document.set_text_content(script, &contents);
    document.append_child(body, script);

    debug!(slog_scope::logger(), "Runtime script injected.");
    Ok(script)
}

/// A JavaScript string literal. JSON strings are valid JavaScript.
fn js_string(value: &str) -> String {
    // Serializing a str can't fail.
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
