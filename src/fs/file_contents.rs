//! Contains the constants for file contents.

/// Contents of the blank configuration file.
pub static BLANK_CONFIG_CONTENTS: &str = r##"// citelist configuration.
//
// Every setting below is shown with its default value. Uncomment and edit the
// ones you want to change; anything left out keeps its default.
(
    // How long a navigation target stays highlighted, in milliseconds.
    highlight_duration: 2000,

    // The class added to a navigation target while it is highlighted.
    // highlight_class: "reference-highlight",

    // Which elements are citation markers (tag, .class, #id, or a compound).
    // marker_selector: ".reference",

    // The id of the element the reference list is added to.
    // list_id: "reference-list",

    // Smooth or Auto.
    // scroll_behavior: Smooth,

    // Prefixes for the ids given to list entries and to markers.
    // ref_id_prefix: "ref-",
    // occurrence_id_prefix: "ref-occurrence-",

    // What follows the linked title. %author% and %date% are replaced. If
    // this contains a tag, it is inserted as HTML and the author and date are
    // NOT escaped.
    // format_template: ", <span class=\"ref-author\">%author%</span>, <span class=\"ref-date\">%date%.</span>",

    // Back-link text. %index% is replaced.
    // back_link_text: "↑%index%",
    // back_links_separator: ", ",
    // back_links_margin_left: "10px",
    // separator_font_size: "0.8em",
    // separator_color: "#333333",
    // back_link_aria_label: "Back to text for reference %refId%, occurrence %index%",

    // Attributes set on markers and on the external links.
    // ref_role: "link",
    // ref_tab_index: "0",
    // external_link_target: "_blank",
    // external_link_rel: "noopener noreferrer",

    // FirstOccurrence (one back-link per reference) or EveryOccurrence.
    // back_links: FirstOccurrence,
)
"##;
