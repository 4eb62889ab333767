//! The structures and functions for configuration. Must be accessible to main.

use ron::de::from_str;
use serde::{Deserialize, Serialize};
use slog::debug;

/// The overall options.
pub struct CitelistConfig<'a> {
    pub command: CitelistCommand,
    pub output: Output,
    pub format: Format,
    pub input: Option<&'a str>,
    pub output_file: Option<&'a str>,
    pub processor_config: Option<&'a str>,
    pub script: bool,
}

impl CitelistConfig<'_> {
    #[allow(clippy::too_many_arguments)]
    pub fn new<'a>(
        command: CitelistCommand,
        output: Output,
        format: Format,
        input: Option<&'a str>,
        output_file: Option<&'a str>,
        processor_config: Option<&'a str>,
        script: bool,
    ) -> CitelistConfig<'a> {
        CitelistConfig {
            command,
            output,
            format,
            input,
            output_file,
            processor_config,
            script,
        }
    }
}

/// The types of subcommands.
#[derive(PartialEq, Eq, Debug)]
pub enum CitelistCommand {
    Main,
    NewConfigFile,
}

/// Where the result goes.
#[derive(PartialEq, Eq, Debug)]
pub enum Output {
    StandardOut,
    File,
}

/// What the result is.
#[derive(PartialEq, Eq, Debug)]
pub enum Format {
    Html,
    Json,
}

/// How navigation scrolls the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ScrollBehavior {
    Smooth,
    Auto,
}

impl ScrollBehavior {
    /// The value of the `behavior` scroll option.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollBehavior::Smooth => "smooth",
            ScrollBehavior::Auto => "auto",
        }
    }
}

/// Which occurrences of a reference get a back-link.
///
/// `FirstOccurrence` renders one back-link per reference, pointing at the
/// first place it is cited. `EveryOccurrence` renders one per citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum BackLinkPolicy {
    FirstOccurrence,
    EveryOccurrence,
}

/// Reference-processor configuration.
///
/// Every field has a default, so a configuration file only needs to name the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Highlight duration in milliseconds
    pub highlight_duration: u64,
    pub highlight_class: String,
    pub marker_selector: String,
    pub list_id: String,
    pub scroll_behavior: ScrollBehavior,
    pub ref_id_prefix: String,
    pub occurrence_id_prefix: String,
    /// Text after the link; `%author%` and `%date%` are replaced. Interpreted
    /// as markup when it contains a tag.
    pub format_template: String,
    /// `%index%` is replaced by the reference number.
    pub back_link_text: String,
    pub back_links_separator: String,
    pub back_links_margin_left: String,
    pub separator_font_size: String,
    pub separator_color: String,
    /// `%refId%` and `%index%` are replaced.
    pub back_link_aria_label: String,
    pub ref_role: String,
    pub ref_tab_index: String,
    pub external_link_target: String,
    pub external_link_rel: String,
    pub back_links: BackLinkPolicy,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            highlight_duration: 2000,
            highlight_class: "reference-highlight".to_string(),
            marker_selector: ".reference".to_string(),
            list_id: "reference-list".to_string(),
            scroll_behavior: ScrollBehavior::Smooth,
            ref_id_prefix: "ref-".to_string(),
            occurrence_id_prefix: "ref-occurrence-".to_string(),
            format_template: r#", <span class="ref-author">%author%</span>, <span class="ref-date">%date%.</span>"#.to_string(),
            back_link_text: "↑%index%".to_string(),
            back_links_separator: ", ".to_string(),
            back_links_margin_left: "10px".to_string(),
            separator_font_size: "0.8em".to_string(),
            separator_color: "#333333".to_string(),
            back_link_aria_label: "Back to text for reference %refId%, occurrence %index%"
                .to_string(),
            ref_role: "link".to_string(),
            ref_tab_index: "0".to_string(),
            external_link_target: "_blank".to_string(),
            external_link_rel: "noopener noreferrer".to_string(),
            back_links: BackLinkPolicy::FirstOccurrence,
        }
    }
}

/// Create the processor configuration from the contents of a RON file.
pub fn build_processor_config(input: &str) -> Result<ProcessorConfig, String> {
    match from_str(input) {
        Ok(c) => {
            debug!(slog_scope::logger(), "Configuration file parsed");
            Ok(c)
        }
        Err(e) => {
            let err_msg = format!("error deserializing the configuration file—{}", e);
            Err(err_msg)
        }
    }
}
