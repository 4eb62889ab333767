//! Contains the main citelist function. Determines which parts of citelist to
//! run.

pub mod config;
mod fs;
pub mod html;
pub mod refs;
pub mod runtime;

use ansi_term::Color;
use config::{
    build_processor_config, CitelistCommand, CitelistConfig, Format, Output, ProcessorConfig,
};
use fs::load_file;
use refs::ReferenceTable;
use slog::{debug, error, o};
use std::{path::Path, process};

/// Process an HTML string.
///
/// Returns the processed HTML and the reference table. With `script` set, the
/// browser runtime is added to the document.
pub fn process_html(
    input: &str,
    config: &ProcessorConfig,
    script: bool,
) -> Result<(String, ReferenceTable), String> {
    // Parse the input
    let mut document = match slog_scope::scope(
        &slog_scope::logger().new(o!("fn" => "parse()")),
        || html::parse(input),
    ) {
        Ok(d) => d,
        Err(e) => return Err(format!("HTML parsing error: {}", e)),
    };

    // Run the reference processor
    let table = match slog_scope::scope(&slog_scope::logger().new(o!("fn" => "process()")), || {
        refs::process(&mut document, config)
    }) {
        Ok(t) => t,
        Err(e) => return Err(format!("Reference processing error: {}", e)),
    };

    // Add the runtime
    if script {
        match slog_scope::scope(
            &slog_scope::logger().new(o!("fn" => "inject_runtime()")),
            || runtime::script::inject_runtime(&mut document, config),
        ) {
            Ok(_) => (),
            Err(e) => return Err(format!("Runtime injection error: {}", e)),
        };
    }

    Ok((html::serialize(&document), table))
}

/// The main citelist function.
pub fn citelist(config: CitelistConfig) -> Result<(), String> {
    // Check subcommands.
    if config.command == CitelistCommand::NewConfigFile {
        debug!(slog_scope::logger(), "Creating blank configuration file");
        if let Err(e) = fs::new_config_ron(Path::new(".")) {
            error!(slog_scope::logger(), "{}", e);
            eprintln!("{} {}", Color::Red.paint("ERRO"), e);
            process::exit(1);
        }
        return Ok(());
    }

    eprintln!("{} Starting citelist...", Color::Green.paint("INFO"));

    let input = match config.input {
        Some(i) => Path::new(i),
        None => {
            eprintln!("{} No input file", Color::Red.paint("ERRO"));
            process::exit(1);
        }
    };

    // Load the input
    let input =
        match slog_scope::scope(&slog_scope::logger().new(o!("fn" => "load_file()")), || {
            load_file(input)
        }) {
            Ok(i) => i,
            Err(e) => {
                error!(slog_scope::logger(), "HTML load error: {}", e);
                eprintln!("{} HTML load error: {}", Color::Red.paint("ERRO"), e);
                process::exit(1);
            }
        };

    // Load the configuration file, if any
    let processor_config = match config.processor_config {
        Some(c) => {
            let contents = match slog_scope::scope(
                &slog_scope::logger().new(o!("fn" => "load_file()")),
                || load_file(Path::new(c)),
            ) {
                Ok(c) => c,
                Err(e) => {
                    error!(slog_scope::logger(), "Configuration load error: {}", e);
                    eprintln!(
                        "{} Configuration load error: {}",
                        Color::Red.paint("ERRO"),
                        e
                    );
                    process::exit(1);
                }
            };
            match build_processor_config(&contents) {
                Ok(p) => p,
                Err(e) => {
                    error!(slog_scope::logger(), "Configuration error: {}", e);
                    eprintln!("{} Configuration error: {}", Color::Red.paint("ERRO"), e);
                    process::exit(1);
                }
            }
        }
        None => ProcessorConfig::default(),
    };

    // Run the processor
    eprintln!("{} Processing references...", Color::Green.paint("INFO"));

    let (html, table) = match process_html(&input, &processor_config, config.script) {
        Ok(p) => p,
        Err(e) => {
            error!(slog_scope::logger(), "{}", e);
            eprintln!("{} {}", Color::Red.paint("ERRO"), e);
            process::exit(1);
        }
    };

    eprintln!(
        "{} Numbered {} reference(s)",
        Color::Green.paint("INFO"),
        table.len()
    );

    let output = match config.format {
        Format::Html => html,
        Format::Json => match serde_json::to_string_pretty(&table) {
            Ok(j) => j,
            Err(e) => {
                error!(slog_scope::logger(), "JSON error: {}", e);
                eprintln!("{} JSON error: {}", Color::Red.paint("ERRO"), e);
                process::exit(1);
            }
        },
    };

    // Write the output
    match config.output {
        Output::StandardOut => println!("{}", output),
        Output::File => {
            // An output file must have been provided for the output to be
            // set to File
            let path = match config.output_file {
                Some(o) => Path::new(o),
                None => {
                    eprintln!("{} No output file", Color::Red.paint("ERRO"));
                    process::exit(1);
                }
            };
            fs::save_file(path, &output)?;
        }
    }

    eprintln!("{} Done", Color::Green.paint("INFO"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod end_to_end {
        use super::*;

        #[test]
        fn fixture() {
            let input = load_file(Path::new("./tests/test.html")).unwrap();
            let (output, table) = process_html(&input, &ProcessorConfig::default(), true).unwrap();
            let target = load_file(Path::new("./tests/test-target.html")).unwrap();

            let target_lines: Vec<&str> = target.lines().collect();
            for (i, line) in output.lines().enumerate() {
                assert_eq!(line, target_lines[i])
            }
            assert_eq!(output.lines().count(), target_lines.len());

            assert_eq!(table.len(), 3);
            assert_eq!(output.matches("<script>").count(), 1);
        }

        #[test]
        fn json() {
            let input = load_file(Path::new("./tests/test.html")).unwrap();
            let (_, table) = process_html(&input, &ProcessorConfig::default(), false).unwrap();
            let json: serde_json::Value =
                serde_json::from_str(&serde_json::to_string_pretty(&table).unwrap()).unwrap();

            assert_eq!(json["entries"][0]["id"], 1);
            assert_eq!(json["entries"][0]["key"], "https://example.com/paper-a");
            assert_eq!(json["entries"][0]["occurrences"][1]["index"], 3);
            assert!(json.get("ids").is_none());
        }

        #[test]
        fn no_script() {
            let (output, _) = process_html(
                r#"<body><span class="reference" data-url="x">a</span><ol id="reference-list"></ol></body>"#,
                &ProcessorConfig::default(),
                false,
            )
            .unwrap();
            assert!(!output.contains("<script>"));
        }

        #[test]
        fn errors_are_labelled() {
            let err = process_html("<p", &ProcessorConfig::default(), false).unwrap_err();
            assert!(err.starts_with("HTML parsing error"));

            let err = process_html(
                r#"<span class="reference" data-url="x">a</span>"#,
                &ProcessorConfig::default(),
                false,
            )
            .unwrap_err();
            assert!(err.starts_with("Reference processing error"));
        }
    }
}
