//! Functions for interacting with the file system.

pub mod file_contents;

use ansi_term::Color;
use file_contents::BLANK_CONFIG_CONTENTS;
use slog::debug;
use std::{fs, path::Path};

/// The name of the file created by the `config` subcommand.
pub const BLANK_CONFIG_FILE: &str = "blank-citelist-config.ron";

/// Load a file into a string.
///
/// This function is used to load both the HTML input and the configuration
/// file into strings, which can then be passed to the main function.
pub fn load_file(path: &Path) -> Result<String, String> {
    debug!(
        slog_scope::logger(),
        "Loading file {}...",
        path.to_string_lossy()
    );

    match fs::read_to_string(path) {
        Ok(r) => {
            debug!(
                slog_scope::logger(),
                "File {} loaded.",
                path.to_string_lossy()
            );
            Ok(r)
        }
        Err(e) => {
            let err_msg = format!("error reading the file {}—{}", path.to_string_lossy(), e);
            Err(err_msg)
        }
    }
}

/// Save a string in a file.
pub fn save_file(path: &Path, output: &str) -> Result<(), String> {
    debug!(slog_scope::logger(), "Saving {}...", path.to_string_lossy());
    eprintln!(
        "{} Saving {}...",
        Color::Green.paint("INFO"),
        Color::Blue.paint(path.to_string_lossy())
    );

    match fs::write(path, output) {
        Ok(_) => {
            debug!(
                slog_scope::logger(),
                "File {} saved.",
                path.to_string_lossy()
            );
            Ok(())
        }
        Err(e) => {
            let err_msg = format!("error writing the file {}—{}", path.to_string_lossy(), e);
            Err(err_msg)
        }
    }
}

/// Create a blank configuration file.
///
/// Creates a configuration file listing every setting with its default value,
/// which users can then edit.
pub fn new_config_ron(dir: &Path) -> Result<(), String> {
    let path = dir.join(BLANK_CONFIG_FILE);
    eprintln!(
        "{} Creating blank configuration file ({})",
        Color::Green.paint("INFO"),
        Color::Blue.paint(path.to_string_lossy())
    );

    match fs::write(&path, BLANK_CONFIG_CONTENTS) {
        Ok(_) => Ok(()),
        Err(e) => {
            let err_msg = format!(
                "error writing the configuration file {}—{}",
                path.to_string_lossy(),
                e
            );
            Err(err_msg)
        }
    }
}
