//! `main.rs` contains the command-line interface for citelist. It collects the
//! values and options, sets up the logger, assembles the configuration, and
//! passes the configuration to the main function.
#[macro_use]
extern crate slog;

use ansi_term::Color;
use citelist::config::{CitelistCommand, CitelistConfig, Format, Output};
use clap::{crate_version, App, Arg, SubCommand};
use slog::{debug, Drain, Level};
use std::{fs::OpenOptions, process, sync::Mutex};

fn main() -> Result<(), String> {
    // Get the command-line arguments and options
    let matches = App::new("citelist")
        .version(crate_version!())
        .about("Turns citation markers in an HTML document into a numbered reference list")
        .arg(
            Arg::with_name("input")
                .value_name("INPUT FILE")
                .help("The HTML file to process")
                .index(1)
                .required(true),
        )
        .arg(
            Arg::with_name("output")
                .value_name("OUTPUT FILE")
                .help("The output file (blank outputs to terminal)")
                .index(2)
                .required(false),
        )
        .arg(
            Arg::with_name("config")
                .short('c')
                .long("config")
                .value_name("CONFIG FILE")
                .help("A RON file with reference-processor settings"),
        )
        .arg(
            Arg::with_name("json")
                .short('j')
                .long("json")
                .takes_value(false)
                .help("Output the reference table as JSON instead of HTML"),
        )
        .arg(
            Arg::with_name("no_script")
                .short('n')
                .long("no-script")
                .takes_value(false)
                .help("Don't add the navigation script to the output"),
        )
        .arg(
            Arg::with_name("force_overwrite")
                .short('W')
                .long("force_overwrite")
                .takes_value(false)
                .help("Required to overwrite the input file with the output"),
        )
        .arg(
            Arg::with_name("debug")
                .short('d')
                .long("debug")
                .takes_value(false)
                .help("Outputs debug log to citelist-log.json")
                .hidden_short_help(true)
                .hidden_long_help(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short('v')
                .long("verbose")
                .value_name("NUMBER")
                .help("Verbosity level between 0 and 5")
                .hidden_short_help(true)
                .hidden_long_help(true)
                .default_value("1"),
        )
        .subcommand(
            SubCommand::with_name("init").about("For creating a blank configuration file"),
        )
        .args_conflicts_with_subcommands(true)
        .subcommand_negates_reqs(true)
        .get_matches();

    // Setup the logger.
    //
    // If the debug flag is set, the log is also output to a file
    // `citelist-log.json`. Otherwise, all logging goes to the terminal.
    let debug = matches.is_present("debug");
    let min_log_level = match matches.value_of("verbose").unwrap_or("1") {
        "0" => Level::Critical,
        "1" => Level::Error,
        "2" => Level::Warning,
        "3" => Level::Info,
        "4" => Level::Debug,
        "5" => Level::Trace,
        _ => Level::Info,
    };

    let term_decorator = slog_term::TermDecorator::new().build();
    let term_drain = slog_term::CompactFormat::new(term_decorator).build().fuse();
    let term_drain = term_drain.filter_level(min_log_level).fuse();

    let _guard: slog_scope::GlobalLoggerGuard = if debug {
        // Setup the file AND terminal loggers
        let log_file = match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open("./citelist-log.json")
        {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "{} Could not create citelist-log.json: {}",
                    Color::Red.paint("ERRO"),
                    e
                );
                process::exit(1);
            }
        };
        let file_drain = slog_json::Json::new(log_file)
            .set_pretty(true)
            .add_default_keys()
            .build()
            .fuse();
        let file_drain = slog_async::Async::new(file_drain.filter_level(Level::Trace).fuse())
            .build()
            .fuse();
        let dual_logger = slog::Logger::root(
            slog::Duplicate(Mutex::new(term_drain).fuse(), file_drain).fuse(),
            o!("version" => crate_version!()),
        );
        slog_scope::set_global_logger(dual_logger)
    } else {
        // Setup just the terminal logger
        let term_logger = slog::Logger::root(
            Mutex::new(term_drain).fuse(),
            o!("version" => crate_version!()),
        );
        slog_scope::set_global_logger(term_logger)
    };

    debug!(slog_scope::logger(), "Logger setup");

    // Setup the configuration variables.
    //
    // Subcommands
    if matches.subcommand_name() == Some("init") {
        let config = CitelistConfig::new(
            CitelistCommand::NewConfigFile,
            Output::StandardOut,
            Format::Html,
            None,
            None,
            None,
            false,
        );
        return citelist::citelist(config);
    }

    // Files
    let input = matches.value_of("input");
    let output = matches.value_of("output");
    let processor_config = matches.value_of("config");

    // Options
    let format = if matches.is_present("json") {
        Format::Json
    } else {
        Format::Html
    };
    let script = !matches.is_present("no_script");
    let force_overwrite = matches.is_present("force_overwrite");

    // Deal with command-line errors.
    //
    // If the input and output strings are identical and force_overwrite has not
    // been used, return an error and exit.
    if let (Some(i), Some(o)) = (input, output) {
        if i == o && !force_overwrite {
            eprintln!("{} The input file ({}) and output file ({}) are the same,\n     but the force overwrite option was not set.\n     If you want to overwrite the input file, use -W/--force_overwrite.", Color::Red.paint("ERRO"), Color::Blue.paint(i), Color::Blue.paint(o));
            process::exit(1);
        }
    }

    // Determine the output
    let output_option = match output {
        Some(_) => Output::File,
        None => Output::StandardOut,
    };

    // Create the configuration
    let config = CitelistConfig::new(
        CitelistCommand::Main,
        output_option,
        format,
        input,
        output,
        processor_config,
        script,
    );

    // Run the program.
    let _ = citelist::citelist(config);

    Ok(())
}
