//! Command-line interface for panelsplit
//!
//! Usage:
//!   panelsplit `<path>` [--out-dir `<dir>`] [--dry-run] [--format `<format>`]  - Split a panel source
//!   panelsplit `<path>` --check                                           - Report whether the file still needs splitting

use clap::{Arg, ArgAction, Command};
use std::process;

use panelsplit::split::config::SplitSpec;
use panelsplit::split::pipeline;

fn main() {
    let matches = Command::new("panelsplit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Splits an inline webview panel source into style/template/script modules")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the panel source file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .short('o')
                .help("Destination directory for the generated modules (default: webview/ beside the source)"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Compute and report the rewrite plan without writing anything"),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .action(ArgAction::SetTrue)
                .help("Report whether the file still matches the pre-split shape"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .default_value("text")
                .help("Report format: 'text' or 'json'"),
        )
        .get_matches();

    let path = matches.get_one::<String>("path").expect("path is required");
    let format = matches.get_one::<String>("format").unwrap();

    let mut spec = SplitSpec::panel_defaults(path);
    if let Some(dir) = matches.get_one::<String>("out-dir") {
        spec = spec.with_out_dir(dir);
    }
    if matches.get_flag("dry-run") {
        spec = spec.with_dry_run(true);
    }

    if matches.get_flag("check") {
        handle_check_command(&spec);
        return;
    }

    handle_split_command(spec, format);
}

/// Run the split and print the report.
fn handle_split_command(spec: SplitSpec, format: &str) {
    let report = pipeline::run(spec).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    match format {
        "json" => {
            let rendered = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
                eprintln!("Error formatting report: {}", e);
                process::exit(1);
            });
            println!("{}", rendered);
        }
        "text" => print!("{}", report.render_text()),
        other => {
            eprintln!("Format '{}' not supported; use 'text' or 'json'", other);
            process::exit(1);
        }
    }
}

/// Classify the document and report the shape without writing.
fn handle_check_command(spec: &SplitSpec) {
    let shape = pipeline::check(spec).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    println!("{}: {}", spec.source.display(), shape);
}
