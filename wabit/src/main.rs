//! # wabit
//!
//! A CLI tool that lays out a tabular result set as a paginated report.
//!
//! ## Overview
//!
//! wabit is built on top of wabitlib. It reads a report definition (columns,
//! their roles and formats, and layout options) and a result set, runs the
//! layout engine and prints the pages.
//!
//! ## Features
//!
//! - **Sections and groups**: break columns start new sections, group columns
//!   collapse repeated values, both with subtotals
//! - **Pagination**: fixed page height, headers repeated on overflow pages
//! - **Multiple input formats**: CSV (with a header row) and JSON result sets
//! - **Multiple output formats**: Text (default), JSON
//!
//! ## Usage
//!
//! ```bash
//! # Lay out a CSV result set
//! wabit sales.csv --definition report.json
//!
//! # Override layout options from the definition
//! wabit sales.csv -d report.json --page-height 300 --border inside --grand-totals
//!
//! # Output the positioned cells as JSON
//! wabit sales.json -d report.json --output json
//! ```

mod render;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use wabitlib::{
    load_result_set, BorderStyle, LayoutOptions, MonospaceMetrics, ReportDefinition, ReportLayout,
};

use crate::render::{render_json, render_text};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("wabit")
        .version(env!("CARGO_PKG_VERSION"))
        .author("SQL Power Group")
        .about("Lay out a result set as a paginated report with sections, subtotals and grand totals")
        .arg(
            Arg::new("rows")
                .help("Result set to lay out (.csv with a header row, or JSON)")
                .required(true),
        )
        .arg(
            Arg::new("definition")
                .short('d')
                .long("definition")
                .required(true)
                .help("Report definition file (JSON)"),
        )
        .arg(
            Arg::new("page-height")
                .long("page-height")
                .value_parser(value_parser!(i32).range(1..))
                .help("Page content height in layout units"),
        )
        .arg(
            Arg::new("page-width")
                .long("page-width")
                .value_parser(value_parser!(i32).range(1..))
                .help("Page content width in layout units"),
        )
        .arg(
            Arg::new("border")
                .short('b')
                .long("border")
                .value_parser(["none", "horizontal", "vertical", "inside", "outside", "full"])
                .help("Cell border style"),
        )
        .arg(
            Arg::new("null-string")
                .long("null-string")
                .help("Text shown for null values"),
        )
        .arg(
            Arg::new("grand-totals")
                .short('g')
                .long("grand-totals")
                .action(ArgAction::SetTrue)
                .help("End the report with a grand-total line"),
        )
        .arg(
            Arg::new("no-repeat-section-header")
                .long("no-repeat-section-header")
                .action(ArgAction::SetTrue)
                .help("Do not repeat the section header on overflow pages"),
        )
        .arg(
            Arg::new("no-repeat-column-header")
                .long("no-repeat-column-header")
                .action(ArgAction::SetTrue)
                .help("Do not repeat the column headers on overflow pages"),
        )
        .arg(
            Arg::new("show-repeats")
                .long("show-repeats")
                .action(ArgAction::SetTrue)
                .help("Show repeated group values as \"(value)\" instead of blank"),
        )
        .arg(
            Arg::new("char-width")
                .long("char-width")
                .value_parser(value_parser!(i32).range(1..))
                .default_value("7")
                .help("Width of one character in layout units"),
        )
        .arg(
            Arg::new("line-height")
                .long("line-height")
                .value_parser(value_parser!(i32).range(1..))
                .default_value("12")
                .help("Height of one text line in layout units"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log layout progress to stderr"),
        )
}

/// Apply command-line overrides on top of the definition's layout options
fn apply_overrides(mut options: LayoutOptions, matches: &ArgMatches) -> anyhow::Result<LayoutOptions> {
    if let Some(height) = matches.get_one::<i32>("page-height") {
        options.page_height = *height;
    }
    if let Some(width) = matches.get_one::<i32>("page-width") {
        options.available_width = *width;
    }
    if let Some(border) = matches.get_one::<String>("border") {
        options.border_style = border
            .parse::<BorderStyle>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    if let Some(null_string) = matches.get_one::<String>("null-string") {
        options.null_string = null_string.clone();
    }
    if matches.get_flag("grand-totals") {
        options.grand_totals = true;
    }
    if matches.get_flag("no-repeat-section-header") {
        options.repeat_section_header = false;
    }
    if matches.get_flag("no-repeat-column-header") {
        options.repeat_column_header = false;
    }
    if matches.get_flag("show-repeats") {
        options.show_groups_as_repeat = true;
    }
    Ok(options)
}

/// Handler for the layout command
fn layout_handler(matches: &ArgMatches) -> anyhow::Result<String> {
    let rows_path = matches
        .get_one::<String>("rows")
        .map(Path::new)
        .context("missing result set path")?;
    let definition_path = matches
        .get_one::<String>("definition")
        .map(Path::new)
        .context("missing --definition")?;

    let definition = ReportDefinition::from_file(definition_path)?;
    let options = apply_overrides(definition.layout.clone(), matches)?;

    let rows = load_result_set(rows_path, Some(&definition.data_types()))
        .with_context(|| format!("loading result set '{}'", rows_path.display()))?;
    definition.check_result_set(rows.column_names())?;
    tracing::debug!(rows = rows.row_count(), "result set loaded");

    let char_width = matches.get_one::<i32>("char-width").copied().unwrap_or(7);
    let line_height = matches.get_one::<i32>("line-height").copied().unwrap_or(12);
    let metrics = MonospaceMetrics::new(char_width, line_height);

    let mut layout = ReportLayout::new(rows, definition.column_specs(), options, metrics);
    let pages = layout.layout()?;

    let output = matches
        .get_one::<String>("output")
        .map(|s| s.as_str())
        .unwrap_or("text");
    match output {
        "json" => render_json(&pages),
        _ => Ok(render_text(&pages, &metrics)),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match layout_handler(&matches) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
