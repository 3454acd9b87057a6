//! # sorttable
//!
//! Replay header clicks against the sortable tables of a document and print
//! the result.
//!
//! ## Overview
//!
//! sorttable is built on top of sorttablelib. It loads a document from a JSON
//! node tree, makes every table matching the selector sortable, dispatches the
//! requested header clicks in order and prints the reordered tables.
//!
//! ## Usage
//!
//! ```bash
//! # Sort the first table by its second column
//! sorttable page.json --click 1
//!
//! # Sort descending (two clicks on the same column)
//! sorttable page.json --click 1 --click 1
//!
//! # Sort the third table and emit the document as HTML
//! sorttable page.json --table 2 --click 0 --output html
//!
//! # Table views as JSON, using the stable sort and a custom config
//! sorttable page.json --click 0 --stable --config sorttable.json --output json
//! ```

mod render;

use std::fs::File;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{info, warn, LevelFilter};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use sorttablelib::{ClickOutcome, Document, SortStrategy, SortTable, SortTableConfig, TableView};

use render::{parse_output_mode, HTML_OUTPUT, OUTPUT_NAMES};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("sorttable")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Click-to-sort tables: replay header clicks and print the sorted tables")
        .arg(
            Arg::new("input")
                .required(true)
                .help("Document to load (JSON node tree)"),
        )
        .arg(
            Arg::new("click")
                .short('c')
                .long("click")
                .value_name("COL")
                .value_parser(value_parser!(usize))
                .action(ArgAction::Append)
                .help("Click the header of column COL (can be specified multiple times)"),
        )
        .arg(
            Arg::new("table")
                .short('t')
                .long("table")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("0")
                .help("Index of the sortable table receiving the clicks"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(OUTPUT_NAMES)
                .default_value("auto")
                .help("Output format (auto, term, text, term-debug, json, html)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON config overriding selector, class names and indicators"),
        )
        .arg(
            Arg::new("stable")
                .long("stable")
                .action(ArgAction::SetTrue)
                .help("Use the stable shaker sort for fresh sorts"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log to stderr (-v debug, -vv trace)"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Write debug logs to FILE"),
        )
}

/// Install the requested loggers; no flags means no logging.
fn init_logging(matches: &ArgMatches) -> anyhow::Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    let level = match matches.get_count("verbose") {
        0 => None,
        1 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(level) = level {
        loggers.push(TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if let Some(path) = matches.get_one::<String>("log-file") {
        let file =
            File::create(path).with_context(|| format!("failed to create log file '{}'", path))?;
        loggers.push(WriteLogger::new(
            level.unwrap_or(LevelFilter::Debug),
            Config::default(),
            file,
        ));
    }

    if !loggers.is_empty() {
        CombinedLogger::init(loggers)?;
    }
    Ok(())
}

/// Build the config from `--config` and `--stable`
fn load_config(matches: &ArgMatches) -> anyhow::Result<SortTableConfig> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => SortTableConfig::load(path)?,
        None => SortTableConfig::default(),
    };
    Ok(if matches.get_flag("stable") {
        config.with_strategy(SortStrategy::Shaker)
    } else {
        config
    })
}

fn run(matches: &ArgMatches) -> anyhow::Result<String> {
    let input = matches
        .get_one::<String>("input")
        .ok_or_else(|| anyhow!("missing input document"))?;
    let output = matches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or("auto");
    let table_index = matches.get_one::<usize>("table").copied().unwrap_or(0);
    let clicks: Vec<usize> = matches
        .get_many::<usize>("click")
        .map(|v| v.copied().collect())
        .unwrap_or_default();

    let config = load_config(matches)?;
    let mut doc = Document::load(input)?;
    let mut sorter = SortTable::new(config.clone())?;
    let count = sorter.init(&mut doc)?;
    info!("{} tables prepared in {}", count, input);

    // Sortable tables in document order
    let tables: Vec<_> = config
        .parsed_selector()?
        .select_all(&doc)
        .into_iter()
        .filter(|&t| sorter.prepared(t).is_some())
        .collect();

    if !clicks.is_empty() {
        let Some(&table) = tables.get(table_index) else {
            bail!(
                "table {} out of range: the document has {} sortable tables",
                table_index,
                tables.len()
            );
        };
        for column in clicks {
            match sorter.click_column(&mut doc, table, column) {
                ClickOutcome::Ignored => warn!("click on column {} ignored", column),
                ClickOutcome::Sorted { state, .. } => {
                    info!("column {} now {:?}", column, state)
                }
            }
        }
    }

    let views: Vec<TableView> = tables
        .iter()
        .map(|&t| TableView::from_table(&doc, t, &config))
        .collect();

    if output == HTML_OUTPUT {
        return Ok(render::render_html(&doc));
    }
    let mut rendered = render::render_tables(&views, &config, parse_output_mode(output))
        .map_err(|e| anyhow!("Render error: {}", e))?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();

    if let Err(e) = init_logging(&matches) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&matches) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
