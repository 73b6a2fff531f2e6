//! pagelens - Entry Point
//!
//! CLI driver for the search core: loads an HTML document, runs search
//! commands against it and prints the JSON responses the command surface
//! defines. In batch mode it reads one JSON command per stdin line, which
//! makes the core usable as a subprocess collaborator.

use clap::{Parser, ValueEnum};
use pagelens::config;
use pagelens::model::{
    AppError, Command, CommandDecodeError, ElementMode, ParseError, QuerySpec, Response,
};
use pagelens::overlay::grid::GridLayout;
use pagelens::parser::parse_html;
use pagelens::state::SearchEngine;
use std::io::BufRead;
use std::path::PathBuf;
use tracing::info;

/// Selector language flag for element mode.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ElementModeArg {
    Css,
    Xpath,
}

impl From<ElementModeArg> for ElementMode {
    fn from(value: ElementModeArg) -> Self {
        match value {
            ElementModeArg::Css => ElementMode::Css,
            ElementModeArg::Xpath => ElementMode::Xpath,
        }
    }
}

/// In-page search core driver
#[derive(Parser, Debug)]
#[command(name = "pagelens")]
#[command(version)]
#[command(about = "Search an HTML document and print JSON responses")]
pub struct Args {
    /// Path to the HTML document
    pub file: PathBuf,

    /// Query to search for (not used with --batch)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Treat the query as a regular expression
    #[arg(long)]
    pub regex: bool,

    /// Match case exactly
    #[arg(long)]
    pub case_sensitive: bool,

    /// Unicode-folding fuzzy search
    #[arg(long)]
    pub fuzzy: bool,

    /// Element search (query is a selector)
    #[arg(long)]
    pub element: bool,

    /// Selector language for element search
    #[arg(long, value_enum, default_value = "css")]
    pub element_mode: ElementModeArg,

    /// Also print the results list
    #[arg(long)]
    pub results_list: bool,

    /// Context length for the results list
    #[arg(long)]
    pub context_length: Option<usize>,

    /// Also print overlay placement specs
    #[arg(long)]
    pub overlays: bool,

    /// Overlay container element id to exclude from search
    #[arg(long)]
    pub overlay_id: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read JSON commands line-by-line from stdin
    #[arg(long)]
    pub batch: bool,

    /// Grid columns used for the deterministic layout
    #[arg(long, default_value = "80")]
    pub columns: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Err(message) = pagelens::logging::init() {
        eprintln!("{message}");
    }

    // Defaults → Config File → Env Vars → CLI Args
    let search_config = {
        let config_file = config::load_config_with_precedence(args.config.clone())
            .map_err(AppError::Config)?;
        let merged = config::merge_config(config_file);
        let with_env = config::apply_env_overrides(merged);
        config::apply_cli_overrides(with_env, args.context_length, args.overlay_id.clone())
    };

    let html = std::fs::read_to_string(&args.file).map_err(AppError::DocumentRead)?;
    if html.trim().is_empty() {
        return Err(AppError::Parse(ParseError::EmptyDocument).into());
    }
    let doc = parse_html(&html).map_err(AppError::Parse)?;
    info!(nodes = doc.len(), "document loaded");

    let layout = GridLayout::new(&doc, args.columns.max(1));
    let mut engine = SearchEngine::new(search_config);

    if args.batch {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = line.map_err(AppError::DocumentRead)?;
            if line.trim().is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<serde_json::Value>(&line) {
                Err(err) => Response::error(format!("Invalid command JSON: {err}")),
                Ok(value) => match Command::from_value(value) {
                    Ok(command) => engine.handle(command, &doc, &layout),
                    Err(CommandDecodeError::UnknownAction { name }) => {
                        Response::unknown_action(&name)
                    }
                    Err(CommandDecodeError::Malformed { reason }) => {
                        Response::error(format!("Malformed command: {reason}"))
                    }
                },
            };
            println!("{}", serde_json::to_string(&response)?);
        }
        return Ok(());
    }

    let Some(query) = args.query.clone() else {
        return Err(AppError::CommandInput("--query is required without --batch".into()).into());
    };
    let spec = QuerySpec {
        query,
        use_regex: args.regex,
        case_sensitive: args.case_sensitive,
        use_element_search: args.element,
        element_mode: args.element_mode.into(),
        use_fuzzy: args.fuzzy,
        show_results_list: args.results_list,
    };

    let response = engine.search(spec, &doc, &layout);
    println!("{}", serde_json::to_string(&response)?);

    if args.results_list {
        let listing = engine.results_list(&doc, args.context_length);
        println!("{}", serde_json::to_string(&listing)?);
    }
    if args.overlays {
        println!("{}", serde_json::to_string(engine.overlays())?);
    }
    Ok(())
}
