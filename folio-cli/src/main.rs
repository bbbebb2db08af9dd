//! Command-line interface for folio
//! This binary splits a markdown file into pages and renders them as HTML or markdown.
//!
//! Usage:
//!   folio `<path>` [--format `<format>`] [--output `<dir>`]   - Split and render a document
//!   folio --list-formats                                      - List available output formats
//!
//! Settings come from the built-in defaults, then `folio.toml` in the working directory (or the
//! file given with `--config`), then command-line flags.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use folio_babel::{compile, write_pages, CompiledDocument, FormatRegistry};
use folio_config::Loader;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG: &str = "folio.toml";

fn main() {
    let matches = Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Split markdown documents into pages, hoisting their metadata")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the markdown file")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format or extension (e.g., 'html', 'md')"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Directory to write pages to (default: print to stdout)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .help("Base name of the output files (default: 'page')"),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .help("Deepest heading level that starts a new page")
                .value_parser(value_parser!(u64).range(1..=6)),
        )
        .arg(
            Arg::new("template")
                .long("template")
                .help("Template file with {{ contents }} and {{ title }} placeholders"),
        )
        .arg(
            Arg::new("document")
                .long("document")
                .help("Wrap HTML output in a complete document")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pipeline progress to stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let path = matches
        .get_one::<String>("path")
        .expect("path is required unless listing formats");
    handle_compile_command(path, &matches);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<folio_config::FolioConfig, String> {
    let mut loader = match matches.get_one::<PathBuf>("config") {
        Some(file) => Loader::new().with_file(file),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };

    let mut overrides: Vec<(&str, String)> = Vec::new();
    if let Some(format) = matches.get_one::<String>("format") {
        overrides.push(("render.format", format.clone()));
    }
    if matches.get_flag("document") {
        overrides.push(("render.format", "html-document".to_string()));
    }
    if let Some(name) = matches.get_one::<String>("name") {
        overrides.push(("render.base_name", name.clone()));
    }
    if let Some(template) = matches.get_one::<String>("template") {
        overrides.push(("render.template", template.clone()));
    }
    for (key, value) in overrides {
        loader = loader.set_override(key, value).map_err(|e| e.to_string())?;
    }
    if let Some(depth) = matches.get_one::<u64>("depth") {
        loader = loader
            .set_override("paging.max_depth", *depth)
            .map_err(|e| e.to_string())?;
    }

    loader.build().map_err(|e| e.to_string())
}

/// Handle the compile command
fn handle_compile_command(path: &str, matches: &ArgMatches) {
    let options = load_config(matches)
        .and_then(|config| config.compile_options().map_err(|e| e.to_string()))
        .unwrap_or_else(|e| {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        });

    log::debug!(
        "output format '{}', base name '{}'",
        options.format,
        options.render.base_name
    );

    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        std::process::exit(1);
    });

    let compiled = compile(&source, &options).unwrap_or_else(|e| {
        eprintln!("Error compiling '{}': {}", path, e);
        std::process::exit(1);
    });

    for diagnostic in compiled.diagnostics.iter() {
        eprintln!("{}: {}", path, diagnostic);
    }

    match matches.get_one::<PathBuf>("output") {
        Some(dir) => write_output(&compiled, dir),
        None => print_pages(&compiled),
    }
}

fn write_output(compiled: &CompiledDocument, dir: &Path) {
    let written = write_pages(&compiled.pages, dir).unwrap_or_else(|e| {
        eprintln!("Error writing pages: {}", e);
        std::process::exit(1);
    });
    for path in written {
        println!("{}", path.display());
    }
}

fn print_pages(compiled: &CompiledDocument) {
    for (index, page) in compiled.pages.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("==> {} <==", page.filename);
        println!("{}", page.contents);
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available output formats:\n");

    for format in registry.iter() {
        println!("  {} (.{})", format.name(), format.extension());
        println!("    {}", format.description());
        println!();
    }
}
