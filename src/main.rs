//! wsdlgen: generate a WSDL 1.1 document from documented Rust methods.
//!
//! Classes are inherent `impl` blocks found in the given source files:
//!
//! - `wsdlgen -n Calc --class Calculator=http://localhost/calc src/*.rs`
//! - `wsdlgen -c wsdlgen.yaml --validate`

use anyhow::{bail, Context, Result};
use clap::Parser;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wsdlgen::config::{load_manifest, Manifest};
use wsdlgen::{logging, SearchPathLocator, SourceLister, WsdlDocument};

#[derive(Parser)]
#[command(
    name = "wsdlgen",
    about = "Generate a WSDL document from documented Rust methods"
)]
struct Cli {
    /// Source files, directories or glob patterns to scan for classes
    sources: Vec<String>,

    /// Project manifest (.yaml, .yml or .json)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Document / service name
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Class to expose, as NAME=URI. Can be specified multiple times.
    #[arg(long = "class", value_name = "NAME=URI", value_parser = parse_class)]
    classes: Vec<(String, String)>,

    /// Write the document to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: xml (default) or json (collected metadata)
    #[arg(short = 'f', long, default_value = "xml")]
    format: String,

    /// Validate against the WSDL schema and fail on violations
    #[arg(long)]
    validate: bool,

    /// Directory searched for wsdl.xsd before the bundled copy
    #[arg(long)]
    schema_dir: Vec<PathBuf>,

    /// Log debug output to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Manifest and flags merged; flags win.
struct Settings {
    name: String,
    classes: IndexMap<String, String>,
    sources: Vec<String>,
    schema_dirs: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: String,
    validate: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    });

    let settings = resolve_settings(cli)?;
    run(&settings)
}

fn resolve_settings(cli: Cli) -> Result<Settings> {
    let manifest = match cli.config {
        Some(ref path) => load_manifest(path)?,
        None => Manifest::default(),
    };

    let name = cli
        .name
        .or(manifest.name)
        .context("--name is required (or set `name` in the config file)")?;

    let mut classes = manifest.classes;
    for (class, uri) in cli.classes {
        classes.insert(class, uri);
    }
    if classes.is_empty() {
        bail!("no classes registered; use --class NAME=URI");
    }

    let mut sources = manifest.sources;
    sources.extend(cli.sources);

    let mut schema_dirs = cli.schema_dir;
    schema_dirs.extend(manifest.schema_dirs);

    Ok(Settings {
        name,
        classes,
        sources,
        schema_dirs,
        output: cli.output.or(manifest.output),
        format: cli.format,
        validate: cli.validate,
    })
}

fn run(settings: &Settings) -> Result<()> {
    let files = expand_sources(&settings.sources)?;
    if files.is_empty() {
        bail!("no source files given");
    }

    let lister = SourceLister::from_paths(&files)?;
    let locator = SearchPathLocator::new(settings.schema_dirs.clone()).with_bundled_fallback();

    let mut doc = WsdlDocument::new(lister).with_locator(locator);
    doc.set_name(&settings.name);
    for (class, uri) in &settings.classes {
        doc.add_class(class, uri);
    }

    if settings.validate {
        let violations = doc
            .validation_report()
            .context("failed to validate document")?;
        if !violations.is_empty() {
            for violation in &violations {
                eprintln!("error: {}", violation);
            }
            bail!(
                "document does not conform to the WSDL schema ({} violation(s))",
                violations.len()
            );
        }
        info!("document is valid");
    }

    match settings.format.as_str() {
        "xml" => match settings.output {
            Some(ref path) => doc.save(path)?,
            None => print!("{}", doc.get_document()?),
        },
        "json" => {
            let mut json = serde_json::to_string_pretty(doc.service_document()?)?;
            json.push('\n');
            match settings.output {
                Some(ref path) => fs::write(path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", json),
            }
        }
        other => bail!("unknown format: {}. Use xml or json", other),
    }

    Ok(())
}

/// Parse a `NAME=URI` class registration.
fn parse_class(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, uri)) if !name.is_empty() && !uri.is_empty() => {
            Ok((name.to_string(), uri.to_string()))
        }
        _ => Err(format!("expected NAME=URI, got `{}`", value)),
    }
}

/// Expand files, directories (their `.rs` files) and glob patterns into a
/// sorted, deduplicated list of source files.
fn expand_sources(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        let found: Vec<PathBuf> = if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?
                .flatten()
                .map(|entry| entry.path())
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "rs"))
                .collect()
        } else {
            glob::glob(pattern)
                .with_context(|| format!("invalid glob pattern: {}", pattern))?
                .flatten()
                .filter(|p| p.is_file())
                .collect()
        };
        if found.is_empty() {
            warn!(pattern = %pattern, "no source files matched");
        }
        files.extend(found);
    }
    Ok(files.into_iter().collect())
}
