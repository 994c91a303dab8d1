//! `flowviz` renders the control flow graph of a single Rust function.
//!
//! The input file must hold exactly one function. Its graph is built,
//! jump placeholders are spliced out, and the result is laid out with the
//! configured GraphViz engine and opened in the configured viewer.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};

use flowviz_core::ControlFlowGraph;
use flowviz_tracing::{
    init_tracing_subscriber, println_green, println_red_err, TracingSubscriberOptions,
};

mod config;
use config::Config;

#[derive(Debug, Parser)]
#[clap(
    name = "flowviz",
    about = "Render the control flow graph of a single Rust function.",
    version
)]
pub struct App {
    /// Path to a source file containing exactly one function.
    pub file: PathBuf,
    /// Path to the configuration file, if not specified, `flowviz.toml` in
    /// the current working directory will be used.
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// Print the DOT source instead of rendering it.
    #[clap(long)]
    pub dry_run: bool,
    /// Use verbose output; `-vv` enables trace output.
    #[clap(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn main() {
    let app = App::parse();
    init_tracing_subscriber(TracingSubscriberOptions {
        verbosity: Some(app.verbose),
        ..Default::default()
    });
    if let Err(err) = run(app) {
        println_red_err(&format!("Error: {err:?}"));
        std::process::exit(1);
    }
}

fn run(app: App) -> Result<()> {
    // the configuration is loaded before any input is touched, so a bad
    // setup fails the same way no matter what it is pointed at
    let config = Config::load(app.config.as_deref())?;
    debug!(dot = %config.dot, browser = %config.browser, "configuration loaded");

    let source = fs::read_to_string(&app.file)
        .with_context(|| format!("could not read {}", app.file.display()))?;
    let ast = syn::parse_file(&source)
        .with_context(|| format!("could not parse {}", app.file.display()))?;

    let mut graph = ControlFlowGraph::from_file(&ast)?;
    graph.eliminate_jumps();
    let dot_source = graph.to_dot();

    if app.dry_run {
        info!("{dot_source}");
        return Ok(());
    }

    let drawing = render(&config, &app.file, &dot_source)?;
    open_viewer(&config, &drawing)?;
    println_green(&format!("Rendered {}", drawing.display()));
    Ok(())
}

/// Write the DOT source next to the system temp dir and lay it out as an
/// SVG with the configured engine.
fn render(config: &Config, input: &Path, dot_source: &str) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "flowviz".to_string());
    let out_dir = std::env::temp_dir();
    let dot_path = out_dir.join(format!("{stem}.dot"));
    let drawing_path = out_dir.join(format!("{stem}.svg"));

    fs::write(&dot_path, dot_source)
        .with_context(|| format!("could not write {}", dot_path.display()))?;
    debug!("wrote {}", dot_path.display());

    let status = Command::new(&config.dot)
        .arg("-Tsvg")
        .arg(&dot_path)
        .arg("-o")
        .arg(&drawing_path)
        .status()
        .with_context(|| format!("could not run layout engine `{}`", config.dot))?;
    if !status.success() {
        bail!("layout engine `{}` exited with {}", config.dot, status);
    }
    Ok(drawing_path)
}

fn open_viewer(config: &Config, drawing: &Path) -> Result<()> {
    // the viewer keeps running on its own; its exit status is not ours to
    // wait for
    Command::new(&config.browser)
        .arg(drawing)
        .spawn()
        .with_context(|| format!("could not launch viewer `{}`", config.browser))?;
    Ok(())
}
