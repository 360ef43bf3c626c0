use anyhow::Context;
use autoimport_js::config::Settings;
use autoimport_js::diagnostic::render_diagnostic;
use autoimport_js::resolve_source;
use autoimport_js::Resolution;
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = ".autoimport.json";

#[derive(Parser)]
#[command(
  name = "autoimport-js",
  author,
  version,
  about = "Adds missing component imports to JSX/TSX files"
)]
struct Cli {
  /// Files to process.
  #[arg(required = true)]
  files: Vec<PathBuf>,

  /// Settings file with `namedImports`/`defaultImports` maps. Defaults to ./.autoimport.json when it
  /// exists.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Write the imports into the files.
  #[arg(long)]
  write: bool,

  /// Print a JSON report instead of status messages.
  #[arg(long)]
  json: bool,

  /// Exit with status 1 if any file is missing imports.
  #[arg(long)]
  check: bool,

  /// Log to stderr (filter with RUST_LOG).
  #[arg(long)]
  trace: bool,

  /// Log to stderr as JSON.
  #[arg(long)]
  trace_json: bool,
}

#[derive(Serialize)]
struct FileReport<'a> {
  file: String,
  changed: bool,
  written: bool,
  #[serde(flatten)]
  resolution: &'a Resolution,
}

fn init_tracing(trace: bool, json: bool) {
  if !trace && !json && std::env::var_os("RUST_LOG").is_none() {
    return;
  }
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_span_events(FmtSpan::CLOSE)
    .with_ansi(false);
  let _ = if json {
    builder.json().try_init()
  } else {
    builder.try_init()
  };
}

fn load_settings(config: Option<&Path>) -> anyhow::Result<Settings> {
  if let Some(path) = config {
    return Settings::load(path).with_context(|| format!("loading {}", path.display()));
  };
  let default = Path::new(DEFAULT_CONFIG);
  if default.is_file() {
    return Settings::load(default).with_context(|| format!("loading {DEFAULT_CONFIG}"));
  };
  tracing::debug!("no settings file, nothing is mapped");
  Ok(Settings::default())
}

/// Returns whether any file is missing imports.
fn process(
  cli: &Cli,
  settings: &Settings,
  reports: &mut Vec<serde_json::Value>,
) -> anyhow::Result<bool> {
  let mut any_changed = false;
  for path in &cli.files {
    let file = path.display().to_string();
    let source = fs::read_to_string(path).with_context(|| format!("failed to read {file}"))?;
    let resolution = resolve_source(&source, &file, settings);
    let changed = !resolution.is_noop();

    let mut written = false;
    if cli.write && changed {
      fs::write(path, resolution.apply(&source))
        .with_context(|| format!("failed to write {file}"))?;
      written = true;
    };

    if cli.json {
      reports.push(serde_json::to_value(FileReport {
        file: file.clone(),
        changed,
        written,
        resolution: &resolution,
      })?);
    } else {
      for diagnostic in &resolution.diagnostics {
        eprint!("{}", render_diagnostic(&file, &source, diagnostic));
      }
      for message in resolution.status_messages() {
        println!("{file}: {message}");
      }
      for name in &resolution.unresolved {
        eprintln!("{file}: no import configured for <{name}>");
      }
    };
    any_changed |= changed;
  }
  Ok(any_changed)
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
  let settings = load_settings(cli.config.as_deref())?;
  let mut reports = Vec::new();
  let any_changed = process(cli, &settings, &mut reports)?;
  if cli.json {
    println!("{}", serde_json::to_string_pretty(&reports)?);
  };
  if cli.check && any_changed {
    return Ok(ExitCode::from(1));
  };
  Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.trace, cli.trace_json);
  match run(&cli) {
    Ok(code) => code,
    Err(err) => {
      eprintln!("error: {err:#}");
      ExitCode::from(2)
    }
  }
}
