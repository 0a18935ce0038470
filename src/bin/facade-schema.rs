//! Facade Schema CLI
//!
//! Command-line interface for rendering facade schema listings.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use facade_schema::{
    format_facades, linearize_definitions, load_document_auto, parse_facades, render_dir, Facade,
    FileStatus, InputPattern, LabelStyle, LinearizeOptions, DEFAULT_AUDIENCES, DEFAULT_PATTERN,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "facade-schema")]
#[command(about = "Flatten RPC facade schemas into readable field listings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every matching schema document in a directory, one file per audience
    Render {
        /// Directory containing schema documents
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// File-name pattern for input documents (one `*` wildcard)
        #[arg(long, default_value = DEFAULT_PATTERN)]
        pattern: String,

        /// Audience tag to render (repeatable; default: model-user, controller-user)
        #[arg(long = "audience", short)]
        audiences: Vec<String>,

        /// Vocabulary for leaf type names
        #[arg(long, value_enum, default_value_t = Labels::Plain)]
        labels: Labels,

        /// Output format: text (default) or json
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Suppress per-file output, only show failures
        #[arg(long, short)]
        quiet: bool,
    },

    /// Print the listing of one schema document for one audience
    Show {
        /// Schema document: file path or URL (http:// or https://)
        source: String,

        /// Audience tag to render
        #[arg(long, short, default_value = "model-user")]
        audience: String,

        /// Vocabulary for leaf type names
        #[arg(long, value_enum, default_value_t = Labels::Plain)]
        labels: Labels,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print every definition of every facade, linearized on its own
    Definitions {
        /// Schema document: file path or URL (http:// or https://)
        source: String,

        /// Only dump definitions of this facade
        #[arg(long)]
        facade: Option<String>,

        /// Vocabulary for leaf type names
        #[arg(long, value_enum, default_value_t = Labels::Plain)]
        labels: Labels,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Labels {
    Plain,
    Python,
}

impl From<Labels> for LabelStyle {
    fn from(labels: Labels) -> Self {
        match labels {
            Labels::Plain => LabelStyle::Plain,
            Labels::Python => LabelStyle::Python,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            dir,
            pattern,
            audiences,
            labels,
            format,
            quiet,
        } => run_render(&dir, &pattern, &audiences, labels, format, quiet),

        Commands::Show {
            source,
            audience,
            labels,
            output,
        } => run_show(&source, &audience, labels, output),

        Commands::Definitions {
            source,
            facade,
            labels,
        } => run_definitions(&source, facade.as_deref(), labels),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_render(
    dir: &Path,
    pattern: &str,
    audiences: &[String],
    labels: Labels,
    format: Format,
    quiet: bool,
) -> Result<(), u8> {
    let audiences: Vec<&str> = if audiences.is_empty() {
        DEFAULT_AUDIENCES.to_vec()
    } else {
        audiences.iter().map(String::as_str).collect()
    };
    let options = LinearizeOptions::new().labels(labels.into());

    let report = render_dir(dir, &InputPattern::new(pattern), &audiences, &options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if format == Format::Json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            eprintln!("Error serializing report: {}", e);
            2u8
        })?;
        println!("{}", json);
    } else {
        for file_report in &report.results {
            match file_report.status {
                FileStatus::Ok if !quiet => {
                    println!("  ✓ {}", file_report.file.display());
                    for output in &file_report.outputs {
                        println!("    → {}", output.display());
                    }
                }
                FileStatus::Ok => {}
                FileStatus::Error => {
                    println!("  ✗ {}", file_report.file.display());
                    if let Some(error) = &file_report.error {
                        println!("    {}", error);
                    }
                }
            }
        }

        if !quiet || !report.is_ok() {
            println!(
                "{} files checked: {} rendered, {} failed",
                report.files_checked, report.rendered, report.failed
            );
        }
    }

    if report.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}

fn load_facades(source: &str) -> Result<Vec<Facade>, u8> {
    load_document_auto(source)
        .and_then(parse_facades)
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })
}

fn run_show(
    source: &str,
    audience: &str,
    labels: Labels,
    output: Option<PathBuf>,
) -> Result<(), u8> {
    let facades = load_facades(source)?;
    let options = LinearizeOptions::new().labels(labels.into());

    let lines = format_facades(&facades, audience, &options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    let text = lines.join("\n");

    match output {
        Some(path) => {
            std::fs::write(&path, &text).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", text);
        }
    }

    Ok(())
}

fn run_definitions(source: &str, facade: Option<&str>, labels: Labels) -> Result<(), u8> {
    let facades = load_facades(source)?;
    let options = LinearizeOptions::new().labels(labels.into());

    let selected = facades
        .iter()
        .filter(|f| facade.map(|name| f.name == name).unwrap_or(true));

    let mut found = false;
    for f in selected {
        found = true;
        let dumped = linearize_definitions(f.definitions(), &options).map_err(|e| {
            eprintln!("Error: {}: {}", f.name, e);
            e.exit_code() as u8
        })?;
        for (name, lines) in dumped {
            println!("# {}.{}", f.name, name);
            for line in lines {
                println!("{}", line);
            }
            println!();
        }
    }

    if let (Some(name), false) = (facade, found) {
        eprintln!("Error: no facade named '{}'", name);
        return Err(2);
    }

    Ok(())
}
