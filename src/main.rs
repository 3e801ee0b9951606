// fastvar command line host
//
// Plays the editor: reads a component file, asks the pickers on the terminal
// and writes the result back atomically.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fastvar::applier::edits_for;
use fastvar::cli::{CliHost, CreateReport, KindsReport, OutputFormat, OutputWriter, patch_text};
use fastvar::kinds::{DialectKey, InitialValue, menu};
use fastvar::resolver::{EditorSelection, resolve};
use fastvar::session::{CreateRequest, CreateVariable, PresetAnswers};
use fastvar::transaction::FileTransaction;
use fastvar::FastVarConfig;
use fastvar_syntax::{LanguageTag, Position, SourceDocument, classify, detect_language_from_extension};

#[derive(Parser)]
#[command(name = "fastvar")]
#[command(about = "Create variables, methods and styles from where you use them", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./fastvar.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a declaration for the name at a position
    Create {
        /// Component file to edit
        #[arg(short, long)]
        file: PathBuf,

        /// 1-based line of the cursor
        #[arg(short, long)]
        line: usize,

        /// 1-based column of the cursor
        #[arg(short, long)]
        column: usize,

        /// Selected text, when there is a selection
        #[arg(short, long)]
        selection: Option<String>,

        /// vue, svelte, jsx or tsx (detected from the extension by default)
        #[arg(long)]
        language: Option<String>,

        /// Declaration kind label, e.g. `methods` or `ref` (asked when omitted)
        #[arg(short, long)]
        kind: Option<String>,

        /// Initial value literal, e.g. `0` or `''` (asked when omitted)
        #[arg(long)]
        value: Option<String>,

        /// Use the deep selector form for style rules
        #[arg(long, conflicts_with = "no_deep")]
        deep: bool,

        #[arg(long)]
        no_deep: bool,

        /// Print the patch instead of writing the file
        #[arg(long)]
        dry_run: bool,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },

    /// Print the declaration kinds offered at a position
    Kinds {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        line: usize,

        #[arg(short, long)]
        column: usize,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FastVarConfig::discover(cli.config.as_deref())?;
    let _log_guard = init_logging(config.log_dir.as_deref())?;

    match cli.command {
        Commands::Create {
            file,
            line,
            column,
            selection,
            language,
            kind,
            value,
            deep,
            no_deep,
            dry_run,
            json,
        } => {
            let value = value
                .map(|v| InitialValue::parse(&v).ok_or_else(|| anyhow!("Unknown initial value: {}", v)))
                .transpose()?;
            let presets = PresetAnswers {
                kind,
                value,
                deep: if deep {
                    Some(true)
                } else if no_deep {
                    Some(false)
                } else {
                    None
                },
            };
            let options = CreateOptions {
                position: cursor_position(line, column),
                selection: selection.unwrap_or_default(),
                dry_run,
                format: output_format(json),
            };
            create(&config, &file, language.as_deref(), presets, options).await
        }
        Commands::Kinds {
            file,
            line,
            column,
            language,
            json,
        } => kinds(&file, language.as_deref(), cursor_position(line, column), output_format(json)),
    }
}

/// Console output on stderr; a daily-rolling file when `log_dir` is set.
/// `FASTVAR_LOG` takes precedence over `RUST_LOG`.
fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env("FASTVAR_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new("fastvar=info,fastvar_syntax=info"))?;

    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(filter).with(console).init();
        return Ok(None);
    };

    fs::create_dir_all(dir)?;
    let (file_writer, guard) = non_blocking(rolling::daily(dir, "fastvar.log"));
    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_target(true)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
    debug!("Logging to {}", dir.join("fastvar.log").display());
    Ok(Some(guard))
}

struct CreateOptions {
    position: Position,
    selection: String,
    dry_run: bool,
    format: OutputFormat,
}

fn cursor_position(line: usize, column: usize) -> Position {
    Position::new(line.saturating_sub(1), column.saturating_sub(1))
}

fn output_format(json: bool) -> OutputFormat {
    if json { OutputFormat::Json } else { OutputFormat::Text }
}

fn language_of(file: &Path, explicit: Option<&str>) -> Result<LanguageTag> {
    match explicit {
        Some(tag) => tag.parse(),
        None => detect_language_from_extension(file)
            .ok_or_else(|| anyhow!("Cannot tell the component language of {}; pass --language", file.display())),
    }
}

async fn create(
    config: &FastVarConfig,
    file: &Path,
    language: Option<&str>,
    presets: PresetAnswers,
    options: CreateOptions,
) -> Result<()> {
    let language = language_of(file, language)?;
    let transaction = FileTransaction::begin(file)?;
    let text = transaction.original().to_string();

    let request = CreateRequest {
        text: text.clone(),
        language,
        selection: EditorSelection {
            selected: options.selection,
            position: options.position,
        },
    };
    let mut host = CliHost::new(&text, BufReader::new(io::stdin()));
    let outcome = CreateVariable::new(config)
        .with_presets(presets)
        .run(&mut host, &request)
        .await?;

    for error in host.errors() {
        eprintln!("{}", error);
    }
    let Some(plan) = outcome else {
        return Ok(());
    };

    let after = host.buffer().text().to_string();
    let classified = classify(&text, language);
    let report = CreateReport {
        file,
        language: language.as_str(),
        dry_run: options.dry_run,
        plan: &plan,
        edits: edits_for(&classified, &plan),
        cursor: host.cursor(),
        patch: patch_text(&text, &after),
    };

    if options.dry_run {
        info!("Dry run, {} left unchanged", file.display());
    } else {
        transaction.commit(&after)?;
        info!("Updated {}", file.display());
    }
    OutputWriter::new(options.format).write_create(&report)
}

fn kinds(file: &Path, language: Option<&str>, position: Position, format: OutputFormat) -> Result<()> {
    let language = language_of(file, language)?;
    let text = fs::read_to_string(file)?;
    let classified = classify(&text, language);
    let dialect = DialectKey::of(&classified.classification);
    let resolved = resolve(&SourceDocument::new(text.as_str()), &EditorSelection::cursor(position)).ok();

    let kinds = match (dialect, &resolved) {
        (Some(dialect), Some(name)) => menu(dialect, name.prefix.as_deref(), name.is_dotted()),
        (Some(dialect), None) => dialect.vocabulary().to_vec(),
        (None, _) => Vec::new(),
    };
    let report = KindsReport {
        file,
        dialect: dialect.map(|d| d.to_string()),
        candidate: resolved.as_ref().map(|r| r.raw.clone()),
        prefix: resolved.and_then(|r| r.prefix),
        kinds,
    };
    OutputWriter::new(format).write_kinds(&report)
}
