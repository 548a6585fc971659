//! formgen CLI
//!
//! Command-line controller: loads a form schema, builds a submission from
//! the arguments, validates it and prints the rendered form.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use formgen::{
    FormData, FormSchema, LocalUploadStore, Submission, TransferMode, UploadedFile, UploadedFiles,
    ValidationErrors,
};

/// Render and validate declarative HTML forms.
#[derive(Parser)]
#[command(name = "formgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema definition file (JSON).
    #[arg(short, long, env = "FORMGEN_SCHEMA")]
    schema: PathBuf,

    /// Directory accepted uploads are written to.
    #[arg(short, long, env = "FORMGEN_UPLOADS_DIR", default_value = "uploads")]
    uploads_dir: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Submitted key/value data.
#[derive(Args)]
struct DataArgs {
    /// Query string, read by GET forms.
    #[arg(short, long, default_value = "")]
    query: String,

    /// Urlencoded body, read by POST forms.
    #[arg(short, long, default_value = "")]
    body: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the form pre-filled with the given data.
    Render {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Validate a submission and print the form with inline errors.
    Validate {
        #[command(flatten)]
        data: DataArgs,

        /// Uploaded file as FIELD=PATH (repeatable).
        #[arg(short, long = "file", value_name = "FIELD=PATH")]
        files: Vec<String>,
    },

    /// List the fields of the schema.
    Inspect,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let schema = load_schema(&cli.schema)?;
    info!(
        "Loaded {} field(s) from {}",
        schema.fields().len(),
        cli.schema.display()
    );

    match cli.command {
        Commands::Render { data } => {
            let submission = build_submission(&data, &[])?;
            println!("{}", schema.render(&submission, &ValidationErrors::new()));
        }

        Commands::Validate { data, files } => {
            let submission = build_submission(&data, &files)?;
            let store = LocalUploadStore::new(&cli.uploads_dir).mode(TransferMode::Copy);

            let (ok, errors) = schema.handle_submission(&submission, &store);
            if ok {
                info!("The form was submitted successfully.");
            } else {
                warn!("Please correct the errors below.");
                for (field, message) in errors.all_errors() {
                    warn!("  {field}: {message}");
                }
            }

            println!("{}", schema.render(&submission, &errors));
            if !ok {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Inspect => {
            println!(
                "{:<20} {:<10} {:<20} {:<9} {:<9} {}",
                "NAME", "KIND", "ID", "REQUIRED", "DISABLED", "OPTIONS"
            );
            println!("{:-<80}", "");
            for field in schema.fields() {
                println!(
                    "{:<20} {:<10} {:<20} {:<9} {:<9} {}",
                    field.name,
                    field.kind,
                    field.element_id(),
                    field.is_required(),
                    field.is_disabled(),
                    field.options.as_ref().map_or(0, |o| o.len())
                );
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Reads and parses a schema definition.
fn load_schema(path: &Path) -> anyhow::Result<FormSchema> {
    FormSchema::from_path(path)
        .with_context(|| format!("failed to load schema {}", path.display()))
}

/// Builds a submission from urlencoded data and `FIELD=PATH` file arguments.
fn build_submission(data: &DataArgs, files: &[String]) -> anyhow::Result<Submission> {
    let mut uploads = UploadedFiles::new();
    for spec in files {
        let (field, file) = parse_file_arg(spec)?;
        uploads.insert(field, file);
    }

    Ok(Submission {
        query: FormData::parse_urlencoded(&data.query)?,
        body: FormData::parse_urlencoded(&data.body)?,
        files: uploads,
    })
}

/// Parses `FIELD=PATH` into upload metadata for a local file.
fn parse_file_arg(spec: &str) -> anyhow::Result<(String, UploadedFile)> {
    let Some((field, path)) = spec.split_once('=') else {
        bail!("expected FIELD=PATH, got {spec:?}");
    };
    if field.is_empty() {
        bail!("missing field name in {spec:?}");
    }

    let path = PathBuf::from(path);
    let metadata =
        fs::metadata(&path).with_context(|| format!("cannot read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok((
        field.to_string(),
        UploadedFile::new(&path, file_name, metadata.len()),
    ))
}
