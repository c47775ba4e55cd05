//! csvtag CLI - inspect field tags and decode CSV files through them
//!
//! Fields are declared on the command line as `NAME=TAG`, decoded as strings
//! and written as JSON.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;

use csvtag::{
    CsvError, DynamicRecord, FieldBinding, FieldTag, OutputFormat, ReaderOptions, RecordReader,
    RecordWriter,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "csvtag")]
#[command(version, about = "Bind CSV columns to fields with declarative tags", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse field tags and print the resulting bindings
    Check {
        /// Tags to parse, e.g. "header:Name" or "index:2;useCustomSetter"
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Decode a CSV file into JSON records
    Decode {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Field declaration as NAME=TAG (repeatable)
        #[arg(short, long = "field", required = true)]
        fields: Vec<String>,

        /// Treat the first row as data rather than a header
        #[arg(long)]
        no_header: bool,

        /// YAML file with reader options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Cell delimiter (overrides config)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Comment character (overrides config)
        #[arg(long)]
        comment: Option<char>,

        /// Allow rows with differing numbers of cells
        #[arg(long)]
        flexible: bool,

        /// Output format (ndjson, json)
        #[arg(long, default_value = "ndjson")]
        format: OutputFormat,
    },
}

struct DecodeArgs {
    input: PathBuf,
    fields: Vec<String>,
    no_header: bool,
    options: ReaderOptions,
    format: OutputFormat,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { tags } => check_tags(&tags),
        Commands::Decode {
            input,
            fields,
            no_header,
            config,
            delimiter,
            comment,
            flexible,
            format,
        } => load_options(config, delimiter, comment, flexible).and_then(|options| {
            decode(DecodeArgs {
                input,
                fields,
                no_header,
                options,
                format,
            })
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Print the binding each tag would produce; fails if any tag is invalid.
fn check_tags(tags: &[String]) -> Result<(), String> {
    let mut failures = 0;

    for tag in tags {
        match FieldTag::parse(tag) {
            Ok(parsed) => {
                let binding = FieldBinding::from_tag(tag.as_str(), parsed, None);
                let json = serde_json::to_string(&binding).map_err(|e| e.to_string())?;
                println!("{}", json);
            }
            Err(e) => {
                eprintln!("  ✗ {}: {}", tag, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} tags are invalid", failures, tags.len()));
    }
    Ok(())
}

/// Options from the config file, then command-line overrides.
fn load_options(
    config: Option<PathBuf>,
    delimiter: Option<char>,
    comment: Option<char>,
    flexible: bool,
) -> Result<ReaderOptions, String> {
    let mut options = match config {
        Some(path) => ReaderOptions::load_from_file(&path).map_err(|e| e.to_string())?,
        None => ReaderOptions::default(),
    };

    if let Some(delimiter) = delimiter {
        options.delimiter = delimiter;
    }
    if let Some(comment) = comment {
        options.comment = Some(comment);
    }
    if flexible {
        options.flexible = true;
    }
    Ok(options)
}

fn decode(args: DecodeArgs) -> Result<(), String> {
    let mut record = DynamicRecord::new();
    for spec in &args.fields {
        let (name, tag) = DynamicRecord::parse_field_spec(spec)
            .ok_or_else(|| format!("invalid field '{}', expected NAME=TAG", spec))?;
        if record.has_field(&name) {
            return Err(format!("field '{}' is declared more than once", name));
        }
        record = record.with_field(name, tag);
    }

    let file = File::open(&args.input)
        .map_err(|e| format!("Failed to open {}: {}", args.input.display(), e))?;
    let mut reader = RecordReader::from_reader(file, &args.options).map_err(|e| e.to_string())?;

    if !args.no_header && !reader.parse_header(&mut record).map_err(|e| e.to_string())? {
        return Err(format!("{} is empty", args.input.display()));
    }

    let stdout = io::stdout();
    let mut writer = RecordWriter::new(stdout.lock(), args.format).map_err(|e| e.to_string())?;
    let mut skipped = 0;

    loop {
        record.clear();
        match reader.read_record(&mut record) {
            Ok(true) => writer.write(&record).map_err(|e| e.to_string())?,
            Ok(false) => break,
            Err(e @ CsvError::SetValue { .. }) => {
                tracing::warn!("Skipping row: {}", e);
                skipped += 1;
            }
            Err(e) => return Err(e.to_string()),
        }
    }

    let written = writer.written();
    let _stdout = writer.finish().map_err(|e| e.to_string())?;
    tracing::info!("Decoded {} records, skipped {}", written, skipped);

    Ok(())
}
