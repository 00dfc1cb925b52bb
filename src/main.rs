//! scoring-csv CLI - detect a CSV dialect and re-emit the keyed table

use clap::Parser;
use scoring_csv::{
    CodecError, Dialect, FormatConfig, Response, load_input, read_table, write_table,
};
use std::fs::File;
use std::io::{self, BufWriter, Cursor, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// CSV dialect detection and keyed table conversion.
///
/// Reads a CSV file whose dialect is either given or sniffed, parses it into
/// keyed rows (the first column is the row id if its header is "id"), and
/// writes the rows back out.
#[derive(Parser, Debug)]
#[command(name = "scoring-csv")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file
    file: PathBuf,

    /// Delimiter character, or \t for tab (sniffed if neither -d nor -q is given)
    #[arg(short = 'd', long)]
    delimiter: Option<String>,

    /// Quote character, or \' / \" (sniffed if neither -d nor -q is given)
    #[arg(short = 'q', long)]
    quote: Option<String>,

    /// Output delimiter (default: input delimiter)
    #[arg(long)]
    out_delimiter: Option<String>,

    /// Output quote character (default: input quote)
    #[arg(long)]
    out_quote: Option<String>,

    /// Output format: csv (default) or json
    #[arg(short = 'f', long, default_value = "csv")]
    format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Only print the detected dialect
    #[arg(long)]
    dialect_only: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error processing {}: {}", args.file.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let env = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), CodecError> {
    let mut input = Cursor::new(load_input(&args.file)?);

    let mut config = FormatConfig::new();
    if let Some(ref d) = args.delimiter {
        config.delimiter(d.as_str());
    }
    if let Some(ref q) = args.quote {
        config.quote(q.as_str());
    }

    let dialect = config.dialect_for(&mut input)?;
    info!(%dialect, file = %args.file.display(), "input dialect");

    if args.dialect_only {
        println!("{dialect}");
        return Ok(());
    }

    let table = read_table(&mut input, &dialect)?;

    let output: Box<dyn Write> = match args.output {
        Some(ref path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut output = BufWriter::new(output);

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut output, &table)?;
            writeln!(output)?;
            output.flush()?;
        }
        OutputFormat::Csv => {
            let out_dialect = output_dialect(args, dialect)?;
            let responses = table.map(|request| Response::echo(&request));
            write_table(output, &out_dialect, &responses)?;
        }
    }

    Ok(())
}

/// Output dialect: the input dialect with any `--out-*` overrides applied.
fn output_dialect(args: &Args, input: Dialect) -> Result<Dialect, CodecError> {
    let overrides = Dialect::resolve(args.out_delimiter.as_deref(), args.out_quote.as_deref())?;

    Ok(Dialect {
        delimiter: if args.out_delimiter.is_some() {
            overrides.delimiter
        } else {
            input.delimiter
        },
        quote: if args.out_quote.is_some() {
            overrides.quote
        } else {
            input.quote
        },
    })
}
