use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::{Path, PathBuf};

use tallyconv::sink::{OutputFormat, sink_for};
use tallyconv::{ConvertConfigBuilder, RefDateSource, UnclassifiedPolicy, build_report};

#[derive(Parser, Debug)]
#[command(name = "tallyconv", version, about = "Convert Tally receipt vouchers to a spreadsheet")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one XML export.
    Convert(ConvertArgs),
    /// Serve the HTTP upload endpoint.
    #[cfg(feature = "server")]
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Tally XML export.
    input: PathBuf,
    /// Output file; `-` writes to stdout. Defaults to the input path with
    /// the format's extension.
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = Format::Xlsx)]
    format: Format,
    /// Largest imbalance still reported as verified.
    #[arg(long, default_value = "0")]
    tolerance: Decimal,
    /// Emit rows for bill allocations of unknown type.
    #[arg(long)]
    include_unclassified: bool,
    /// Fill "Ref Date" from the voucher's REFERENCEDATE when present.
    #[arg(long)]
    reference_date: bool,
    #[arg(long, default_value = "Sheet1")]
    sheet_name: String,
    /// Exit with an error if any voucher produced a warning.
    #[arg(long)]
    strict: bool,
}

#[cfg(feature = "server")]
#[derive(clap::Args, Debug)]
struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:5000")]
    listen: std::net::SocketAddr,
    /// Largest accepted upload in MiB.
    #[arg(long, default_value_t = 64)]
    max_upload_mib: usize,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Xlsx,
    Csv,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Xlsx => OutputFormat::Xlsx,
            Format::Csv => OutputFormat::Csv,
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tallyconv=info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Convert(args) => run_convert(args),
        #[cfg(feature = "server")]
        Command::Serve(args) => run_serve(args),
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let mut builder = ConvertConfigBuilder::new()
        .tolerance(args.tolerance)
        .sheet_name(args.sheet_name);
    if args.include_unclassified {
        builder = builder.unclassified(UnclassifiedPolicy::BlankRole);
    }
    if args.reference_date {
        builder = builder.ref_date(RefDateSource::ReferenceDate);
    }
    let config = builder.build();

    let document = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let report = build_report(&document, &config)
        .with_context(|| format!("converting {}", args.input.display()))?;
    if args.strict && !report.warnings.is_empty() {
        anyhow::bail!("{} warning(s) in {}", report.warnings.len(), args.input.display());
    }

    let sink = sink_for(args.format.into(), &config);
    let bytes = sink.write(&report.headers(), &report.projected())?;

    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.input, sink.file_extension()));
    if output == Path::new("-") {
        std::io::stdout().write_all(&bytes)?;
    } else {
        std::fs::write(&output, &bytes)
            .with_context(|| format!("writing {}", output.display()))?;
        tracing::info!(
            output = %output.display(),
            groups = report.groups,
            rows = report.rows.len(),
            "wrote report"
        );
    }
    Ok(())
}

fn default_output(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

#[cfg(feature = "server")]
fn run_serve(args: ServeArgs) -> Result<()> {
    let config = tallyconv::server::ServerConfig {
        listen: args.listen,
        max_upload_bytes: args.max_upload_mib * 1024 * 1024,
        ..Default::default()
    };
    let runtime = tokio::runtime::Runtime::new().context("starting runtime")?;
    runtime.block_on(tallyconv::server::serve(config))?;
    Ok(())
}
