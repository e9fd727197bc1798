use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use patient_norm_preprocess::normalizer::DEFAULT_GROUP_KEY;
use patient_norm_preprocess::report::ReportOptions;
use patient_norm_preprocess::{run, ColumnPlacement, Job, NormalizeError, Preset, TargetSelector};

#[derive(Parser)]
#[command(name = "patient-norm")]
#[command(about = "Min-max normalize measurement columns per patient")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Column whose values identify a group (patient)
    #[arg(long, global = true, default_value = DEFAULT_GROUP_KEY)]
    group_key: String,

    /// Field delimiter of input and output
    #[arg(long, global = true, default_value_t = ',')]
    delimiter: char,

    /// Do not print the normalization summary
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Also write the summary as JSON to this path
    #[arg(long, global = true)]
    summary_json: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize every PSD_* band column of a PSD table
    Psd(PathArgs),
    /// Normalize SNR Mean (dB) and SNR Std Dev (dB) of an SNR table
    Snr(PathArgs),
    /// Normalize an explicit list of columns, or all columns with a prefix
    Columns(ColumnsArgs),
}

#[derive(Args)]
struct PathArgs {
    /// Input table (defaults to the preset's file name)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output table (defaults to the preset's file name)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ColumnsArgs {
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    output: PathBuf,

    /// Column to normalize; repeat for several
    #[arg(short, long = "column", required_unless_present = "prefix", conflicts_with = "prefix")]
    columns: Vec<String>,

    /// Normalize every column starting with this prefix
    #[arg(long)]
    prefix: Option<String>,

    #[arg(long, value_enum, default_value_t = Placement::Append)]
    placement: Placement,
}

#[derive(Clone, Copy, ValueEnum)]
enum Placement {
    Append,
    AfterSource,
}

impl From<Placement> for ColumnPlacement {
    fn from(p: Placement) -> Self {
        match p {
            Placement::Append => ColumnPlacement::Append,
            Placement::AfterSource => ColumnPlacement::AfterSource,
        }
    }
}

impl Cli {
    fn job(&self) -> Result<Job> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(|d| d.is_ascii())
            .with_context(|| {
                format!("delimiter {:?} is not a single ASCII character", self.delimiter)
            })?;

        let preset_job = |preset: Preset, paths: &PathArgs| Job {
            input: paths.input.clone().unwrap_or_else(|| preset.default_input()),
            output: paths.output.clone().unwrap_or_else(|| preset.default_output()),
            group_key: self.group_key.clone(),
            targets: preset.targets(),
            placement: preset.placement(),
            delimiter,
            report: ReportOptions {
                preview_groups: preset.preview_groups(),
                original_format: preset.original_format(),
                ..ReportOptions::default()
            },
        };

        Ok(match &self.command {
            Command::Psd(paths) => preset_job(Preset::Psd, paths),
            Command::Snr(paths) => preset_job(Preset::Snr, paths),
            Command::Columns(args) => Job {
                input: args.input.clone(),
                output: args.output.clone(),
                group_key: self.group_key.clone(),
                targets: match &args.prefix {
                    Some(prefix) => TargetSelector::Prefix(prefix.clone()),
                    None => TargetSelector::Explicit(args.columns.clone()),
                },
                placement: args.placement.into(),
                delimiter,
                report: ReportOptions::default(),
            },
        })
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let now = Instant::now();

    match execute(&cli) {
        Ok(()) => {
            info!("Elapsed: {:.2?}", now.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(NormalizeError::MissingInput(path)) = e.downcast_ref::<NormalizeError>() {
                eprintln!("Error: Input file '{}' not found!", path.display());
                eprintln!("Please make sure the file exists in the current directory.");
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let job = cli.job()?;
    let report = run(&job)?;

    if !cli.quiet {
        println!("{}", report);
        println!("Normalization complete!");
        println!("Output saved to: {}", job.output.display());
    }

    if let Some(path) = &cli.summary_json {
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, &report)?;
    }
    Ok(())
}
