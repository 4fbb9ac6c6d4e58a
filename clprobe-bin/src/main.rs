//! Command-line interface for clprobe

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clprobe::{DeviceType, Detail, ProbeConfig};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "clprobe")]
#[command(version = clprobe::VERSION)]
#[command(about = "List OpenCL platforms and devices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// OpenCL ICD loader library to bind instead of searching
    #[arg(long, global = true, env = "CLPROBE_LIBRARY")]
    library: Option<PathBuf>,

    /// Exit with a non-zero status when the probe fails
    #[arg(long, global = true)]
    strict: bool,

    /// Increase log output (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Report platforms and their devices (default)
    Report {
        /// Device types to list
        #[arg(long, value_enum, default_value_t = DeviceFilter::All)]
        device_type: DeviceFilter,

        /// Query the extended device attribute set
        #[arg(long)]
        detailed: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Export the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List platform names only
    Platforms,

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DeviceFilter {
    All,
    Default,
    Cpu,
    Gpu,
    Accelerator,
    Custom,
}

impl From<DeviceFilter> for DeviceType {
    fn from(filter: DeviceFilter) -> Self {
        match filter {
            DeviceFilter::All => DeviceType::ALL,
            DeviceFilter::Default => DeviceType::DEFAULT,
            DeviceFilter::Cpu => DeviceType::CPU,
            DeviceFilter::Gpu => DeviceType::GPU,
            DeviceFilter::Accelerator => DeviceType::ACCELERATOR,
            DeviceFilter::Custom => DeviceType::CUSTOM,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let strict = cli.strict;
    match execute(cli) {
        Ok(true) => ExitCode::SUCCESS,
        // The probe error was already printed as an `Exception` line
        Ok(false) if strict => ExitCode::FAILURE,
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Runs the selected command.
///
/// Returns `Ok(false)` when the probe itself failed; that failure has
/// already been printed. `Err` is left for output and export problems.
fn execute(cli: Cli) -> anyhow::Result<bool> {
    let command = cli.command.unwrap_or(Commands::Report {
        device_type: DeviceFilter::All,
        detailed: false,
        format: OutputFormat::Text,
        output: None,
    });

    match command {
        Commands::Report { device_type, detailed, format, output } => {
            let mut config = ProbeConfig::default().with_device_type(device_type.into());
            if detailed {
                config.detail = Detail::Extended;
            }
            config.library_path = cli.library;
            log::debug!("report config: {:?}", config);

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            if format == OutputFormat::Text && output.is_none() {
                return Ok(clprobe::run_and_report(config.bind(), &config, &mut out).is_ok());
            }

            let collected = config.bind().and_then(|driver| clprobe::collect(&driver, &config));
            let report = match collected {
                Ok(report) => report,
                Err(e) => {
                    writeln!(out, "Exception {}", e)?;
                    return Ok(false);
                }
            };

            if let Some(path) = output {
                log::info!("exporting report to {}", path.display());
                report
                    .export_json(&path)
                    .with_context(|| format!("failed to export {}", path.display()))?;
                writeln!(out, "✅ Report exported to: {}", path.display())?;
            } else {
                writeln!(out, "{}", report.to_json()?)?;
            }
        }

        Commands::Platforms => {
            let config = ProbeConfig {
                library_path: cli.library,
                ..ProbeConfig::default()
            };
            let names = match config.bind().and_then(|driver| clprobe::platform_names(&driver)) {
                Ok(names) => names,
                Err(e) => {
                    println!("Exception {}", e);
                    return Ok(false);
                }
            };

            if names.is_empty() {
                println!("❌ No OpenCL platforms found.");
            } else {
                println!("📱 Found {} OpenCL platform(s):", names.len());
                for name in names {
                    println!("  • {}", name);
                }
            }
        }

        Commands::Version => {
            println!("clprobe v{}", clprobe::version());
            println!("OpenCL platform and device inspector");
        }
    }

    Ok(true)
}
