//! `eaf2seg` command line

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use seg_cli::{convert, ConversionJob, DriverConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("eaf2seg")
        .version(seg_cli::VERSION)
        .about("Merge time-aligned annotations into a NewsScape .seg log")
        .arg(
            Arg::new("input")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Annotation file (.eaf)"),
        )
        .arg(
            Arg::new("output")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Destination .seg log, named YYYY-MM-DD_HHMM_..."),
        )
        .arg(
            Arg::new("graph")
                .long("graph")
                .value_parser(value_parser!(PathBuf))
                .help("Exported annotation graph (default: <INPUT> with .graph.json)"),
        )
        .arg(
            Arg::new("tag")
                .long("tag")
                .help("Primary tag written on every line (default: GES_03)"),
        )
        .arg(
            Arg::new("tolerance")
                .long("tolerance")
                .value_parser(value_parser!(u64))
                .help("Window grouping tolerance in milliseconds (default: 0)"),
        )
        .arg(
            Arg::new("no-staging")
                .long("no-staging")
                .action(ArgAction::SetTrue)
                .help("Merge into the existing destination instead of a staged copy"),
        )
        .arg(
            Arg::new("staging-root")
                .long("staging-root")
                .value_parser(value_parser!(PathBuf))
                .help("Root of the dated staging tree (default: /sweep)"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Allow the staged copy to replace an existing destination"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = if verbose {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// File settings first, then command-line overrides
fn driver_config(matches: &ArgMatches) -> anyhow::Result<DriverConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => DriverConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => DriverConfig::default(),
    };

    if let Some(tag) = matches.get_one::<String>("tag") {
        config.conversion = config.conversion.with_primary_tag(tag.as_str());
    }
    if let Some(tolerance) = matches.get_one::<u64>("tolerance") {
        config.conversion = config.conversion.with_tolerance_ms(*tolerance);
    }
    if matches.get_flag("no-staging") {
        config.use_staging = false;
    }
    if let Some(root) = matches.get_one::<PathBuf>("staging-root") {
        config.staging_root = root.clone();
    }
    if matches.get_flag("overwrite") {
        config.overwrite = true;
    }
    config.conversion.validate()?;
    Ok(config)
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let input = matches
        .get_one::<PathBuf>("input")
        .context("missing INPUT")?;
    let output = matches
        .get_one::<PathBuf>("output")
        .context("missing OUTPUT")?;

    let mut job = ConversionJob::new(input, output).with_config(driver_config(matches)?);
    if let Some(graph) = matches.get_one::<PathBuf>("graph") {
        job = job.with_graph(graph);
    }

    let summary = convert(&job)?;
    tracing::info!(
        "Done: {} nodes, {} records, author {:?}",
        summary.nodes,
        summary.records,
        summary.author
    );
    Ok(())
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
