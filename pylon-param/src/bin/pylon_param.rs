use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pylon_param::{
    CameraParameters, DiagnosticLog, MemoryStore, Result, TracingSink, args::parse_param_rules,
};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
enum Format {
    #[default]
    Yaml,
    Json,
}

#[derive(Parser)]
#[command(name = "pylon-param")]
#[command(about = "Resolve and validate pylon camera startup parameters")]
struct Cli {
    /// YAML parameter file (ROS 2 node-scoped or flat layout)
    #[arg(long)]
    params_file: Option<PathBuf>,

    /// Fully-qualified node name used to select parameter blocks
    #[arg(long, default_value = "/pylon_camera_node")]
    node: String,

    /// Parameter override, applied after the file (repeatable)
    #[arg(short = 'p', long = "param", value_name = "NAME:=VALUE")]
    params: Vec<String>,

    /// Change the frame rate after resolution
    #[arg(long)]
    frame_rate: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    format: Format,

    /// Also print the store contents, including write-backs
    #[arg(long)]
    dump_store: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    parameters: &'a CameraParameters,
    diagnostics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<std::collections::BTreeMap<String, String>>,
}

fn init_logger(debug: bool) {
    let default_filter = if debug {
        "pylon_param=debug"
    } else {
        "pylon_param=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.debug);

    let store = match &cli.params_file {
        Some(path) => MemoryStore::from_yaml_file(path, &cli.node)?,
        None => MemoryStore::new(),
    };
    store.extend(parse_param_rules(&cli.params)?);

    let log = DiagnosticLog::forwarding_to(TracingSink);
    let mut params = CameraParameters::read_from_store(&store, &log);
    if let Some(frame_rate) = cli.frame_rate {
        params.set_frame_rate(&store, frame_rate);
    }

    let report = Report {
        parameters: &params,
        diagnostics: log
            .entries()
            .iter()
            .map(|d| format!("{}: {}", d.severity(), d))
            .collect(),
        store: cli.dump_store.then(|| {
            store
                .snapshot()
                .into_iter()
                .map(|(name, value)| (name, value.to_string()))
                .collect()
        }),
    };

    let output = match cli.format {
        Format::Yaml => serde_yaml::to_string(&report)?,
        Format::Json => serde_json::to_string_pretty(&report)?,
    };
    println!("{}", output.trim_end());

    Ok(())
}
