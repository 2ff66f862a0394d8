//! Streaming simulation driver
//!
//! Runs one sketch variant against a synthetic or file-backed stream,
//! mirroring every item into an exact ground truth and appending periodic
//! evaluation records to a results log under
//! `<root>/<dataset>/<algorithm>/w<W>_d<D>/<timestamp>/results.json`.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use tracing_subscriber::EnvFilter;

use sketchbench::common::{SimulationError, SketchError};
use sketchbench::sim::{Algorithm, Config, ResultsLog, Simulation};
use sketchbench::stream::{FileTokenStream, ZipfStream, DEFAULT_EXPONENT, DEFAULT_STREAM_SIZE};

fn main() {
    let exit_code = run_cli(std::env::args().skip(1).collect());
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn print_help() {
    println!(
        "\
simulate - run one sketch variant against a stream and record metrics

USAGE:
    simulate --algorithm NAME --dataset NAME [OPTIONS]

REQUIRED:
    --algorithm NAME    one of: {algorithms}
    --dataset NAME      'synthetic' for the Zipf generator, otherwise a
                        file name under the datasets root

OPTIONS:
    --width INT         override the configured sketch width
    --depth INT         override the configured sketch depth
    --timestamp TAG     output directory tag (default: current local time)
    --config PATH       config file (default: config.json)
    --datasets-root DIR where dataset files live (default: datasets)
    --output-root DIR   where results are written (default: experiments)
    -h, --help          print this help",
        algorithms = Algorithm::ALL.map(|a| a.as_str()).join(", ")
    );
}

struct CliArgs {
    algorithm: String,
    dataset: String,
    width: Option<usize>,
    depth: Option<usize>,
    timestamp: Option<String>,
    config_path: PathBuf,
    datasets_root: PathBuf,
    output_root: PathBuf,
}

fn parse_args(args: &[String]) -> Result<Option<CliArgs>, String> {
    if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
        return Ok(None);
    }

    let mut algorithm = None;
    let mut dataset = None;
    let mut width = None;
    let mut depth = None;
    let mut timestamp = None;
    let mut config_path = PathBuf::from("config.json");
    let mut datasets_root = PathBuf::from("datasets");
    let mut output_root = PathBuf::from("experiments");

    fn take<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
        *i += 1;
        args.get(*i)
            .map(String::as_str)
            .ok_or_else(|| format!("{} requires an argument", flag))
    }

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].clone();
        match flag.as_str() {
            "--algorithm" => algorithm = Some(take(args, &mut i, &flag)?.to_string()),
            "--dataset" => dataset = Some(take(args, &mut i, &flag)?.to_string()),
            "--width" => {
                width = Some(parse_dimension(take(args, &mut i, &flag)?, "--width")?);
            }
            "--depth" => {
                depth = Some(parse_dimension(take(args, &mut i, &flag)?, "--depth")?);
            }
            "--timestamp" => timestamp = Some(take(args, &mut i, &flag)?.to_string()),
            "--config" => config_path = PathBuf::from(take(args, &mut i, &flag)?),
            "--datasets-root" => datasets_root = PathBuf::from(take(args, &mut i, &flag)?),
            "--output-root" => output_root = PathBuf::from(take(args, &mut i, &flag)?),
            other => return Err(format!("unknown option `{}`", other)),
        }
        i += 1;
    }

    Ok(Some(CliArgs {
        algorithm: algorithm.ok_or_else(|| "--algorithm is required".to_string())?,
        dataset: dataset.ok_or_else(|| "--dataset is required".to_string())?,
        width,
        depth,
        timestamp,
        config_path,
        datasets_root,
        output_root,
    }))
}

fn parse_dimension(value: &str, flag: &str) -> Result<usize, String> {
    let parsed: i64 = value
        .parse()
        .map_err(|_| format!("{} expects an integer, got `{}`", flag, value))?;
    if parsed < 1 {
        return Err(format!("{} must be at least 1, got {}", flag, parsed));
    }
    Ok(parsed as usize)
}

fn run_cli(args: Vec<String>) -> i32 {
    let cli = match parse_args(&args) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print_help();
            return 0;
        }
        Err(message) => {
            eprintln!("error: {}", message);
            return 2;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(cli) {
        Ok(()) => 0,
        Err(SimulationError::Sketch(err)) => {
            eprintln!("error: {}", err);
            2
        }
        Err(err) => {
            eprintln!("error: {}", err);
            1
        }
    }
}

fn run(cli: CliArgs) -> Result<(), SimulationError> {
    let mut config = if cli.config_path.exists() {
        Config::load(&cli.config_path)?
    } else {
        tracing::warn!(
            path = %cli.config_path.display(),
            "config file not found, using defaults"
        );
        Config::default()
    };
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(depth) = cli.depth {
        config.depth = depth;
    }
    config.dataset_name = cli.dataset.clone();

    let algorithm: Algorithm = cli
        .algorithm
        .parse::<Algorithm>()
        .map_err(SimulationError::Sketch)?;

    let timestamp = cli
        .timestamp
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d_%H-%M-%S").to_string());
    let results_dir = cli
        .output_root
        .join(&config.dataset_name)
        .join(algorithm.as_str())
        .join(format!("w{}_d{}", config.width, config.depth))
        .join(&timestamp);
    std::fs::create_dir_all(&results_dir)?;
    let results_path = results_dir.join("results.json");
    if !results_path.exists() {
        let mut file = std::fs::File::create(&results_path)?;
        file.write_all(b"[]")?;
    }

    tracing::info!(
        algorithm = %algorithm,
        dataset = %config.dataset_name,
        width = config.width,
        depth = config.depth,
        results = %results_path.display(),
        "starting simulation"
    );

    let mut simulation = Simulation::new(
        algorithm,
        config.width,
        config.depth,
        config.eval_interval,
        ResultsLog::new(results_path),
    )
    .map_err(SimulationError::Sketch)?;

    let sleep_time = Duration::from_secs_f64(config.sleep_time.max(0.0));
    if config.dataset_name == "synthetic" {
        let stream = ZipfStream::new(DEFAULT_STREAM_SIZE, DEFAULT_EXPONENT, sleep_time)
            .map_err(SimulationError::Sketch)?;
        simulation.run(stream)?;
    } else {
        let dataset_path = cli.datasets_root.join(&config.dataset_name);
        let stream = open_dataset(&dataset_path, config.field.as_deref(), sleep_time)?;
        simulation.run(stream)?;
    }
    Ok(())
}

fn open_dataset(
    path: &Path,
    field: Option<&str>,
    sleep_time: Duration,
) -> Result<FileTokenStream, SimulationError> {
    if !path.exists() {
        return Err(SketchError::InvalidParameter {
            param: "dataset".to_string(),
            value: path.display().to_string(),
            constraint: "file does not exist".to_string(),
        }
        .into());
    }
    FileTokenStream::open(path, field, sleep_time)
}
