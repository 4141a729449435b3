//! Zonefeed entrypoint: parse a zone file, count what comes out.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use zone_record::{Cache, Options, Record, parse_file};
use zone_types::ClassCode;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "zonefeed", version, about = "Bulk zone file parser")]
struct Args {
    /// Zone file to parse.
    pub zone: PathBuf,
    /// Initial origin (absolute, e.g. `example.com.`).
    #[arg(long)]
    pub origin: Option<String>,
    /// Default TTL applied to records that omit one.
    #[arg(long)]
    pub ttl: Option<u32>,
    /// Default class (IN, CS, CH, HS).
    #[arg(long)]
    pub class: Option<String>,
    /// Configuration file path (overrides discovery of `zonefeed.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Append diagnostics to this file instead of stderr.
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

/// `[defaults]` section of `zonefeed.toml`. Unknown fields are ignored
/// so the file can grow without breaking older binaries.
#[derive(Debug, Deserialize, Default, Clone)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
}

#[derive(Debug, Deserialize, Default, Clone)]
struct DefaultsConfig {
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    ttl: Option<u32>,
    #[serde(default)]
    class: Option<String>,
}

fn load_config(explicit: Option<&PathBuf>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => path.clone(),
        None => {
            let discovered = PathBuf::from("zonefeed.toml");
            if !discovered.exists() {
                return Ok(ConfigFile::default());
            }
            discovered
        }
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ConfigFile =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    debug!(target: "zonefeed::config", path = %path.display(), "loaded config");
    Ok(config)
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

#[derive(Debug, Default)]
struct Totals {
    records: u64,
    rdata_bytes: u64,
}

fn run(args: &Args) -> Result<Totals> {
    let config = load_config(args.config.as_ref())?;

    let origin = args
        .origin
        .clone()
        .or(config.defaults.origin)
        .unwrap_or_else(|| ".".to_string());
    let ttl = args.ttl.or(config.defaults.ttl).unwrap_or(3600);
    let class_text = args
        .class
        .clone()
        .or(config.defaults.class)
        .unwrap_or_else(|| "IN".to_string());
    let Some(class) = ClassCode::from_mnemonic(class_text.as_bytes()) else {
        bail!("unrecognized class {class_text:?} (expected IN, CS, CH or HS)");
    };

    let options = Options::new(origin, ttl, class);
    let mut cache = Cache::new(1);
    let mut totals = Totals::default();
    let mut sink = |record: &Record<'_>| {
        totals.records += 1;
        totals.rdata_bytes += record.rdata.len() as u64;
        Ok(0)
    };

    parse_file(&args.zone, options, &mut cache, &mut sink)
        .with_context(|| format!("parsing {}", args.zone.display()))?;
    Ok(totals)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.log_file.as_ref())?;

    let size = std::fs::metadata(&args.zone)
        .map(|m| m.len())
        .unwrap_or_default();
    let started = Instant::now();
    let totals = run(&args)?;
    let elapsed = started.elapsed();

    info!(
        target: "zonefeed",
        records = totals.records,
        elapsed_ms = elapsed.as_millis() as u64,
        "parse finished"
    );
    let secs = elapsed.as_secs_f64().max(f64::EPSILON);
    println!(
        "{}: {} records, {} rdata bytes in {:.3}s ({:.0} records/s, {:.1} MB/s)",
        args.zone.display(),
        totals.records,
        totals.rdata_bytes,
        elapsed.as_secs_f64(),
        totals.records as f64 / secs,
        size as f64 / secs / (1024.0 * 1024.0),
    );
    Ok(())
}
