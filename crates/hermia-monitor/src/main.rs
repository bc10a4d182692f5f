use anyhow::{Context, Result};
use chrono::Utc;
use hermia_collector::csv_file::{self, CsvCollector};
use hermia_collector::synthetic::SyntheticCollector;
use hermia_collector::Collector;
use hermia_monitor::config::MonitorConfig;
use hermia_monitor::pipeline::Monitor;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/monitor.toml";
const DEFAULT_DEMO_COUNT: usize = 50;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  hermia-monitor [run] [config.toml]                          Replay readings through the alert engine");
    eprintln!("  hermia-monitor generate-demo <readings.csv> [count] [--spike]  Write synthetic demo readings");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hermia=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("generate-demo") => {
            let path = args.get(2).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("generate-demo requires a <readings.csv> argument")
            })?;
            let rest = &args[3..];
            let spike = rest.iter().any(|a| a == "--spike");
            let count = match rest.iter().find(|a| *a != "--spike") {
                Some(raw) => raw
                    .parse::<usize>()
                    .with_context(|| format!("invalid count: {raw}"))?,
                None => DEFAULT_DEMO_COUNT,
            };
            run_generate_demo(path, count, spike)
        }
        Some("run") => run_monitor(args.get(2).map_or(DEFAULT_CONFIG_PATH, |s| s.as_str())),
        Some("-h") | Some("--help") => {
            print_usage();
            Ok(())
        }
        Some(config_path) => run_monitor(config_path),
        None => run_monitor(DEFAULT_CONFIG_PATH),
    }
}

fn run_monitor(config_path: &str) -> Result<()> {
    let config = MonitorConfig::load_or_default(config_path)
        .with_context(|| format!("failed to load config {config_path}"))?;
    let mut monitor = Monitor::from_config(&config)?;

    tracing::info!(
        device_id = %config.device_id,
        window_size = config.engine.window_size,
        quorum = config.engine.quorum,
        readings = %config.readings_path,
        evidence = %config.evidence_path,
        "hermia-monitor starting"
    );

    let mut collector = CsvCollector::new(&config.readings_path);
    let readings = collector
        .collect()
        .with_context(|| "failed to load readings (create a demo file with `generate-demo`)")?;

    let summary = monitor.run(readings);
    if monitor.store().is_empty() {
        tracing::warn!(path = %config.readings_path, "Readings file holds no readings");
    }
    tracing::info!(
        readings = summary.readings,
        retained = monitor.store().len(),
        alerts = summary.alerts,
        evidence_failures = summary.evidence_failures,
        "Replay finished"
    );

    if summary.evidence_failures > 0 {
        anyhow::bail!(
            "{} of {} alerts could not be recorded in {}",
            summary.evidence_failures,
            summary.alerts,
            config.evidence_path
        );
    }
    Ok(())
}

fn run_generate_demo(path: &str, count: usize, spike: bool) -> Result<()> {
    let mut collector = SyntheticCollector::new(count, Utc::now());
    if spike {
        // long enough to meet the default quorum
        collector = collector.with_spike(MonitorConfig::default().engine.quorum);
    }
    let readings = collector.collect()?;
    csv_file::write_readings(Path::new(path), &readings)?;
    tracing::info!(path, count = readings.len(), spike, "Demo readings written");
    Ok(())
}
