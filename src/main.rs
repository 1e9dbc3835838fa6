use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use devprobe::collectors::load::{collect_system_load, CpuUsageSampler};
use devprobe::config::{load_config, Config};
use devprobe::display::Renderer;
use devprobe::{collect_device_facts, BenchmarkEngine, IioProvider, SensorStream};
use tracing_subscriber::EnvFilter;

const BENCH_POLL: Duration = Duration::from_millis(100);
const DEFAULT_LOG: &str = "warn";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    let renderer = Renderer::from_config(&config);

    let mode = std::env::args().nth(1).unwrap_or_else(|| "info".to_string());
    match mode.as_str() {
        "info" => print_lines(renderer.render_facts(&collect_device_facts())),
        "sensors" => monitor_sensors(&config, &renderer)?,
        "bench" => run_benchmark(&config, &renderer)?,
        other => bail!("unknown mode '{}', expected one of: info, sensors, bench", other),
    }
    Ok(())
}

/// `RUST_LOG` when it parses, otherwise warnings and up
fn log_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG))
}

fn still_monitoring(started: Instant, duration_secs: u64) -> bool {
    started.elapsed() < Duration::from_secs(duration_secs)
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

fn monitor_sensors(config: &Config, renderer: &Renderer) -> Result<()> {
    let mut stream = SensorStream::new(Arc::new(IioProvider::new()), config.sensors.interval())?;
    stream.start();

    let started = Instant::now();
    while still_monitoring(started, config.sensors.duration_secs) {
        thread::sleep(Duration::from_secs(1));
        print_lines(renderer.render_sensors(&stream.snapshot()));
        println!();
    }

    stream.stop();
    Ok(())
}

fn run_benchmark(config: &Config, renderer: &Renderer) -> Result<()> {
    let mut sampler = CpuUsageSampler::new();
    sampler.sample();

    let engine = BenchmarkEngine::new(config.benchmark.clone());
    engine.run()?;

    let mut last_progress = -1.0;
    while engine.is_running() {
        let snapshot = engine.snapshot();
        if snapshot.progress != last_progress {
            last_progress = snapshot.progress;
            eprintln!("{:>3.0}%", snapshot.progress * 100.0);
        }
        thread::sleep(BENCH_POLL);
    }
    engine.wait();

    print_lines(renderer.render_benchmark(&engine.snapshot()));
    print_lines(renderer.render_load(&collect_system_load(&mut sampler)));
    Ok(())
}
