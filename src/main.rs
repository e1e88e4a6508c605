use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use swingcoach::analysis::{AnalyzerConfig, SwingAnalyzer};
use swingcoach::bounce::BounceConfig;
use swingcoach::mock_swing::MockSwingSource;
use swingcoach::monitor::{OutputFormat, SwingMonitor};
use swingcoach::reference::ReferenceData;
use swingcoach::renderer::RendererClient;
use swingcoach::source::{JsonFileSource, SwingSource};
use swingcoach::trajectory::{TrajectoryConfig, MIN_DT};

#[derive(Parser, Debug)]
#[command(name = "swingcoach-rs")]
#[command(about = "Golf swing analysis and ball-flight reconstruction", long_about = None)]
struct Args {
    /// Swing measurements as JSON (object, array, or one object per line)
    #[arg(short, long, required_unless_present = "mock")]
    input: Option<PathBuf>,

    /// Reference tables (clusters, six-axis stats, baselines); built-in if omitted
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Use generated swings instead of a file
    #[arg(short, long, conflicts_with = "input")]
    mock: bool,

    /// Seconds between generated swings in mock mode
    #[arg(long, default_value = "5.0")]
    mock_interval: f64,

    /// Number of generated swings (runs until Ctrl+C if omitted)
    #[arg(long)]
    mock_count: Option<usize>,

    /// Seed for reproducible mock swings
    #[arg(long)]
    seed: Option<u64>,

    /// Append bounce and roll to each flight
    #[arg(short, long)]
    bounce: bool,

    /// Print reports as JSON lines
    #[arg(long)]
    json: bool,

    /// Integration step in seconds
    #[arg(long, default_value = "0.02")]
    dt: f64,

    /// Share of the face angle in the start direction (0..1)
    #[arg(long, default_value = "0.75")]
    face_weight: f64,

    /// Success factors shown per swing (0 = all)
    #[arg(long, default_value = "3")]
    top_factors: usize,

    /// Show source info and exit
    #[arg(long)]
    info: bool,

    /// Send trajectories to the 3D renderer
    #[arg(long)]
    renderer: bool,

    /// Renderer host
    #[arg(long, default_value = "localhost")]
    renderer_host: String,

    /// Renderer port
    #[arg(long, default_value = "3111")]
    renderer_port: u16,

    /// Use HTTP instead of TCP for the renderer
    #[arg(long)]
    renderer_http: bool,
}

impl Args {
    fn analyzer_config(&self) -> Result<AnalyzerConfig> {
        if !(self.dt.is_finite() && self.dt >= MIN_DT) {
            anyhow::bail!("--dt must be at least {} seconds, got {}", MIN_DT, self.dt);
        }
        if !(0.0..=1.0).contains(&self.face_weight) {
            anyhow::bail!("--face-weight must be within 0..1, got {}", self.face_weight);
        }

        Ok(AnalyzerConfig {
            trajectory: TrajectoryConfig {
                dt: self.dt,
                face_weight: self.face_weight,
                ..Default::default()
            },
            bounce: self.bounce.then_some(BounceConfig { dt: self.dt }),
            max_success_factors: (self.top_factors > 0).then_some(self.top_factors),
        })
    }

    fn renderer_client(&self) -> Option<RendererClient> {
        if !self.renderer {
            return None;
        }
        println!(
            "Renderer integration enabled: {}:{} ({})",
            self.renderer_host,
            self.renderer_port,
            if self.renderer_http { "HTTP" } else { "TCP" }
        );
        Some(RendererClient::new(
            self.renderer_host.clone(),
            self.renderer_port,
            self.renderer_http,
        ))
    }
}

fn run<S: SwingSource>(mut source: S, args: &Args, analyzer: SwingAnalyzer) -> Result<()> {
    source.connect()?;
    let info = source.get_info()?;
    println!(
        "Source: {}",
        info.get("Source").map(String::as_str).unwrap_or("unknown")
    );

    if args.info {
        let mut keys: Vec<_> = info.iter().collect();
        keys.sort();
        for (key, value) in keys {
            println!("  {}: {}", key, value);
        }
        return Ok(());
    }

    if args.mock {
        println!("Mock mode: generating swings every {:.1} seconds", args.mock_interval);
    }
    println!("Press Ctrl+C to stop");
    println!();

    let output = if args.json { OutputFormat::Json } else { OutputFormat::Text };
    let mut monitor = SwingMonitor::with_renderer(source, analyzer, output, args.renderer_client());
    let stats = monitor.run()?;
    if stats.failed > 0 {
        log::warn!("{} of {} swings could not be analyzed", stats.failed, stats.analyzed + stats.failed);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let reference = match &args.reference {
        Some(path) => ReferenceData::from_path(path)
            .with_context(|| format!("Failed to load reference data from {}", path.display()))?,
        None => ReferenceData::builtin().context("Built-in reference data is invalid")?,
    };
    log::info!(
        "[REFERENCE] {} clusters, face model intercept {:.4}",
        reference.clusters.len(),
        reference.face_model.intercept
    );
    let analyzer = SwingAnalyzer::new(reference, args.analyzer_config()?);

    println!("{}", "=".repeat(50));
    println!("  SwingCoach - Swing Analysis & Ball Flight");
    if args.mock {
        println!("  Using MOCK swings (Simulation Mode)");
    }
    println!("{}", "=".repeat(50));
    println!();

    match &args.input {
        Some(path) if !args.mock => run(JsonFileSource::new(path), &args, analyzer),
        _ => run(
            MockSwingSource::new(args.mock_interval, args.seed, args.mock_count),
            &args,
            analyzer,
        ),
    }
}
