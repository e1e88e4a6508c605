use anyhow::Result;
use std::fmt::Write as _;
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::analysis::{SwingAnalyzer, SwingReport};
use crate::classify::Classification;
use crate::renderer::RendererClient;
use crate::source::SwingSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub analyzed: usize,
    pub failed: usize,
}

/// Pulls swings from a source, analyzes them and prints the reports.
pub struct SwingMonitor<S: SwingSource> {
    source: S,
    analyzer: SwingAnalyzer,
    output: OutputFormat,
    renderer: Option<Arc<Mutex<RendererClient>>>,
    /// Renderer pushes still in flight.
    pushes: Vec<JoinHandle<()>>,
    poll_interval: Duration,
    stats: MonitorStats,
}

impl<S: SwingSource> SwingMonitor<S> {
    pub fn new(source: S, analyzer: SwingAnalyzer, output: OutputFormat) -> Self {
        Self::with_renderer(source, analyzer, output, None)
    }

    pub fn with_renderer(
        source: S,
        analyzer: SwingAnalyzer,
        output: OutputFormat,
        mut renderer: Option<RendererClient>,
    ) -> Self {
        if let Some(ref mut client) = renderer {
            match client.connect() {
                Ok(()) => log::info!("[RENDERER] Ready to send trajectories"),
                Err(e) => log::info!(
                    "[RENDERER] Renderer not available at startup: {}. Will retry on each swing.",
                    e
                ),
            }
        }

        Self {
            source,
            analyzer,
            output,
            renderer: renderer.map(|c| Arc::new(Mutex::new(c))),
            pushes: Vec::new(),
            poll_interval: Duration::from_millis(10),
            stats: MonitorStats::default(),
        }
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Run until Ctrl+C or until the source is exhausted.
    pub fn run(&mut self) -> Result<MonitorStats> {
        let (tx, rx) = mpsc::channel();
        ctrlc::set_handler(move || {
            let _ = tx.send(());
        })?;
        self.run_until(&rx)
    }

    pub fn run_until(&mut self, stop: &mpsc::Receiver<()>) -> Result<MonitorStats> {
        self.source.connect()?;

        loop {
            if stop.try_recv().is_ok() {
                println!();
                println!("Stopping...");
                break;
            }

            match self.source.read_swing() {
                Ok(Some(swing)) => {
                    if let Some(report) = self.process(&swing) {
                        self.print_report(&report);
                        self.push_to_renderer(report);
                    }
                }
                Ok(None) if self.source.is_exhausted() => break,
                Ok(None) => std::thread::sleep(self.poll_interval),
                Err(e) => {
                    log::warn!("Error reading swing: {}", e);
                    std::thread::sleep(self.poll_interval);
                }
            }
        }

        self.finish_pushes();
        if let Some(ref client) = self.renderer {
            if let Ok(mut client) = client.lock() {
                client.disconnect();
            }
        }

        log::info!(
            "[MONITOR] {} swings analyzed, {} failed",
            self.stats.analyzed,
            self.stats.failed
        );
        Ok(self.stats)
    }

    /// Analyze one swing; failures are logged and counted.
    pub fn process(&mut self, swing: &crate::swing::SwingMeasurement) -> Option<SwingReport> {
        match self.analyzer.analyze(swing) {
            Ok(report) => {
                self.stats.analyzed += 1;
                Some(report)
            }
            Err(e) => {
                self.stats.failed += 1;
                log::warn!("[MONITOR] Swing rejected: {}", e);
                None
            }
        }
    }

    fn print_report(&self, report: &SwingReport) {
        match self.output {
            OutputFormat::Json => match serde_json::to_string(report) {
                Ok(line) => println!("{}", line),
                Err(e) => log::warn!("[MONITOR] Failed to serialize report: {}", e),
            },
            OutputFormat::Text => print!("{}", format_report(report)),
        }
    }

    /// Wait for every pending renderer push.
    fn finish_pushes(&mut self) {
        for handle in self.pushes.drain(..) {
            if handle.join().is_err() {
                log::warn!("[RENDERER] Push thread panicked");
            }
        }
    }

    fn push_to_renderer(&mut self, report: SwingReport) {
        let Some(ref client) = self.renderer else {
            return;
        };
        let client = Arc::clone(client);
        self.pushes.retain(|h| !h.is_finished());

        let handle = std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    log::warn!("[RENDERER] Failed to start runtime: {}", e);
                    return;
                }
            };
            rt.block_on(async move {
                let Ok(mut client) = client.lock() else {
                    log::warn!("[RENDERER] Failed to acquire client lock");
                    return;
                };
                match client.send_report(&report).await {
                    Ok(()) => log::info!("[RENDERER] Trajectory sent"),
                    Err(e) => {
                        let error_str = e.to_string();
                        if error_str.contains("refused")
                            || error_str.contains("Timeout")
                            || error_str.contains("not established")
                        {
                            log::debug!("[RENDERER] Could not send (renderer may not be running): {}", error_str);
                        } else {
                            log::warn!("[RENDERER] Failed to send trajectory: {}", e);
                        }
                    }
                }
            });
        });
        self.pushes.push(handle);
    }
}

/// Human-readable report block.
pub fn format_report(report: &SwingReport) -> String {
    let mut out = String::new();
    let rule = "-".repeat(48);
    let flight = &report.flight;

    // Writing to a String cannot fail
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);
    let cluster = match (&report.classification, &report.cluster) {
        (_, None) | (Classification::Unknown, _) => "unclassified".to_string(),
        (Classification::Exact { .. }, Some(c)) => format!("#{} {}", c.id, c.name),
        (Classification::Nearest { distance, .. }, Some(c)) => {
            format!("#{} {} (nearest, distance {:.2})", c.id, c.name, distance)
        }
    };
    let _ = writeln!(out, "  Club:         {}", report.club_type.code());
    let _ = writeln!(out, "  Swing type:   {}", cluster);

    if !report.six_axis.is_empty() {
        let _ = writeln!(out, "  Six-axis:");
        for s in &report.six_axis {
            let _ = writeln!(out, "    {:<28} {:>7.2}  -> {:>5.1}", s.axis.label(), s.value, s.score);
        }
    }

    if let Some(face) = &report.face {
        let _ = writeln!(
            out,
            "  Face angle:   {:+.2}° (model {:+.2}°)",
            face.actual_face_angle, face.predicted_face_angle
        );
        for d in &face.baseline_deltas {
            let _ = writeln!(out, "    {:<28} {:+.2}°", d.phase.name(), d.delta);
        }
    }

    for f in &report.success_factors {
        let actual = f
            .actual
            .map(|a| format!("{:.1}", a))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {} {:<32} {} {} (target {:.1}..{:.1})",
            if f.within_band { "✓" } else { "✗" },
            f.feature.key(),
            actual,
            f.unit,
            f.band_min,
            f.band_max
        );
    }

    let _ = writeln!(
        out,
        "  Launch:       {:.1}°  {:.1} yd/s  start {:+.1}°  axis {:+.1}°",
        flight.adjustment.launch_deg,
        flight.launch_speed,
        flight.start_direction_deg,
        flight.spin_axis_deg
    );
    let landing = flight.landing();
    let _ = writeln!(
        out,
        "  Carry:        {:.0} yd ({:?}), apex {:.1} yd, side {:+.1} yd, {:.1} s",
        flight.adjustment.carry_yd,
        flight.adjustment.condition,
        flight.apex(),
        landing.x,
        flight.flight_time()
    );
    if let Some(rest) = report.full_path.as_ref().and_then(|p| p.last()) {
        let _ = writeln!(out, "  Total:        {:.0} yd", rest.x.hypot(rest.z));
    }
    let _ = writeln!(out, "{}", rule);
    out
}
