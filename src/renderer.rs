use anyhow::{Context, Result};
use serde_json::json;
use std::io::Write;
use std::net::TcpStream;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::timeout;

use crate::analysis::SwingReport;

const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the 3D trajectory renderer.
///
/// TCP mode keeps one connection open and writes newline-delimited JSON.
/// HTTP mode posts each payload to `/trajectory` with a timeout.
pub struct RendererClient {
    host: String,
    port: u16,
    use_http: bool,
    tcp_stream: Arc<Mutex<Option<TcpStream>>>,
}

impl RendererClient {
    pub fn new(host: String, port: u16, use_http: bool) -> Self {
        Self {
            host,
            port,
            use_http,
            tcp_stream: Arc::new(Mutex::new(None)),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_http(&self) -> bool {
        self.use_http
    }

    fn stream(&self) -> Result<MutexGuard<'_, Option<TcpStream>>> {
        self.tcp_stream
            .lock()
            .map_err(|_| anyhow::anyhow!("Renderer connection lock poisoned"))
    }

    pub fn is_connected(&self) -> bool {
        self.stream().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Open the TCP connection. HTTP mode has nothing to open.
    pub fn connect(&mut self) -> Result<()> {
        if self.use_http {
            return Ok(());
        }
        let address = self.address();

        if self.stream()?.is_some() {
            log::debug!("[RENDERER] Already connected to {}", address);
            return Ok(());
        }

        log::info!("[RENDERER] Connecting to {}...", address);
        let stream = TcpStream::connect(&address).map_err(|e| {
            log::debug!("[RENDERER] Failed to connect to {}: {}", address, e);
            anyhow::anyhow!("TCP connection failed: {}", e)
        })?;
        if let Err(e) = stream.set_nodelay(true) {
            log::warn!("[RENDERER] Failed to set TCP_NODELAY: {}", e);
        }
        *self.stream()? = Some(stream);
        log::info!("[RENDERER] Connected to {}", address);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Ok(mut stream) = self.stream() {
            if stream.take().is_some() {
                log::info!("[RENDERER] Disconnected");
            }
        }
    }

    /// Send the report's trajectory (flight plus roll when present).
    pub async fn send_report(&mut self, report: &SwingReport) -> Result<()> {
        let payload = trajectory_message(report);

        if self.use_http {
            self.send_http(&payload).await
        } else {
            if self.stream()?.is_none() {
                log::debug!("[RENDERER] Connection not established, attempting to connect...");
                self.connect()?;
            }
            self.send_tcp(&payload)
        }
    }

    async fn send_http(&self, data: &serde_json::Value) -> Result<()> {
        let url = format!("http://{}:{}/trajectory", self.host, self.port);
        let client = reqwest::Client::new();

        match timeout(HTTP_TIMEOUT, client.post(&url).json(data).send()).await {
            Ok(Ok(response)) if response.status().is_success() => {
                log::debug!("[RENDERER] Trajectory posted to {}", url);
                Ok(())
            }
            Ok(Ok(response)) => Err(anyhow::anyhow!("HTTP {} from {}", response.status(), url)),
            Ok(Err(e)) => Err(anyhow::anyhow!("Connection error to {}: {}", url, e)),
            Err(_) => Err(anyhow::anyhow!("Timeout posting to {}", url)),
        }
    }

    fn send_tcp(&self, data: &serde_json::Value) -> Result<()> {
        let message = format!(
            "{}\n",
            serde_json::to_string(data).context("Failed to serialize JSON")?
        );

        let mut guard = self.stream()?;
        let Some(stream) = guard.as_mut() else {
            anyhow::bail!("TCP connection not established");
        };

        match stream.write_all(message.as_bytes()).and_then(|()| stream.flush()) {
            Ok(()) => {
                log::debug!("[RENDERER] Sent {} bytes", message.len());
                Ok(())
            }
            Err(e) => {
                // Drop the broken stream so the next send reconnects
                log::debug!("[RENDERER] Write failed, connection may be broken: {}", e);
                *guard = None;
                Err(anyhow::anyhow!("TCP write failed: {}", e))
            }
        }
    }
}

/// Renderer payload: yards, `x` lateral (+ left), `y` up, `z` downrange.
pub fn trajectory_message(report: &SwingReport) -> serde_json::Value {
    let flight = &report.flight;
    let points: Vec<[f64; 4]> = report
        .render_points()
        .iter()
        .map(|p| [p.t, p.x, p.y, p.z])
        .collect();

    json!({
        "type": "trajectory",
        "unit": "yards",
        "clubType": report.club_type,
        "cluster": report.classification.cluster_id(),
        "shot": {
            "carry": flight.adjustment.carry_yd,
            "launchAngle": flight.adjustment.launch_deg,
            "launchSpeed": flight.launch_speed,
            "startDirection": flight.start_direction_deg,
            "spinAxis": flight.spin_axis_deg,
            "apex": flight.apex(),
            "flightTime": flight.flight_time(),
            "condition": flight.adjustment.condition,
        },
        "flightPoints": flight.points.len(),
        "points": points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalyzerConfig, SwingAnalyzer};
    use crate::bounce::BounceConfig;
    use crate::reference::ReferenceData;
    use crate::swing::{ClubType, SwingMeasurement};
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;

    fn report() -> SwingReport {
        let config = AnalyzerConfig {
            bounce: Some(BounceConfig::default()),
            ..Default::default()
        };
        let analyzer = SwingAnalyzer::new(ReferenceData::builtin().unwrap(), config);
        let swing = SwingMeasurement {
            club_type: ClubType::Driver,
            estimate_carry: Some(210.0),
            impact_attack_angle: Some(2.0),
            impact_face_angle: Some(1.0),
            impact_club_path: Some(-1.5),
            ..Default::default()
        };
        analyzer.analyze(&swing).unwrap()
    }

    #[test]
    fn message_carries_full_path() {
        let report = report();
        let msg = trajectory_message(&report);
        assert_eq!(msg["type"], "trajectory");
        assert_eq!(msg["clubType"], "D");
        assert_eq!(
            msg["points"].as_array().unwrap().len(),
            report.render_points().len()
        );
        assert_eq!(msg["flightPoints"], report.flight.points.len());
    }

    #[test]
    fn sends_newline_delimited_json_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            BufReader::new(stream)
                .lines()
                .map(|line| line.unwrap())
                .collect::<Vec<_>>()
        });

        let mut client = RendererClient::new("127.0.0.1".into(), port, false);
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(client.send_report(&report())).unwrap();
        rt.block_on(client.send_report(&report())).unwrap();
        assert!(client.is_connected());
        client.disconnect();
        assert!(!client.is_connected());

        let lines = server.join().unwrap();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let msg: serde_json::Value = serde_json::from_str(&line).unwrap();
            assert_eq!(msg["type"], "trajectory");
        }
    }

    #[test]
    fn http_mode_has_no_tcp_connection() {
        let mut client = RendererClient::new("127.0.0.1".into(), 9, true);
        assert!(client.uses_http());
        client.connect().unwrap();
        assert!(!client.is_connected());
    }

    #[test]
    fn unreachable_host_errors() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut client = RendererClient::new("127.0.0.1".into(), port, false);
        assert!(client.connect().is_err());
        assert!(!client.is_connected());
    }
}
