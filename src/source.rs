use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use crate::swing::SwingMeasurement;

/// Where swings come from (a recorded file or the mock feed).
pub trait SwingSource {
    fn connect(&mut self) -> Result<()>;
    fn get_info(&mut self) -> Result<HashMap<String, String>>;
    /// Next swing if one is ready. `Ok(None)` means "nothing yet".
    fn read_swing(&mut self) -> Result<Option<SwingMeasurement>>;
    /// True once the source can never produce another swing.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Swings recorded as JSON: one object, an array of objects, or one object
/// per line.
pub struct JsonFileSource {
    path: PathBuf,
    pending: VecDeque<SwingMeasurement>,
    loaded: usize,
    connected: bool,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pending: VecDeque::new(),
            loaded: 0,
            connected: false,
        }
    }

    pub fn parse(text: &str) -> Result<Vec<SwingMeasurement>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        // Whole-document JSON first, then JSON lines
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return match value {
                Value::Array(items) => items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| {
                        serde_json::from_value(item)
                            .with_context(|| format!("Invalid swing at index {}", i))
                    })
                    .collect(),
                other => Ok(vec![
                    serde_json::from_value(other).context("Invalid swing object")?
                ]),
            };
        }

        trimmed
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).with_context(|| format!("Invalid swing on line {}", i + 1))
            })
            .collect()
    }
}

impl SwingSource for JsonFileSource {
    fn connect(&mut self) -> Result<()> {
        if self.connected {
            return Ok(());
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let swings = Self::parse(&text)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        self.loaded = swings.len();
        self.pending = swings.into();
        self.connected = true;
        log::debug!("[SOURCE] Loaded {} swings from {}", self.loaded, self.path.display());
        Ok(())
    }

    fn get_info(&mut self) -> Result<HashMap<String, String>> {
        let mut info = HashMap::new();
        info.insert("Source".to_string(), "JSON file".to_string());
        info.insert("Path".to_string(), self.path.display().to_string());
        info.insert("Swings".to_string(), self.loaded.to_string());
        Ok(info)
    }

    fn read_swing(&mut self) -> Result<Option<SwingMeasurement>> {
        if !self.connected {
            anyhow::bail!("Source not connected: {}", self.path.display());
        }
        Ok(self.pending.pop_front())
    }

    fn is_exhausted(&self) -> bool {
        self.connected && self.pending.is_empty()
    }
}
